//! Error types for the FallSense system.
//!
//! This module provides comprehensive error handling using [`thiserror`] for
//! automatic `Display` and `Error` trait implementations.
//!
//! # Error Hierarchy
//!
//! - [`CoreError`]: Top-level error type that encompasses all subsystem errors
//! - [`IngestError`]: Errors raised while validating incoming sensor samples
//! - [`ModelError`]: Errors from model artifacts, normalization, and scoring
//!
//! # Example
//!
//! ```rust
//! use fallsense_core::error::{CoreError, IngestError};
//!
//! fn accept_sample(width: usize) -> Result<(), CoreError> {
//!     if width != 6 {
//!         return Err(IngestError::InvalidSampleShape { expected: 6, actual: width }.into());
//!     }
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// A specialized `Result` type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Top-level error type for the FallSense system.
///
/// This enum encompasses all possible errors that can occur within the
/// detection pipeline, providing a unified error type for the entire crate.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CoreError {
    /// Sample ingestion error
    #[error("Ingestion error: {0}")]
    Ingest(#[from] IngestError),

    /// Model artifact or scoring error
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
    },

    /// Validation error for input data
    #[error("Validation error: {message}")]
    Validation {
        /// Description of what validation failed
        message: String,
    },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },
}

impl CoreError {
    /// Creates a new configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a new validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if this error is recoverable.
    ///
    /// Recoverable errors leave the pipeline in a usable state; the caller
    /// may submit further samples. Non-recoverable errors indicate a broken
    /// startup configuration that requires operator intervention.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Ingest(e) => e.is_recoverable(),
            Self::Model(e) => e.is_recoverable(),
            Self::Validation { .. } => true,
            Self::Configuration { .. } | Self::Internal { .. } => false,
        }
    }
}

/// Errors raised while validating incoming sensor samples.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum IngestError {
    /// The incoming vector does not have the expected sample width.
    ///
    /// The window buffer is never mutated when this error is returned.
    #[error("Invalid sample shape: expected {expected} values, got {actual}")]
    InvalidSampleShape {
        /// Expected sample width
        expected: usize,
        /// Actual number of values received
        actual: usize,
    },

    /// A sample value is not a finite number.
    #[error("Non-finite sample value at index {index}")]
    NonFiniteValue {
        /// Index of the offending value within the sample
        index: usize,
    },
}

impl IngestError {
    /// Returns `true` if this error is recoverable.
    ///
    /// All ingestion errors are per-request rejections; the pipeline keeps
    /// accepting samples afterwards.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        true
    }
}

/// Errors from model artifacts, feature normalization, and scoring.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ModelError {
    /// The artifact feature schema does not match the extractor's schema.
    ///
    /// Treated as a startup configuration fault: pipeline initialization
    /// must abort rather than surface this per request.
    #[error("Feature schema mismatch: {message}")]
    SchemaMismatch {
        /// Description of the mismatch
        message: String,
    },

    /// A fitted parameter vector has the wrong length.
    #[error("Parameter '{parameter}' length mismatch: expected {expected}, got {actual}")]
    ParameterLength {
        /// Name of the parameter vector
        parameter: &'static str,
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// A fitted scale value is zero, which would make normalization divide by zero.
    #[error("Degenerate scale parameter at index {index}")]
    DegenerateScale {
        /// Index of the zero scale entry
        index: usize,
    },

    /// The external classifier is not loaded or unusable.
    ///
    /// Fatal at startup: the pipeline refuses to accept samples.
    #[error("Classifier unavailable: {reason}")]
    ClassifierUnavailable {
        /// Reason the classifier could not be used
        reason: String,
    },

    /// A model artifact could not be read or parsed.
    #[error("Failed to load artifact from '{path}': {reason}")]
    ArtifactLoadFailed {
        /// Path to the artifact file
        path: String,
        /// Reason for the failure
        reason: String,
    },

    /// The classifier produced a score outside the expected domain.
    #[error("Classifier produced invalid score: {value}")]
    InvalidScore {
        /// The offending score value
        value: f64,
    },
}

impl ModelError {
    /// Creates a new schema mismatch error.
    #[must_use]
    pub fn schema_mismatch(message: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            message: message.into(),
        }
    }

    /// Creates a new classifier-unavailable error.
    #[must_use]
    pub fn classifier_unavailable(reason: impl Into<String>) -> Self {
        Self::ClassifierUnavailable {
            reason: reason.into(),
        }
    }

    /// Creates a new artifact-load error.
    #[must_use]
    pub fn artifact_load_failed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ArtifactLoadFailed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Returns `true` if this error is recoverable.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::InvalidScore { .. } => true,
            Self::SchemaMismatch { .. }
            | Self::ParameterLength { .. }
            | Self::DegenerateScale { .. }
            | Self::ClassifierUnavailable { .. }
            | Self::ArtifactLoadFailed { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_display() {
        let err = CoreError::configuration("window size must be nonzero");
        assert!(err.to_string().contains("Configuration error"));
        assert!(err.to_string().contains("window size"));
    }

    #[test]
    fn test_invalid_sample_shape_display() {
        let err = IngestError::InvalidSampleShape {
            expected: 6,
            actual: 4,
        };
        assert!(err.to_string().contains("expected 6"));
        assert!(err.to_string().contains("got 4"));
    }

    #[test]
    fn test_ingest_errors_are_recoverable() {
        let err = IngestError::InvalidSampleShape {
            expected: 6,
            actual: 0,
        };
        assert!(err.is_recoverable());

        let core_err: CoreError = err.into();
        assert!(core_err.is_recoverable());
    }

    #[test]
    fn test_model_errors_are_fatal() {
        let schema = ModelError::schema_mismatch("unexpected key order");
        assert!(!schema.is_recoverable());

        let unavailable = ModelError::classifier_unavailable("model file missing");
        assert!(!unavailable.is_recoverable());

        let score = ModelError::InvalidScore { value: f64::NAN };
        assert!(score.is_recoverable());
    }

    #[test]
    fn test_error_conversion() {
        let model_err = ModelError::ParameterLength {
            parameter: "scale",
            expected: 38,
            actual: 30,
        };
        let core_err: CoreError = model_err.into();
        assert!(matches!(core_err, CoreError::Model(_)));
        assert!(core_err.to_string().contains("scale"));
    }
}
