//! # FallSense Core
//!
//! Core types, traits, and utilities for the FallSense fall detection system.
//!
//! This crate provides the foundational building blocks used throughout the
//! FallSense ecosystem, including:
//!
//! - **Core Data Types**: [`SensorSample`], [`Confidence`], [`StreamId`], and
//!   [`DetectionState`] for representing inertial sensor data and detection
//!   lifecycle state.
//!
//! - **Error Types**: Comprehensive error handling via the [`error`] module,
//!   with specific error types for ingestion and model subsystems.
//!
//! - **Traits**: The [`FallScorer`] abstraction that defines the contract a
//!   trained classifier must satisfy to plug into the detection pipeline.
//!
//! - **Utilities**: Common statistical helpers used across the codebase.
//!
//! ## Example
//!
//! ```rust
//! use fallsense_core::{SensorSample, SAMPLE_WIDTH};
//!
//! // A sample is 3-axis accelerometer + 3-axis gyroscope
//! let sample = SensorSample::new(vec![0.1, 9.8, 0.2, 0.01, 0.02, 0.0]).unwrap();
//!
//! assert_eq!(sample.as_slice().len(), SAMPLE_WIDTH);
//! assert!(sample.acc_magnitude() > 9.0);
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types at the crate root
pub use error::{CoreError, CoreResult, IngestError, ModelError};
pub use traits::FallScorer;
pub use types::{Confidence, DetectionState, SensorSample, StreamId};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Width of a single sensor sample: 3 accelerometer axes + 3 gyroscope axes.
pub const SAMPLE_WIDTH: usize = 6;

/// Number of accelerometer axes at the front of a sample.
pub const ACC_AXES: usize = 3;

/// Default confidence threshold for declaring a fall.
pub const DEFAULT_THRESHOLD: f64 = 0.8;

/// Prelude module for convenient imports.
///
/// ```rust
/// use fallsense_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{CoreError, CoreResult, IngestError, ModelError};
    pub use crate::traits::FallScorer;
    pub use crate::types::{Confidence, DetectionState, SensorSample, StreamId};
    pub use crate::{ACC_AXES, DEFAULT_THRESHOLD, SAMPLE_WIDTH};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_valid() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_constants() {
        assert_eq!(SAMPLE_WIDTH, 6);
        assert_eq!(ACC_AXES, 3);
        assert!(DEFAULT_THRESHOLD > 0.0);
        assert!(DEFAULT_THRESHOLD < 1.0);
    }
}
