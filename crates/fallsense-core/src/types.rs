//! Core data types for the FallSense system.
//!
//! This module defines the fundamental data structures used throughout the
//! FallSense ecosystem for representing sensor samples, confidence scores,
//! and detection lifecycle state.
//!
//! # Type Categories
//!
//! - **Sample Types**: [`SensorSample`]
//! - **Common Types**: [`Confidence`], [`StreamId`]
//! - **State Types**: [`DetectionState`]

use uuid::Uuid;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{CoreResult, IngestError};
use crate::{ACC_AXES, SAMPLE_WIDTH};

// =============================================================================
// Common Types
// =============================================================================

/// Unique identifier for a logical sensor stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StreamId(Uuid);

impl StreamId {
    /// Creates a new unique stream ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a stream ID from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for StreamId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for StreamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Confidence score in the range [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Confidence(f64);

impl Confidence {
    /// Creates a new confidence value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not in the range [0.0, 1.0].
    pub fn new(value: f64) -> CoreResult<Self> {
        if !(0.0..=1.0).contains(&value) {
            return Err(crate::error::CoreError::validation(format!(
                "Confidence must be in [0.0, 1.0], got {value}"
            )));
        }
        Ok(Self(value))
    }

    /// Creates a confidence value, clamping out-of-range inputs.
    #[must_use]
    pub fn clamped(value: f64) -> Self {
        Self(value.clamp(0.0, 1.0))
    }

    /// Returns the raw confidence value.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Returns `true` if the confidence exceeds the given threshold.
    #[must_use]
    pub fn exceeds(&self, threshold: f64) -> bool {
        self.0 > threshold
    }

    /// Maximum confidence (1.0).
    pub const MAX: Self = Self(1.0);

    /// Minimum confidence (0.0).
    pub const MIN: Self = Self(0.0);
}

impl Default for Confidence {
    fn default() -> Self {
        Self(0.0)
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

// =============================================================================
// Sample Types
// =============================================================================

/// A single inertial sensor sample.
///
/// Holds exactly [`SAMPLE_WIDTH`] values: the 3-axis accelerometer reading
/// followed by the 3-axis gyroscope reading. Immutable once created; the only
/// way to obtain one is through the validating constructors, so every
/// `SensorSample` in the system is known to have the correct width.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SensorSample {
    values: [f64; SAMPLE_WIDTH],
}

impl SensorSample {
    /// Creates a sample from an incoming value vector.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::InvalidSampleShape`] if the vector is empty or
    /// its width differs from [`SAMPLE_WIDTH`], and
    /// [`IngestError::NonFiniteValue`] if any value is NaN or infinite.
    /// No state is mutated on failure.
    pub fn new(values: Vec<f64>) -> CoreResult<Self> {
        if values.len() != SAMPLE_WIDTH {
            return Err(IngestError::InvalidSampleShape {
                expected: SAMPLE_WIDTH,
                actual: values.len(),
            }
            .into());
        }
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(IngestError::NonFiniteValue { index }.into());
        }

        let mut array = [0.0; SAMPLE_WIDTH];
        array.copy_from_slice(&values);
        Ok(Self { values: array })
    }

    /// Creates a sample from a fixed-width array, bypassing width validation
    /// (the type system already guarantees it).
    #[must_use]
    pub fn from_array(values: [f64; SAMPLE_WIDTH]) -> Self {
        Self { values }
    }

    /// Returns all values in order: accelerometer axes, then gyroscope axes.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Returns the accelerometer sub-vector (first [`ACC_AXES`] values).
    #[must_use]
    pub fn acc(&self) -> &[f64] {
        &self.values[..ACC_AXES]
    }

    /// Returns the gyroscope sub-vector (remaining values).
    #[must_use]
    pub fn gyro(&self) -> &[f64] {
        &self.values[ACC_AXES..]
    }

    /// Returns the Euclidean magnitude of the accelerometer sub-vector.
    #[must_use]
    pub fn acc_magnitude(&self) -> f64 {
        self.acc().iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// Returns the Euclidean magnitude of the gyroscope sub-vector.
    #[must_use]
    pub fn gyro_magnitude(&self) -> f64 {
        self.gyro().iter().map(|v| v * v).sum::<f64>().sqrt()
    }
}

// =============================================================================
// State Types
// =============================================================================

/// Lifecycle state of a detection stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DetectionState {
    /// No calibration yet; accepting samples and running predictions.
    Idle,
    /// Normal operation; accepting samples and running predictions.
    Monitoring,
    /// A fall has been confirmed; predictions are suppressed until reset.
    Triggered,
}

impl DetectionState {
    /// Returns `true` if the stream is in the latched state.
    #[must_use]
    pub fn is_triggered(&self) -> bool {
        matches!(self, Self::Triggered)
    }

    /// Returns the state name as a string.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Monitoring => "monitoring",
            Self::Triggered => "triggered",
        }
    }
}

impl Default for DetectionState {
    fn default() -> Self {
        Self::Idle
    }
}

impl std::fmt::Display for DetectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
