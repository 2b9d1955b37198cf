//! Verdict and status DTOs.
//!
//! These types are the pipeline's caller-facing contract. They serialize to
//! the same wire shapes the service exposes, providing a clean separation
//! between pipeline internals and the response contract.

use chrono::{DateTime, Utc};
use serde::Serialize;

use fallsense_core::{Confidence, DetectionState};

use crate::history::DetectionSummary;

/// Diagnostic metrics attached to a window verdict.
#[derive(Debug, Clone, Serialize)]
pub struct VerdictMetrics {
    /// Population deviation of the accelerometer columns over the window
    pub acc_std: f64,
    /// The window's binary stationarity feature (processed verdicts only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_stationary: Option<f64>,
    /// Angle between first and last acc vectors (processed verdicts only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation_change: Option<f64>,
}

impl VerdictMetrics {
    /// Metrics for a stationary short-circuit.
    #[must_use]
    pub fn stationary(acc_std: f64) -> Self {
        Self {
            acc_std,
            is_stationary: None,
            orientation_change: None,
        }
    }

    /// Metrics for a fully processed window.
    #[must_use]
    pub fn processed(acc_std: f64, is_stationary: f64, orientation_change: f64) -> Self {
        Self {
            acc_std,
            is_stationary: Some(is_stationary),
            orientation_change: Some(orientation_change),
        }
    }
}

/// Outcome of ingesting one sensor sample.
///
/// ## Example Response
///
/// ```json
/// {
///   "status": "processed",
///   "fall_detected": true,
///   "confidence": 0.93,
///   "threshold": 0.8,
///   "metrics": {
///     "acc_std": 1.42,
///     "is_stationary": 0.0,
///     "orientation_change": 1.15
///   },
///   "timestamp": "2024-01-15T14:30:00Z"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Verdict {
    /// The window is not full yet; no evaluation ran.
    Collecting {
        /// Samples buffered so far
        samples: usize,
        /// Samples required for a full window
        required: usize,
    },
    /// The device is quiescent; evaluation was skipped.
    Stationary {
        /// Always `false` for a stationary verdict
        fall_detected: bool,
        /// Always zero for a stationary verdict
        confidence: Confidence,
        /// Diagnostic metrics
        metrics: VerdictMetrics,
    },
    /// A full window was evaluated end to end.
    Processed {
        /// Whether a fall was declared
        fall_detected: bool,
        /// Smoothed confidence behind the decision
        confidence: Confidence,
        /// Threshold the confidence was compared against
        threshold: f64,
        /// Diagnostic metrics
        metrics: VerdictMetrics,
        /// When the evaluation completed
        timestamp: DateTime<Utc>,
    },
    /// The stream is latched; the sample was ignored.
    AlreadyTriggered,
}

impl Verdict {
    /// Whether this verdict declares a fall.
    #[must_use]
    pub fn is_fall(&self) -> bool {
        matches!(
            self,
            Self::Processed {
                fall_detected: true,
                ..
            }
        )
    }

    /// The wire-level status string for this verdict.
    #[must_use]
    pub fn status(&self) -> &'static str {
        match self {
            Self::Collecting { .. } => "collecting",
            Self::Stationary { .. } => "stationary",
            Self::Processed { .. } => "processed",
            Self::AlreadyTriggered => "already_triggered",
        }
    }
}

/// Outcome of a calibration request.
#[derive(Debug, Clone, Serialize)]
pub struct CalibrationOutcome {
    /// Whether a baseline is recorded after this request
    pub calibrated: bool,
    /// Number of samples the new baseline was averaged over (0 when the
    /// request found no data)
    pub samples_used: usize,
}

/// Snapshot of a pipeline's externally visible state.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineStatus {
    /// Samples currently buffered in the window
    pub buffer_size: usize,
    /// Whether a calibration baseline is recorded
    pub calibrated: bool,
    /// Configured fall confidence threshold
    pub threshold: f64,
    /// Current lifecycle state
    pub state: DetectionState,
    /// Summary of evaluations recorded by the detection log
    pub detections: DetectionSummary,
}
