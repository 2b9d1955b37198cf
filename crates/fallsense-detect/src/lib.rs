//! # FallSense Detect
//!
//! The runtime decision pipeline for near-real-time fall detection over
//! streaming inertial sensor samples.
//!
//! ## Architecture
//!
//! Samples flow through a fixed sequence of stages, all owned by a single
//! synchronized [`FallPipeline`] per logical stream:
//!
//! ```text
//! sample -> validate -> window -> (full?) -> stationarity gate
//!              |                                  |
//!              v                                  v
//!          collecting                     feature extraction
//!                                                 |
//!                                  calibrated second pass (optional)
//!                                                 |
//!                                normalize -> score -> smooth -> policy
//!                                                                 |
//!                                                                 v
//!                                                             verdict
//! ```
//!
//! The trained classifier is an external collaborator behind the
//! [`FallScorer`](fallsense_core::FallScorer) trait; its fitted feature
//! schema, scaler parameters, and weights are consumed once at startup as
//! [`ModelArtifacts`].
//!
//! ## Example
//!
//! ```rust
//! use fallsense_detect::{ConstantScorer, DetectorConfig, FallPipeline, Verdict};
//!
//! let config = DetectorConfig::builder()
//!     .window_size(3)
//!     .threshold(0.8)
//!     .build();
//! let pipeline = FallPipeline::with_scorer(config, Box::new(ConstantScorer::new(0.9))).unwrap();
//!
//! // Two samples: still collecting
//! pipeline.ingest(vec![1.0, 0.0, 0.0, 1.0, 1.0, 1.0]).unwrap();
//! let verdict = pipeline.ingest(vec![0.0, 2.0, 0.0, 2.0, 2.0, 2.0]).unwrap();
//! assert!(matches!(verdict, Verdict::Collecting { samples: 2, required: 3 }));
//! ```

#![forbid(unsafe_code)]

pub mod artifacts;
pub mod classifier;
pub mod history;
pub mod normalizer;
pub mod pipeline;
pub mod policy;
pub mod smoothing;
pub mod verdict;

pub use artifacts::{FeatureSchema, LogisticParams, ModelArtifacts, ScalerParams};
pub use classifier::{ConstantScorer, LogisticModel};
pub use history::{DetectionLog, DetectionRecord, DetectionSummary};
pub use normalizer::FeatureNormalizer;
pub use pipeline::FallPipeline;
pub use policy::DetectionPolicy;
pub use smoothing::ConfidenceSmoother;
pub use verdict::{CalibrationOutcome, PipelineStatus, Verdict, VerdictMetrics};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Configuration for a detection stream.
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Number of samples in a sliding window (e.g. 1.5 s at 50 Hz)
    pub window_size: usize,
    /// Number of recent raw scores averaged into the reported confidence
    pub smoothing_window: usize,
    /// Minimum smoothed confidence required to declare a fall
    pub threshold: f64,
    /// Accelerometer deviation below which the device is considered stationary
    pub stationary_acc_std: f64,
    /// Default number of recent samples used by calibration
    pub calibration_samples: usize,
    /// Whether a confirmed fall latches the stream until an explicit reset
    pub latch_on_trigger: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            window_size: 75,
            smoothing_window: 10,
            threshold: fallsense_core::DEFAULT_THRESHOLD,
            stationary_acc_std: 0.05,
            calibration_samples: 50,
            latch_on_trigger: true,
        }
    }
}

impl DetectorConfig {
    /// Create a new configuration builder
    pub fn builder() -> DetectorConfigBuilder {
        DetectorConfigBuilder::default()
    }
}

/// Builder for [`DetectorConfig`]
#[derive(Debug, Default)]
pub struct DetectorConfigBuilder {
    config: DetectorConfig,
}

impl DetectorConfigBuilder {
    /// Set the sliding window size
    pub fn window_size(mut self, size: usize) -> Self {
        self.config.window_size = size;
        self
    }

    /// Set the confidence smoothing window size
    pub fn smoothing_window(mut self, size: usize) -> Self {
        self.config.smoothing_window = size;
        self
    }

    /// Set the fall confidence threshold
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.config.threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Set the stationary accelerometer deviation threshold
    pub fn stationary_acc_std(mut self, threshold: f64) -> Self {
        self.config.stationary_acc_std = threshold.max(0.0);
        self
    }

    /// Set the default calibration sample count
    pub fn calibration_samples(mut self, samples: usize) -> Self {
        self.config.calibration_samples = samples;
        self
    }

    /// Enable or disable latching on a confirmed fall
    pub fn latch_on_trigger(mut self, latch: bool) -> Self {
        self.config.latch_on_trigger = latch;
        self
    }

    /// Build the configuration
    pub fn build(self) -> DetectorConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DetectorConfig::default();
        assert_eq!(config.window_size, 75);
        assert_eq!(config.smoothing_window, 10);
        assert!((config.threshold - 0.8).abs() < f64::EPSILON);
        assert!((config.stationary_acc_std - 0.05).abs() < f64::EPSILON);
        assert!(config.latch_on_trigger);
    }

    #[test]
    fn test_config_builder() {
        let config = DetectorConfig::builder()
            .window_size(15)
            .smoothing_window(5)
            .threshold(0.91)
            .stationary_acc_std(0.02)
            .calibration_samples(20)
            .latch_on_trigger(false)
            .build();

        assert_eq!(config.window_size, 15);
        assert_eq!(config.smoothing_window, 5);
        assert!((config.threshold - 0.91).abs() < f64::EPSILON);
        assert!((config.stationary_acc_std - 0.02).abs() < f64::EPSILON);
        assert_eq!(config.calibration_samples, 20);
        assert!(!config.latch_on_trigger);
    }

    #[test]
    fn test_threshold_clamping() {
        let config = DetectorConfig::builder().threshold(1.5).build();
        assert!((config.threshold - 1.0).abs() < f64::EPSILON);

        let config = DetectorConfig::builder().threshold(-0.5).build();
        assert!(config.threshold.abs() < f64::EPSILON);
    }

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
