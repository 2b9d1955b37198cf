//! # FallSense Signal
//!
//! Sliding-window buffering, deterministic feature synthesis, and baseline
//! calibration for the FallSense detection pipeline.
//!
//! The pipeline processes inertial samples through three stages:
//!
//! 1. **Windowing** ([`SampleWindow`]): a bounded FIFO of the most recent
//!    samples; the unit of feature extraction.
//! 2. **Feature extraction** ([`FeatureExtractor`]): a pure function from a
//!    window matrix to a fixed-schema [`WindowFeatures`] vector, indexed by
//!    the compile-time [`FeatureKey`] enum.
//! 3. **Calibration** ([`Calibrator`]): an optional per-axis baseline
//!    subtracted from raw samples before a second feature pass, cancelling a
//!    device's resting orientation.
//!
//! # Example
//!
//! ```
//! use fallsense_core::SensorSample;
//! use fallsense_signal::{FeatureExtractor, FeatureKey, SampleWindow};
//!
//! let mut window = SampleWindow::new(3);
//! window.push(SensorSample::from_array([1.0, 0.0, 0.0, 0.5, 0.5, 0.5]));
//! window.push(SensorSample::from_array([0.0, 2.0, 0.0, 1.5, 1.5, 1.5]));
//! window.push(SensorSample::from_array([0.0, 0.0, 3.0, 2.5, 2.5, 2.5]));
//! assert!(window.is_ready());
//!
//! let extractor = FeatureExtractor::default_config();
//! let features = extractor.extract(&window.to_matrix());
//! assert!(features.get(FeatureKey::AvgGyroMovement) > 0.1);
//! assert!((features.get(FeatureKey::IsStationary) - 0.0).abs() < f64::EPSILON);
//! ```

#![deny(unsafe_code)]

pub mod calibration;
pub mod features;
pub mod window;

pub use calibration::Calibrator;
pub use features::{FeatureExtractor, FeatureExtractorConfig, FeatureKey, WindowFeatures};
pub use window::SampleWindow;
