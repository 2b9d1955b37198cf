//! Baseline calibration.
//!
//! A resting device reports a constant orientation bias (gravity on one
//! accelerometer axis, small gyroscope offsets). Calibration records that
//! bias as a per-axis baseline so a second feature pass can run on
//! baseline-subtracted samples, letting orientation and impact features
//! reflect deviation from rest rather than absolute readings.

use ndarray::{Array1, Array2};
use tracing::{info, warn};

use fallsense_core::SAMPLE_WIDTH;

use crate::window::SampleWindow;

/// Holds the optional per-axis calibration baseline for one stream.
///
/// The baseline is the elementwise mean of the most recent distinct pushed
/// samples. It persists until explicitly recalibrated or cleared; it is
/// never persisted across process restarts.
#[derive(Debug, Clone, Default)]
pub struct Calibrator {
    baseline: Option<Array1<f64>>,
}

impl Calibrator {
    /// Creates an uncalibrated calibrator.
    #[must_use]
    pub fn new() -> Self {
        Self { baseline: None }
    }

    /// Computes a baseline from the last `samples_to_use` window entries.
    ///
    /// Returns `true` if a baseline was recorded. An empty window is not an
    /// error: a warning is logged, the existing baseline (if any) is left
    /// untouched, and `false` is returned.
    pub fn calibrate_from(&mut self, window: &SampleWindow, samples_to_use: usize) -> bool {
        if window.is_empty() || samples_to_use == 0 {
            warn!("insufficient data for calibration; baseline left unset");
            return false;
        }

        let tail = window.tail(samples_to_use);
        let mut baseline = Array1::zeros(SAMPLE_WIDTH);
        for sample in &tail {
            for (axis, &value) in sample.as_slice().iter().enumerate() {
                baseline[axis] += value;
            }
        }
        baseline /= tail.len() as f64;

        info!(
            samples_used = tail.len(),
            "calibration complete, baseline recorded"
        );
        self.baseline = Some(baseline);
        true
    }

    /// Returns `true` if a baseline is currently recorded.
    #[must_use]
    pub fn is_calibrated(&self) -> bool {
        self.baseline.is_some()
    }

    /// The recorded baseline, if any.
    #[must_use]
    pub fn baseline(&self) -> Option<&Array1<f64>> {
        self.baseline.as_ref()
    }

    /// Subtracts the baseline elementwise from every row of a window matrix.
    ///
    /// Returns the matrix unchanged when no baseline is recorded.
    #[must_use]
    pub fn apply(&self, window: &Array2<f64>) -> Array2<f64> {
        match &self.baseline {
            Some(baseline) => window - baseline,
            None => window.clone(),
        }
    }

    /// Discards the recorded baseline.
    pub fn clear(&mut self) {
        self.baseline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fallsense_core::SensorSample;

    fn filled_window(values: &[[f64; SAMPLE_WIDTH]]) -> SampleWindow {
        let mut window = SampleWindow::new(values.len().max(1));
        for &v in values {
            window.push(SensorSample::from_array(v));
        }
        window
    }

    #[test]
    fn test_empty_window_leaves_baseline_unset() {
        let mut calibrator = Calibrator::new();
        let window = SampleWindow::new(5);

        assert!(!calibrator.calibrate_from(&window, 50));
        assert!(!calibrator.is_calibrated());
    }

    #[test]
    fn test_baseline_is_mean_of_recent_samples() {
        let mut calibrator = Calibrator::new();
        let window = filled_window(&[
            [0.0, 0.0, 9.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 10.0, 0.2, 0.0, 0.0],
        ]);

        assert!(calibrator.calibrate_from(&window, 50));
        let baseline = calibrator.baseline().unwrap();
        assert!((baseline[2] - 9.5).abs() < 1e-12);
        assert!((baseline[3] - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_baseline_uses_only_requested_tail() {
        let mut calibrator = Calibrator::new();
        let window = filled_window(&[
            [100.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            [2.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            [4.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        ]);

        assert!(calibrator.calibrate_from(&window, 2));
        let baseline = calibrator.baseline().unwrap();
        // Mean of the last two samples only; the 100.0 outlier is excluded
        assert!((baseline[0] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_apply_subtracts_baseline() {
        let mut calibrator = Calibrator::new();
        let window = filled_window(&[[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]]);
        assert!(calibrator.calibrate_from(&window, 10));

        let matrix = window.to_matrix();
        let calibrated = calibrator.apply(&matrix);
        for value in calibrated.iter() {
            assert!(value.abs() < 1e-12);
        }
    }

    #[test]
    fn test_apply_without_baseline_is_identity() {
        let calibrator = Calibrator::new();
        let window = filled_window(&[[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]]);
        let matrix = window.to_matrix();
        let out = calibrator.apply(&matrix);
        assert_eq!(out, matrix);
    }

    #[test]
    fn test_recalibration_replaces_baseline() {
        let mut calibrator = Calibrator::new();
        let first = filled_window(&[[1.0, 0.0, 0.0, 0.0, 0.0, 0.0]]);
        let second = filled_window(&[[5.0, 0.0, 0.0, 0.0, 0.0, 0.0]]);

        calibrator.calibrate_from(&first, 10);
        calibrator.calibrate_from(&second, 10);
        assert!((calibrator.baseline().unwrap()[0] - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_clear() {
        let mut calibrator = Calibrator::new();
        let window = filled_window(&[[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]]);
        calibrator.calibrate_from(&window, 10);
        calibrator.clear();
        assert!(!calibrator.is_calibrated());
    }
}
