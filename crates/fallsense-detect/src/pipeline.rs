//! The per-stream detection pipeline.
//!
//! [`FallPipeline`] owns every piece of mutable detection state for one
//! logical sensor stream — window buffer, confidence history, calibration
//! baseline, policy latch, and detection log — behind a single mutex.
//! Ingestion, calibration, reset, and status each hold the exclusive
//! section end to end, so concurrent callers always observe one globally
//! agreed sample order and a calibration can never race an in-flight
//! window evaluation.
//!
//! Every operation is a synchronous, bounded-latency computation (dominated
//! by the classifier call); there are no internal timeouts and no
//! cancellation concept. Each sample either completes with a [`Verdict`]
//! or fails fast with a typed error.

use chrono::Utc;
use parking_lot::Mutex;
use tracing::{debug, info};

use fallsense_core::error::{CoreResult, ModelError};
use fallsense_core::{Confidence, FallScorer, SensorSample, StreamId};
use fallsense_signal::{Calibrator, FeatureExtractor, FeatureKey, SampleWindow};

use crate::artifacts::ModelArtifacts;
use crate::classifier::LogisticModel;
use crate::history::DetectionLog;
use crate::normalizer::FeatureNormalizer;
use crate::policy::DetectionPolicy;
use crate::smoothing::ConfidenceSmoother;
use crate::verdict::{CalibrationOutcome, PipelineStatus, Verdict, VerdictMetrics};
use crate::DetectorConfig;

/// How many recent evaluations the detection log retains.
const DETECTION_LOG_CAPACITY: usize = 256;

/// Mutable per-stream state, guarded as one critical section.
struct PipelineInner {
    window: SampleWindow,
    smoother: ConfidenceSmoother,
    calibrator: Calibrator,
    policy: DetectionPolicy,
    log: DetectionLog,
}

/// Streaming windowed-inference pipeline for one sensor stream.
pub struct FallPipeline {
    id: StreamId,
    config: DetectorConfig,
    extractor: FeatureExtractor,
    normalizer: FeatureNormalizer,
    scorer: Box<dyn FallScorer>,
    inner: Mutex<PipelineInner>,
}

impl FallPipeline {
    /// Creates a pipeline from validated model artifacts.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for degenerate window sizes and the
    /// artifact validation errors for inconsistent scaler or classifier
    /// parameters. A pipeline that fails here must not accept samples.
    pub fn new(config: DetectorConfig, artifacts: &ModelArtifacts) -> CoreResult<Self> {
        let normalizer = FeatureNormalizer::from_params(&artifacts.scaler)?;
        let scorer = Box::new(LogisticModel::from_params(&artifacts.model)?);
        Self::from_parts(config, normalizer, scorer)
    }

    /// Creates a pipeline around an externally supplied scorer with identity
    /// normalization.
    ///
    /// Intended for tests, benches, and models that embed their own input
    /// scaling.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for degenerate window sizes or a
    /// schema mismatch when the scorer declares an incompatible width.
    pub fn with_scorer(config: DetectorConfig, scorer: Box<dyn FallScorer>) -> CoreResult<Self> {
        Self::from_parts(config, FeatureNormalizer::identity(), scorer)
    }

    fn from_parts(
        config: DetectorConfig,
        normalizer: FeatureNormalizer,
        scorer: Box<dyn FallScorer>,
    ) -> CoreResult<Self> {
        if config.window_size == 0 {
            return Err(fallsense_core::CoreError::configuration(
                "window_size must be at least 1",
            ));
        }
        if config.smoothing_window == 0 {
            return Err(fallsense_core::CoreError::configuration(
                "smoothing_window must be at least 1",
            ));
        }
        if let Some(expected) = scorer.feature_count() {
            if expected != FeatureKey::COUNT {
                return Err(ModelError::schema_mismatch(format!(
                    "scorer expects {expected} features, extractor produces {}",
                    FeatureKey::COUNT
                ))
                .into());
            }
        }

        let inner = PipelineInner {
            window: SampleWindow::new(config.window_size),
            smoother: ConfidenceSmoother::new(config.smoothing_window),
            calibrator: Calibrator::new(),
            policy: DetectionPolicy::new(config.latch_on_trigger),
            log: DetectionLog::new(DETECTION_LOG_CAPACITY),
        };

        let id = StreamId::new();
        info!(stream = %id, window = config.window_size, "detection pipeline ready");

        Ok(Self {
            id,
            config,
            extractor: FeatureExtractor::default_config(),
            normalizer,
            scorer,
            inner: Mutex::new(inner),
        })
    }

    /// The stream identifier.
    pub fn id(&self) -> StreamId {
        self.id
    }

    /// The stream configuration.
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Ingests one sensor sample and returns the resulting verdict.
    ///
    /// The whole push-extract-classify-smooth-decide sequence runs inside
    /// the stream's exclusive section.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::InvalidSampleShape`](fallsense_core::IngestError)
    /// for malformed input (the window is untouched) and model errors when
    /// the scorer misbehaves.
    pub fn ingest(&self, values: Vec<f64>) -> CoreResult<Verdict> {
        let mut inner = self.inner.lock();

        // Latched streams ignore input before any validation or buffering.
        if inner.policy.is_suppressed() {
            return Ok(Verdict::AlreadyTriggered);
        }

        // Validation precedes every mutation; a bad sample leaves the
        // window exactly as it was.
        let sample = SensorSample::new(values)?;
        inner.window.push(sample);

        if !inner.window.is_ready() {
            return Ok(Verdict::Collecting {
                samples: inner.window.len(),
                required: inner.window.capacity(),
            });
        }

        let matrix = inner.window.to_matrix();

        // Cheap rejection of a quiescent device before any feature work.
        let acc_std = FeatureExtractor::acc_std(&matrix);
        if acc_std < self.config.stationary_acc_std {
            debug!(stream = %self.id, acc_std, "window stationary, skipping classification");
            return Ok(Verdict::Stationary {
                fall_detected: false,
                confidence: Confidence::MIN,
                metrics: VerdictMetrics::stationary(acc_std),
            });
        }

        let mut features = self.extractor.extract(&matrix);
        if inner.calibrator.is_calibrated() {
            let calibrated = inner.calibrator.apply(&matrix);
            features.overwrite_with(&self.extractor.extract(&calibrated));
        }

        let normalized = self.normalizer.transform(&features);
        let raw = self.scorer.score(&normalized)?;
        if !raw.is_finite() {
            return Err(ModelError::InvalidScore { value: raw }.into());
        }
        let raw = raw.clamp(0.0, 1.0);

        inner.smoother.push(raw);
        let smoothed = inner.smoother.smoothed().unwrap_or(raw);

        let stationary_flag = features.get(FeatureKey::IsStationary);
        let fall_detected =
            inner
                .policy
                .evaluate(smoothed, self.config.threshold, stationary_flag);

        info!(
            stream = %self.id,
            raw_score = raw,
            smoothed,
            fall_detected,
            stationary = stationary_flag,
            "window evaluated"
        );
        inner.log.record(smoothed, fall_detected);

        Ok(Verdict::Processed {
            fall_detected,
            confidence: Confidence::clamped(smoothed),
            threshold: self.config.threshold,
            metrics: VerdictMetrics::processed(
                acc_std,
                stationary_flag,
                features.get(FeatureKey::OrientationChange),
            ),
            timestamp: Utc::now(),
        })
    }

    /// Recomputes the calibration baseline from recent pushed samples.
    ///
    /// Takes the same exclusive section as ingestion, so a baseline can
    /// never be computed against a half-updated window. An empty window is
    /// not an error; the outcome reports that no baseline was recorded.
    pub fn calibrate(&self, samples_to_use: usize) -> CalibrationOutcome {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        let available = inner.window.len();
        let recorded = inner.calibrator.calibrate_from(&inner.window, samples_to_use);
        CalibrationOutcome {
            calibrated: inner.calibrator.is_calibrated(),
            samples_used: if recorded {
                samples_to_use.min(available)
            } else {
                0
            },
        }
    }

    /// Recalibrates with the configured default sample count.
    pub fn calibrate_default(&self) -> CalibrationOutcome {
        self.calibrate(self.config.calibration_samples)
    }

    /// Releases the detection latch.
    ///
    /// The window and confidence history are deliberately preserved; only
    /// the latch is cleared, so the next full window is evaluated with its
    /// existing context.
    pub fn reset(&self) -> fallsense_core::DetectionState {
        let mut inner = self.inner.lock();
        let state = inner.policy.reset();
        info!(stream = %self.id, "detection latch reset");
        state
    }

    /// Reports the externally visible pipeline state.
    pub fn status(&self) -> PipelineStatus {
        let inner = self.inner.lock();
        PipelineStatus {
            buffer_size: inner.window.len(),
            calibrated: inner.calibrator.is_calibrated(),
            threshold: self.config.threshold,
            state: inner.policy.state(),
            detections: inner.log.summary(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::ConstantScorer;
    use fallsense_core::DetectionState;

    fn moving_sample(seed: f64) -> Vec<f64> {
        vec![seed, seed * 2.0, 9.8 - seed, 1.0, 1.0, 1.0]
    }

    fn small_pipeline(score: f64, latch: bool) -> FallPipeline {
        let config = DetectorConfig::builder()
            .window_size(3)
            .smoothing_window(10)
            .threshold(0.8)
            .latch_on_trigger(latch)
            .build();
        FallPipeline::with_scorer(config, Box::new(ConstantScorer::new(score))).unwrap()
    }

    #[test]
    fn test_collecting_until_window_full() {
        let pipeline = small_pipeline(0.9, true);

        let v1 = pipeline.ingest(moving_sample(1.0)).unwrap();
        assert!(matches!(
            v1,
            Verdict::Collecting {
                samples: 1,
                required: 3
            }
        ));

        let v2 = pipeline.ingest(moving_sample(2.0)).unwrap();
        assert!(matches!(
            v2,
            Verdict::Collecting {
                samples: 2,
                required: 3
            }
        ));
    }

    #[test]
    fn test_full_window_confident_score_declares_fall() {
        let pipeline = small_pipeline(0.9, true);
        pipeline.ingest(moving_sample(1.0)).unwrap();
        pipeline.ingest(moving_sample(2.0)).unwrap();

        let verdict = pipeline.ingest(moving_sample(3.0)).unwrap();
        match verdict {
            Verdict::Processed {
                fall_detected,
                confidence,
                threshold,
                ..
            } => {
                assert!(fall_detected);
                assert!((confidence.value() - 0.9).abs() < 1e-9);
                assert!((threshold - 0.8).abs() < f64::EPSILON);
            }
            other => panic!("expected processed verdict, got {other:?}"),
        }

        // Latched: the next sample is rejected outright
        let after = pipeline.ingest(moving_sample(4.0)).unwrap();
        assert!(matches!(after, Verdict::AlreadyTriggered));
        assert_eq!(pipeline.status().state, DetectionState::Triggered);
    }

    #[test]
    fn test_identical_samples_short_circuit_as_stationary() {
        let pipeline = small_pipeline(0.99, true);
        for _ in 0..2 {
            pipeline.ingest(vec![0.5; 6]).unwrap();
        }
        let verdict = pipeline.ingest(vec![0.5; 6]).unwrap();
        match verdict {
            Verdict::Stationary {
                fall_detected,
                confidence,
                metrics,
            } => {
                assert!(!fall_detected);
                assert!((confidence.value() - 0.0).abs() < f64::EPSILON);
                assert!(metrics.acc_std < 0.05);
            }
            other => panic!("expected stationary verdict, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_sample_does_not_mutate_window() {
        let pipeline = small_pipeline(0.9, true);
        pipeline.ingest(moving_sample(1.0)).unwrap();
        pipeline.ingest(moving_sample(2.0)).unwrap();

        let err = pipeline.ingest(vec![1.0, 2.0]).unwrap_err();
        assert!(err.is_recoverable());
        assert_eq!(pipeline.status().buffer_size, 2);
    }

    #[test]
    fn test_reset_releases_latch_and_keeps_buffers() {
        let pipeline = small_pipeline(0.9, true);
        for i in 0..3 {
            pipeline.ingest(moving_sample(i as f64)).unwrap();
        }
        assert!(matches!(
            pipeline.ingest(moving_sample(9.0)).unwrap(),
            Verdict::AlreadyTriggered
        ));

        assert_eq!(pipeline.reset(), DetectionState::Monitoring);
        // Window survived the reset, so one push evaluates immediately
        let verdict = pipeline.ingest(moving_sample(10.0)).unwrap();
        assert!(matches!(verdict, Verdict::Processed { .. }));
        assert_eq!(pipeline.status().buffer_size, 3);
    }

    #[test]
    fn test_non_latching_keeps_evaluating() {
        let pipeline = small_pipeline(0.9, false);
        for i in 0..3 {
            pipeline.ingest(moving_sample(i as f64)).unwrap();
        }
        let v1 = pipeline.ingest(moving_sample(5.0)).unwrap();
        let v2 = pipeline.ingest(moving_sample(6.0)).unwrap();
        assert!(v1.is_fall());
        assert!(v2.is_fall());
        assert_eq!(pipeline.status().state, DetectionState::Monitoring);
    }

    #[test]
    fn test_low_score_does_not_trigger() {
        let pipeline = small_pipeline(0.2, true);
        for i in 0..5 {
            let verdict = pipeline.ingest(moving_sample(i as f64)).unwrap();
            assert!(!verdict.is_fall());
        }
        assert_eq!(pipeline.status().state, DetectionState::Monitoring);
    }

    #[test]
    fn test_calibrate_empty_window_is_harmless() {
        let pipeline = small_pipeline(0.5, true);
        let outcome = pipeline.calibrate(50);
        assert!(!outcome.calibrated);
        assert_eq!(outcome.samples_used, 0);
        assert!(!pipeline.status().calibrated);
    }

    #[test]
    fn test_calibrated_pipeline_still_evaluates() {
        let pipeline = small_pipeline(0.9, false);
        pipeline.ingest(moving_sample(1.0)).unwrap();
        pipeline.ingest(moving_sample(2.0)).unwrap();

        let outcome = pipeline.calibrate(2);
        assert!(outcome.calibrated);
        assert_eq!(outcome.samples_used, 2);
        assert!(pipeline.status().calibrated);

        let verdict = pipeline.ingest(moving_sample(3.0)).unwrap();
        assert!(matches!(verdict, Verdict::Processed { .. }));
    }

    #[test]
    fn test_status_reports_detection_summary() {
        let pipeline = small_pipeline(0.9, false);
        for i in 0..5 {
            pipeline.ingest(moving_sample(i as f64)).unwrap();
        }

        let status = pipeline.status();
        // Windows evaluated from the third sample onwards
        assert_eq!(status.detections.evaluations, 3);
        assert_eq!(status.detections.positives, 3);
        assert!((status.detections.peak_confidence - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_zero_window_size_rejected() {
        let config = DetectorConfig::builder().window_size(0).build();
        let result = FallPipeline::with_scorer(config, Box::new(ConstantScorer::new(0.5)));
        assert!(result.is_err());
    }
}
