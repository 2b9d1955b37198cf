//! Classifier adapters.
//!
//! The pipeline consumes any [`FallScorer`]; this module provides the two
//! implementations the repository ships: the artifact-backed
//! [`LogisticModel`] used in production and the fixed-output
//! [`ConstantScorer`] used by tests and benches.

use ndarray::Array1;

use fallsense_core::error::{CoreResult, ModelError};
use fallsense_core::FallScorer;

use crate::artifacts::LogisticParams;

/// Logistic regression scorer over normalized features.
#[derive(Debug, Clone)]
pub struct LogisticModel {
    weights: Array1<f64>,
    bias: f64,
}

impl LogisticModel {
    /// Builds a model from validated classifier parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::ClassifierUnavailable`] when the weight vector
    /// is empty and the underlying validation error when its width does not
    /// match the feature schema.
    pub fn from_params(params: &LogisticParams) -> CoreResult<Self> {
        if params.weights.is_empty() {
            return Err(ModelError::classifier_unavailable("empty weight vector").into());
        }
        params.validate(fallsense_signal::FeatureKey::COUNT)?;
        Ok(Self {
            weights: Array1::from_vec(params.weights.clone()),
            bias: params.bias,
        })
    }

    /// The model bias term.
    #[must_use]
    pub fn bias(&self) -> f64 {
        self.bias
    }
}

impl FallScorer for LogisticModel {
    fn score(&self, features: &Array1<f64>) -> CoreResult<f64> {
        if features.len() != self.weights.len() {
            return Err(ModelError::ParameterLength {
                parameter: "features",
                expected: self.weights.len(),
                actual: features.len(),
            }
            .into());
        }

        let z = self.weights.dot(features) + self.bias;
        let probability = 1.0 / (1.0 + (-z).exp());
        if !probability.is_finite() {
            return Err(ModelError::InvalidScore { value: probability }.into());
        }
        Ok(probability.clamp(0.0, 1.0))
    }

    fn feature_count(&self) -> Option<usize> {
        Some(self.weights.len())
    }
}

/// Scorer that returns a fixed probability for any input.
///
/// Useful for exercising the pipeline's windowing, smoothing, and policy
/// behavior independently of a fitted model.
#[derive(Debug, Clone, Copy)]
pub struct ConstantScorer {
    value: f64,
}

impl ConstantScorer {
    /// Creates a scorer returning `value`, clamped into [0, 1].
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self {
            value: value.clamp(0.0, 1.0),
        }
    }
}

impl FallScorer for ConstantScorer {
    fn score(&self, _features: &Array1<f64>) -> CoreResult<f64> {
        Ok(self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fallsense_signal::FeatureKey;

    fn uniform_model(weight: f64, bias: f64) -> LogisticModel {
        LogisticModel::from_params(&LogisticParams {
            weights: vec![weight; FeatureKey::COUNT],
            bias,
        })
        .unwrap()
    }

    #[test]
    fn test_zero_model_scores_half() {
        let model = uniform_model(0.0, 0.0);
        let features = Array1::zeros(FeatureKey::COUNT);
        assert!((model.score(&features).unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_bias_shifts_score() {
        let features = Array1::zeros(FeatureKey::COUNT);

        let positive = uniform_model(0.0, 10.0);
        assert!(positive.score(&features).unwrap() > 0.99);

        let negative = uniform_model(0.0, -10.0);
        assert!(negative.score(&features).unwrap() < 0.01);
    }

    #[test]
    fn test_score_is_deterministic_and_bounded() {
        let model = uniform_model(0.3, -1.0);
        let features = Array1::from_elem(FeatureKey::COUNT, 2.0);

        let first = model.score(&features).unwrap();
        let second = model.score(&features).unwrap();
        assert!((first - second).abs() < f64::EPSILON);
        assert!((0.0..=1.0).contains(&first));
    }

    #[test]
    fn test_extreme_inputs_saturate_without_fault() {
        let model = uniform_model(1.0, 0.0);

        let huge = Array1::from_elem(FeatureKey::COUNT, 1e6);
        assert!((model.score(&huge).unwrap() - 1.0).abs() < 1e-9);

        let tiny = Array1::from_elem(FeatureKey::COUNT, -1e6);
        assert!(model.score(&tiny).unwrap() < 1e-9);
    }

    #[test]
    fn test_width_mismatch_rejected() {
        let model = uniform_model(0.1, 0.0);
        let wrong = Array1::zeros(4);
        assert!(model.score(&wrong).is_err());
    }

    #[test]
    fn test_feature_count_reported() {
        let model = uniform_model(0.1, 0.0);
        assert_eq!(model.feature_count(), Some(FeatureKey::COUNT));
    }

    #[test]
    fn test_empty_weights_unavailable() {
        let err = LogisticModel::from_params(&LogisticParams {
            weights: vec![],
            bias: 0.0,
        })
        .unwrap_err();
        assert!(err.to_string().contains("Classifier unavailable"));
    }

    #[test]
    fn test_constant_scorer_clamps() {
        let scorer = ConstantScorer::new(1.7);
        let features = Array1::zeros(3);
        assert!((scorer.score(&features).unwrap() - 1.0).abs() < f64::EPSILON);
        assert!(scorer.feature_count().is_none());
    }
}
