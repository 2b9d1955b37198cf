//! Core trait definitions for the FallSense system.
//!
//! The detection pipeline treats the trained classifier as an opaque scoring
//! function behind the [`FallScorer`] trait. Everything the pipeline knows
//! about a model is that it maps a normalized feature vector to a probability
//! in [0, 1]; model architecture, training, and file formats live behind
//! implementations of this trait.

use ndarray::Array1;

use crate::error::CoreResult;

/// A trained classifier that scores normalized feature vectors.
///
/// Implementations must be pure with respect to scoring: calling
/// [`score`](FallScorer::score) twice with the same input must produce the
/// same output. The pipeline relies on this to keep window evaluation
/// deterministic.
///
/// # Example
///
/// ```rust
/// use fallsense_core::FallScorer;
/// use fallsense_core::error::CoreResult;
/// use ndarray::Array1;
///
/// struct AlwaysHalf;
///
/// impl FallScorer for AlwaysHalf {
///     fn score(&self, _features: &Array1<f64>) -> CoreResult<f64> {
///         Ok(0.5)
///     }
/// }
/// ```
pub trait FallScorer: Send + Sync {
    /// Scores a normalized feature vector into a fall probability in [0, 1].
    ///
    /// # Errors
    ///
    /// Returns an error if the input dimensionality does not match the model
    /// or the model produces a non-finite value.
    fn score(&self, features: &Array1<f64>) -> CoreResult<f64>;

    /// The input dimensionality this scorer was fitted against, when known.
    ///
    /// Pipelines cross-check this against the feature schema at startup;
    /// `None` means the scorer accepts any width (e.g. test stubs).
    fn feature_count(&self) -> Option<usize> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(f64);

    impl FallScorer for Fixed {
        fn score(&self, _features: &Array1<f64>) -> CoreResult<f64> {
            Ok(self.0)
        }
    }

    #[test]
    fn test_scorer_object_safety() {
        let scorer: Box<dyn FallScorer> = Box::new(Fixed(0.7));
        let features = Array1::zeros(4);
        assert!((scorer.score(&features).unwrap() - 0.7).abs() < f64::EPSILON);
        assert!(scorer.feature_count().is_none());
    }
}
