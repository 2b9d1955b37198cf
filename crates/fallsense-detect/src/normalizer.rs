//! Feature normalization.
//!
//! Applies the fitted per-feature affine transform (`(x - mean) / scale`)
//! in schema order, producing the vector the classifier was trained on.

use ndarray::Array1;

use fallsense_core::error::CoreResult;
use fallsense_signal::WindowFeatures;

use crate::artifacts::ScalerParams;

/// Applies a previously fitted per-feature scale/shift to feature vectors.
#[derive(Debug, Clone)]
pub struct FeatureNormalizer {
    mean: Array1<f64>,
    scale: Array1<f64>,
}

impl FeatureNormalizer {
    /// Builds a normalizer from validated scaler parameters.
    ///
    /// # Errors
    ///
    /// Returns the underlying validation error when the parameters do not
    /// match the extractor's feature count.
    pub fn from_params(params: &ScalerParams) -> CoreResult<Self> {
        params.validate(fallsense_signal::FeatureKey::COUNT)?;
        Ok(Self {
            mean: Array1::from_vec(params.mean.clone()),
            scale: Array1::from_vec(params.scale.clone()),
        })
    }

    /// Identity normalizer (zero mean, unit scale).
    #[must_use]
    pub fn identity() -> Self {
        let len = fallsense_signal::FeatureKey::COUNT;
        Self {
            mean: Array1::zeros(len),
            scale: Array1::ones(len),
        }
    }

    /// Number of features the normalizer expects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mean.len()
    }

    /// Whether the normalizer is empty (never true in practice).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mean.is_empty()
    }

    /// Transforms a feature vector into normalized model input, preserving
    /// schema order.
    #[must_use]
    pub fn transform(&self, features: &WindowFeatures) -> Array1<f64> {
        let raw = Array1::from_vec(features.values().to_vec());
        (raw - &self.mean) / &self.scale
    }
}
