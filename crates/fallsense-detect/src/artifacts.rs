//! Model artifacts consumed at startup.
//!
//! The pipeline never trains anything; it loads three read-only artifacts
//! produced by the offline training job and validates them against the
//! compiled-in feature schema before accepting a single sample:
//!
//! - the fitted **feature schema** (ordered feature names),
//! - the **scaler parameters** (per-feature mean and scale),
//! - the **classifier parameters** (logistic weights and bias).
//!
//! Every mismatch is a typed, startup-fatal error; schema drift must never
//! surface as a per-request surprise.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use fallsense_core::error::{CoreResult, ModelError};
use fallsense_signal::FeatureKey;

/// Ordered feature names the scaler and classifier were fitted against.
///
/// Stored on disk as a plain JSON array of strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureSchema {
    names: Vec<String>,
}

impl FeatureSchema {
    /// Creates a schema from an ordered name list.
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    /// The canonical schema produced by the current feature extractor.
    pub fn canonical() -> Self {
        Self {
            names: FeatureKey::all().iter().map(|k| k.name().to_owned()).collect(),
        }
    }

    /// Number of features in the schema.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the schema is empty.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// The ordered feature names.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Validates that this schema exactly matches the extractor's key set
    /// and order.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::SchemaMismatch`] naming the first divergence.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.names.len() != FeatureKey::COUNT {
            return Err(ModelError::schema_mismatch(format!(
                "expected {} features, artifact has {}",
                FeatureKey::COUNT,
                self.names.len()
            )));
        }
        for (index, key) in FeatureKey::all().iter().enumerate() {
            if self.names[index] != key.name() {
                return Err(ModelError::schema_mismatch(format!(
                    "feature {index} is '{}', expected '{}'",
                    self.names[index],
                    key.name()
                )));
            }
        }
        Ok(())
    }
}

/// Fitted per-feature affine transform parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerParams {
    /// Per-feature mean subtracted before scaling
    pub mean: Vec<f64>,
    /// Per-feature scale divided after centering
    pub scale: Vec<f64>,
}

impl ScalerParams {
    /// Identity transform (zero mean, unit scale) of the given width.
    pub fn identity(len: usize) -> Self {
        Self {
            mean: vec![0.0; len],
            scale: vec![1.0; len],
        }
    }

    /// Validates parameter lengths and scale degeneracy.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::ParameterLength`] when a vector has the wrong
    /// width and [`ModelError::DegenerateScale`] when a scale entry would
    /// divide by zero.
    pub fn validate(&self, expected: usize) -> Result<(), ModelError> {
        if self.mean.len() != expected {
            return Err(ModelError::ParameterLength {
                parameter: "mean",
                expected,
                actual: self.mean.len(),
            });
        }
        if self.scale.len() != expected {
            return Err(ModelError::ParameterLength {
                parameter: "scale",
                expected,
                actual: self.scale.len(),
            });
        }
        if let Some(index) = self.scale.iter().position(|s| s.abs() < 1e-12) {
            return Err(ModelError::DegenerateScale { index });
        }
        Ok(())
    }
}

/// Fitted logistic classifier parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticParams {
    /// Per-feature weights in schema order
    pub weights: Vec<f64>,
    /// Intercept term
    pub bias: f64,
}

impl LogisticParams {
    /// Validates the weight vector width.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::ParameterLength`] on a width mismatch.
    pub fn validate(&self, expected: usize) -> Result<(), ModelError> {
        if self.weights.len() != expected {
            return Err(ModelError::ParameterLength {
                parameter: "weights",
                expected,
                actual: self.weights.len(),
            });
        }
        Ok(())
    }
}

/// The complete set of startup artifacts for one fitted model.
#[derive(Debug, Clone)]
pub struct ModelArtifacts {
    /// Ordered feature schema
    pub schema: FeatureSchema,
    /// Scaler parameters
    pub scaler: ScalerParams,
    /// Classifier parameters
    pub model: LogisticParams,
}

impl ModelArtifacts {
    /// Assembles and cross-validates artifacts already held in memory.
    ///
    /// # Errors
    ///
    /// Returns the first schema or parameter inconsistency found; an
    /// artifact set that fails here must abort pipeline initialization.
    pub fn from_parts(
        schema: FeatureSchema,
        scaler: ScalerParams,
        model: LogisticParams,
    ) -> CoreResult<Self> {
        schema.validate()?;
        scaler.validate(schema.len())?;
        model.validate(schema.len())?;
        Ok(Self {
            schema,
            scaler,
            model,
        })
    }

    /// Loads and validates the three artifact files.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::ArtifactLoadFailed`] for unreadable or
    /// unparsable files, and the validation errors of
    /// [`from_parts`](Self::from_parts) for inconsistent contents.
    #[instrument(skip_all, fields(schema = %schema_path.as_ref().display()))]
    pub fn load(
        schema_path: impl AsRef<Path>,
        scaler_path: impl AsRef<Path>,
        model_path: impl AsRef<Path>,
    ) -> CoreResult<Self> {
        let schema: FeatureSchema = read_json(schema_path.as_ref())?;
        let scaler: ScalerParams = read_json(scaler_path.as_ref())?;
        let model: LogisticParams = read_json(model_path.as_ref())?;

        let artifacts = Self::from_parts(schema, scaler, model)?;
        info!(
            features = artifacts.schema.len(),
            "model artifacts loaded and validated"
        );
        Ok(artifacts)
    }

    /// A pass-through artifact set: canonical schema, identity scaler, and
    /// an all-zero logistic model (every window scores 0.5).
    ///
    /// Intended for tests and benches that exercise the pipeline without a
    /// fitted model.
    pub fn identity() -> Self {
        let schema = FeatureSchema::canonical();
        let len = schema.len();
        Self {
            schema,
            scaler: ScalerParams::identity(len),
            model: LogisticParams {
                weights: vec![0.0; len],
                bias: 0.0,
            },
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ModelError> {
    let text = fs::read_to_string(path)
        .map_err(|e| ModelError::artifact_load_failed(path.display().to_string(), e.to_string()))?;
    serde_json::from_str(&text)
        .map_err(|e| ModelError::artifact_load_failed(path.display().to_string(), e.to_string()))
}
