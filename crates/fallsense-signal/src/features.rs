//! Window feature extraction.
//!
//! This module turns a window of inertial samples into the fixed-schema
//! feature vector the fitted scaler and classifier expect. The schema is
//! pinned at compile time by the [`FeatureKey`] enum: the enum's declaration
//! order *is* the production order, and any extractor change is a schema
//! migration, not an ad-hoc key addition.
//!
//! Extraction is a pure function of the window matrix: the same snapshot
//! always produces the same [`WindowFeatures`].

use ndarray::{s, Array2};

use fallsense_core::utils::{
    histogram_counts, mean, population_std, safe_arccos, shannon_entropy, value_range,
};
use fallsense_core::{ACC_AXES, SAMPLE_WIDTH};

/// Keys of the window feature schema, in canonical production order.
///
/// The first 30 entries are per-axis descriptive statistics (five per axis,
/// accelerometer axes first), followed by the impact, motion, orientation,
/// and spectral summary features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum FeatureKey {
    /// Mean of accelerometer X axis
    AccXMean,
    /// Population standard deviation of accelerometer X axis
    AccXStd,
    /// Maximum of accelerometer X axis
    AccXMax,
    /// Minimum of accelerometer X axis
    AccXMin,
    /// Peak-to-peak range of accelerometer X axis
    AccXRange,
    /// Mean of accelerometer Y axis
    AccYMean,
    /// Population standard deviation of accelerometer Y axis
    AccYStd,
    /// Maximum of accelerometer Y axis
    AccYMax,
    /// Minimum of accelerometer Y axis
    AccYMin,
    /// Peak-to-peak range of accelerometer Y axis
    AccYRange,
    /// Mean of accelerometer Z axis
    AccZMean,
    /// Population standard deviation of accelerometer Z axis
    AccZStd,
    /// Maximum of accelerometer Z axis
    AccZMax,
    /// Minimum of accelerometer Z axis
    AccZMin,
    /// Peak-to-peak range of accelerometer Z axis
    AccZRange,
    /// Mean of gyroscope X axis
    GyroXMean,
    /// Population standard deviation of gyroscope X axis
    GyroXStd,
    /// Maximum of gyroscope X axis
    GyroXMax,
    /// Minimum of gyroscope X axis
    GyroXMin,
    /// Peak-to-peak range of gyroscope X axis
    GyroXRange,
    /// Mean of gyroscope Y axis
    GyroYMean,
    /// Population standard deviation of gyroscope Y axis
    GyroYStd,
    /// Maximum of gyroscope Y axis
    GyroYMax,
    /// Minimum of gyroscope Y axis
    GyroYMin,
    /// Peak-to-peak range of gyroscope Y axis
    GyroYRange,
    /// Mean of gyroscope Z axis
    GyroZMean,
    /// Population standard deviation of gyroscope Z axis
    GyroZStd,
    /// Maximum of gyroscope Z axis
    GyroZMax,
    /// Minimum of gyroscope Z axis
    GyroZMin,
    /// Peak-to-peak range of gyroscope Z axis
    GyroZRange,
    /// Max acc magnitude minus mean acc magnitude
    ImpactPeak,
    /// Count of samples whose acc magnitude exceeds mean + 2 std
    ImpactDuration,
    /// Mean absolute gyroscope value across all axes and samples
    AvgGyroMovement,
    /// Max absolute first difference of the acc magnitude series
    MaxAccChange,
    /// 1.0 when the window shows no meaningful motion, else 0.0
    IsStationary,
    /// Angle between the first and last accelerometer vectors (radians)
    OrientationChange,
    /// Population std of acc magnitude over the last quarter of the window
    PostImpactVar,
    /// Shannon entropy of a 10-bin acc magnitude histogram
    AccMagEntropy,
}

impl FeatureKey {
    /// Number of features in the schema.
    pub const COUNT: usize = 38;

    /// All keys in canonical production order.
    #[must_use]
    pub fn all() -> &'static [Self; Self::COUNT] {
        use FeatureKey::{
            AccMagEntropy, AccXMax, AccXMean, AccXMin, AccXRange, AccXStd, AccYMax, AccYMean,
            AccYMin, AccYRange, AccYStd, AccZMax, AccZMean, AccZMin, AccZRange, AccZStd,
            AvgGyroMovement, GyroXMax, GyroXMean, GyroXMin, GyroXRange, GyroXStd, GyroYMax,
            GyroYMean, GyroYMin, GyroYRange, GyroYStd, GyroZMax, GyroZMean, GyroZMin, GyroZRange,
            GyroZStd, ImpactDuration, ImpactPeak, IsStationary, MaxAccChange, OrientationChange,
            PostImpactVar,
        };
        &[
            AccXMean,
            AccXStd,
            AccXMax,
            AccXMin,
            AccXRange,
            AccYMean,
            AccYStd,
            AccYMax,
            AccYMin,
            AccYRange,
            AccZMean,
            AccZStd,
            AccZMax,
            AccZMin,
            AccZRange,
            GyroXMean,
            GyroXStd,
            GyroXMax,
            GyroXMin,
            GyroXRange,
            GyroYMean,
            GyroYStd,
            GyroYMax,
            GyroYMin,
            GyroYRange,
            GyroZMean,
            GyroZStd,
            GyroZMax,
            GyroZMin,
            GyroZRange,
            ImpactPeak,
            ImpactDuration,
            AvgGyroMovement,
            MaxAccChange,
            IsStationary,
            OrientationChange,
            PostImpactVar,
            AccMagEntropy,
        ]
    }

    /// Returns the feature name as it appears in the fitted schema artifact.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::AccXMean => "acc_x_mean",
            Self::AccXStd => "acc_x_std",
            Self::AccXMax => "acc_x_max",
            Self::AccXMin => "acc_x_min",
            Self::AccXRange => "acc_x_range",
            Self::AccYMean => "acc_y_mean",
            Self::AccYStd => "acc_y_std",
            Self::AccYMax => "acc_y_max",
            Self::AccYMin => "acc_y_min",
            Self::AccYRange => "acc_y_range",
            Self::AccZMean => "acc_z_mean",
            Self::AccZStd => "acc_z_std",
            Self::AccZMax => "acc_z_max",
            Self::AccZMin => "acc_z_min",
            Self::AccZRange => "acc_z_range",
            Self::GyroXMean => "gyro_x_mean",
            Self::GyroXStd => "gyro_x_std",
            Self::GyroXMax => "gyro_x_max",
            Self::GyroXMin => "gyro_x_min",
            Self::GyroXRange => "gyro_x_range",
            Self::GyroYMean => "gyro_y_mean",
            Self::GyroYStd => "gyro_y_std",
            Self::GyroYMax => "gyro_y_max",
            Self::GyroYMin => "gyro_y_min",
            Self::GyroYRange => "gyro_y_range",
            Self::GyroZMean => "gyro_z_mean",
            Self::GyroZStd => "gyro_z_std",
            Self::GyroZMax => "gyro_z_max",
            Self::GyroZMin => "gyro_z_min",
            Self::GyroZRange => "gyro_z_range",
            Self::ImpactPeak => "impact_peak",
            Self::ImpactDuration => "impact_duration",
            Self::AvgGyroMovement => "avg_gyro_movement",
            Self::MaxAccChange => "max_acc_change",
            Self::IsStationary => "is_stationary",
            Self::OrientationChange => "orientation_change",
            Self::PostImpactVar => "post_impact_var",
            Self::AccMagEntropy => "acc_mag_entropy",
        }
    }
}

/// Per-axis (mean, std, max, min, range) key blocks, accelerometer first.
const AXIS_STAT_KEYS: [[FeatureKey; 5]; SAMPLE_WIDTH] = [
    [
        FeatureKey::AccXMean,
        FeatureKey::AccXStd,
        FeatureKey::AccXMax,
        FeatureKey::AccXMin,
        FeatureKey::AccXRange,
    ],
    [
        FeatureKey::AccYMean,
        FeatureKey::AccYStd,
        FeatureKey::AccYMax,
        FeatureKey::AccYMin,
        FeatureKey::AccYRange,
    ],
    [
        FeatureKey::AccZMean,
        FeatureKey::AccZStd,
        FeatureKey::AccZMax,
        FeatureKey::AccZMin,
        FeatureKey::AccZRange,
    ],
    [
        FeatureKey::GyroXMean,
        FeatureKey::GyroXStd,
        FeatureKey::GyroXMax,
        FeatureKey::GyroXMin,
        FeatureKey::GyroXRange,
    ],
    [
        FeatureKey::GyroYMean,
        FeatureKey::GyroYStd,
        FeatureKey::GyroYMax,
        FeatureKey::GyroYMin,
        FeatureKey::GyroYRange,
    ],
    [
        FeatureKey::GyroZMean,
        FeatureKey::GyroZStd,
        FeatureKey::GyroZMax,
        FeatureKey::GyroZMin,
        FeatureKey::GyroZRange,
    ],
];

/// Fixed-schema feature vector indexed by [`FeatureKey`].
#[derive(Debug, Clone, PartialEq)]
pub struct WindowFeatures {
    values: [f64; FeatureKey::COUNT],
}

impl WindowFeatures {
    /// Creates a zeroed feature vector.
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: [0.0; FeatureKey::COUNT],
        }
    }

    /// Returns the value for a key.
    #[must_use]
    pub fn get(&self, key: FeatureKey) -> f64 {
        self.values[key as usize]
    }

    /// Sets the value for a key.
    pub fn set(&mut self, key: FeatureKey, value: f64) {
        self.values[key as usize] = value;
    }

    /// All values in canonical production order.
    #[must_use]
    pub fn values(&self) -> &[f64; FeatureKey::COUNT] {
        &self.values
    }

    /// Overwrites every same-named value with `other`'s values.
    ///
    /// Both passes of a calibrated evaluation produce the same key set, so
    /// the later (calibrated) pass wins wholesale.
    pub fn overwrite_with(&mut self, other: &Self) {
        self.values = other.values;
    }

    /// Iterates `(key, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (FeatureKey, f64)> + '_ {
        FeatureKey::all()
            .iter()
            .map(move |&key| (key, self.values[key as usize]))
    }
}

impl Default for WindowFeatures {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for window feature extraction.
#[derive(Debug, Clone)]
pub struct FeatureExtractorConfig {
    /// Mean absolute gyro movement below which the window may be stationary
    pub stationary_gyro_threshold: f64,
    /// Max acc magnitude change below which the window may be stationary
    pub stationary_acc_change_threshold: f64,
    /// Number of histogram buckets for the acc magnitude entropy feature
    pub entropy_bins: usize,
}

impl Default for FeatureExtractorConfig {
    fn default() -> Self {
        Self {
            stationary_gyro_threshold: 0.1,
            stationary_acc_change_threshold: 0.2,
            entropy_bins: 10,
        }
    }
}

/// Extracts the fixed-schema feature vector from a window matrix.
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    config: FeatureExtractorConfig,
}

impl FeatureExtractor {
    /// Creates a new feature extractor.
    #[must_use]
    pub fn new(config: FeatureExtractorConfig) -> Self {
        Self { config }
    }

    /// Creates an extractor with default configuration.
    #[must_use]
    pub fn default_config() -> Self {
        Self::new(FeatureExtractorConfig::default())
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &FeatureExtractorConfig {
        &self.config
    }

    /// Population standard deviation over the flattened accelerometer
    /// columns of a window matrix.
    ///
    /// Used as the cheap stationarity pre-check before any feature work.
    #[must_use]
    pub fn acc_std(window: &Array2<f64>) -> f64 {
        let acc: Vec<f64> = window.slice(s![.., ..ACC_AXES]).iter().copied().collect();
        population_std(&acc)
    }

    /// Extracts all window features from a `len x SAMPLE_WIDTH` matrix.
    ///
    /// Pure and deterministic: identical matrices yield identical output.
    /// Degenerate inputs (single-sample windows, zero-norm orientation
    /// vectors, short windows for entropy) produce explicit 0.0 fallbacks
    /// rather than numeric faults.
    #[must_use]
    pub fn extract(&self, window: &Array2<f64>) -> WindowFeatures {
        let n = window.nrows();
        let mut features = WindowFeatures::new();
        if n == 0 {
            return features;
        }

        // Per-sample accelerometer magnitude series
        let acc_mag: Vec<f64> = (0..n)
            .map(|i| {
                window
                    .slice(s![i, ..ACC_AXES])
                    .iter()
                    .map(|v| v * v)
                    .sum::<f64>()
                    .sqrt()
            })
            .collect();

        // Per-axis descriptive statistics
        for (axis, keys) in AXIS_STAT_KEYS.iter().enumerate() {
            let column: Vec<f64> = window.column(axis).to_vec();
            let max = column.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let min = column.iter().copied().fold(f64::INFINITY, f64::min);
            features.set(keys[0], mean(&column));
            features.set(keys[1], population_std(&column));
            features.set(keys[2], max);
            features.set(keys[3], min);
            features.set(keys[4], value_range(&column));
        }

        // Basic motion metrics
        let gyro: Vec<f64> = window
            .slice(s![.., ACC_AXES..])
            .iter()
            .map(|v| v.abs())
            .collect();
        let avg_gyro_movement = mean(&gyro);

        let max_acc_change = if n >= 2 {
            acc_mag
                .windows(2)
                .map(|pair| (pair[1] - pair[0]).abs())
                .fold(0.0, f64::max)
        } else {
            0.0
        };

        let is_stationary = if avg_gyro_movement < self.config.stationary_gyro_threshold
            && max_acc_change < self.config.stationary_acc_change_threshold
        {
            1.0
        } else {
            0.0
        };

        features.set(FeatureKey::AvgGyroMovement, avg_gyro_movement);
        features.set(FeatureKey::MaxAccChange, max_acc_change);
        features.set(FeatureKey::IsStationary, is_stationary);

        // Impact features
        let mag_mean = mean(&acc_mag);
        let mag_std = population_std(&acc_mag);
        let mag_max = acc_mag.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        features.set(FeatureKey::ImpactPeak, mag_max - mag_mean);
        let impact_duration = acc_mag
            .iter()
            .filter(|&&m| m > mag_mean + 2.0 * mag_std)
            .count();
        features.set(FeatureKey::ImpactDuration, impact_duration as f64);

        // Orientation change between the first and last acc vectors
        let orientation_change = if n >= 2 {
            let first = window.slice(s![0, ..ACC_AXES]);
            let last = window.slice(s![n - 1, ..ACC_AXES]);
            let dot: f64 = first.iter().zip(last.iter()).map(|(a, b)| a * b).sum();
            let norm_product = first.iter().map(|v| v * v).sum::<f64>().sqrt()
                * last.iter().map(|v| v * v).sum::<f64>().sqrt();
            if norm_product > 0.0 {
                safe_arccos(dot / norm_product)
            } else {
                0.0
            }
        } else {
            0.0
        };
        features.set(FeatureKey::OrientationChange, orientation_change);

        // Post-impact variation over the trailing quarter of the window
        let quarter = n / 4;
        let post_impact_var = if quarter > 0 {
            population_std(&acc_mag[n - quarter..])
        } else {
            0.0
        };
        features.set(FeatureKey::PostImpactVar, post_impact_var);

        // Acc magnitude entropy; meaningless below one sample per bucket
        let entropy = if n >= self.config.entropy_bins {
            shannon_entropy(&histogram_counts(&acc_mag, self.config.entropy_bins))
        } else {
            0.0
        };
        features.set(FeatureKey::AccMagEntropy, entropy);

        features
    }
}
