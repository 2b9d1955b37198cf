//! Common statistical helpers for the FallSense system.
//!
//! These are the shared numeric primitives the feature extractor and the
//! detection policy are built on. All deviations use the population form
//! (divide by `n`), matching the statistics the model artifacts were fitted
//! against.

/// Computes the arithmetic mean of a slice. Returns 0.0 for an empty slice.
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Computes the population standard deviation of a slice.
///
/// Returns 0.0 for an empty slice.
#[must_use]
pub fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Computes the peak-to-peak range (max - min) of a slice.
///
/// Returns 0.0 for an empty slice.
#[must_use]
pub fn value_range(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    max - min
}

/// Arccosine with the argument clamped into [-1, 1].
///
/// Floating-point error can push a normalized dot product slightly outside
/// the valid domain; the clamp keeps the result defined instead of NaN.
#[must_use]
pub fn safe_arccos(value: f64) -> f64 {
    value.clamp(-1.0, 1.0).acos()
}

/// Bins values into `bins` equal-width histogram buckets over [min, max].
///
/// The top edge is inclusive, so the maximum value lands in the last bucket.
/// When all values are identical the counts collapse into the first bucket.
/// Returns an empty vector when `bins` is zero or `values` is empty.
#[must_use]
pub fn histogram_counts(values: &[f64], bins: usize) -> Vec<usize> {
    if bins == 0 || values.is_empty() {
        return Vec::new();
    }

    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let span = max - min;

    let mut counts = vec![0_usize; bins];
    if span <= f64::EPSILON {
        counts[0] = values.len();
        return counts;
    }

    for &v in values {
        let mut index = ((v - min) / span * bins as f64) as usize;
        if index >= bins {
            index = bins - 1;
        }
        counts[index] += 1;
    }
    counts
}

/// Shannon entropy (natural log) of a histogram's counts.
///
/// Counts are normalized to probabilities; zero buckets contribute nothing.
/// Returns 0.0 when the total count is zero.
#[must_use]
pub fn shannon_entropy(counts: &[usize]) -> f64 {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / total;
            -p * p.ln()
        })
        .sum()
}
