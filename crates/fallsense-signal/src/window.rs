//! Bounded sliding window over incoming sensor samples.

use std::collections::VecDeque;

use ndarray::Array2;

use fallsense_core::{SensorSample, SAMPLE_WIDTH};

/// Order-preserving sliding buffer of the most recent sensor samples.
///
/// The window holds at most `capacity` samples. Pushing into a full window
/// evicts the oldest entry first (strict FIFO; recency of insertion, not of
/// access, governs eviction). Repeated identical samples are all retained
/// individually; there is no compaction or deduplication.
#[derive(Debug, Clone)]
pub struct SampleWindow {
    samples: VecDeque<SensorSample>,
    capacity: usize,
}

impl SampleWindow {
    /// Creates a window holding at most `capacity` samples.
    ///
    /// A zero capacity is promoted to one so the window can always make
    /// progress.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a sample, evicting the oldest entry if the window is full.
    pub fn push(&mut self, sample: SensorSample) {
        if self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    /// Returns `true` once the window holds `capacity` samples.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.samples.len() == self.capacity
    }

    /// Number of samples currently buffered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the window holds no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Maximum number of samples the window retains.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the buffered samples in arrival order without mutating state.
    #[must_use]
    pub fn snapshot(&self) -> Vec<SensorSample> {
        self.samples.iter().copied().collect()
    }

    /// Returns the last `n` samples in arrival order (fewer if the window
    /// holds fewer).
    #[must_use]
    pub fn tail(&self, n: usize) -> Vec<SensorSample> {
        let skip = self.samples.len().saturating_sub(n);
        self.samples.iter().skip(skip).copied().collect()
    }

    /// Converts the buffered samples into a `len x SAMPLE_WIDTH` matrix in
    /// arrival order.
    #[must_use]
    pub fn to_matrix(&self) -> Array2<f64> {
        let mut matrix = Array2::zeros((self.samples.len(), SAMPLE_WIDTH));
        for (i, sample) in self.samples.iter().enumerate() {
            for (j, &value) in sample.as_slice().iter().enumerate() {
                matrix[[i, j]] = value;
            }
        }
        matrix
    }

    /// Removes all buffered samples.
    pub fn clear(&mut self) {
        self.samples.clear();
    }
}
