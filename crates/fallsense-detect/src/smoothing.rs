//! Temporal smoothing of classifier output.
//!
//! A single window can score high on transient noise. The smoother keeps a
//! bounded history of recent raw scores and reports their arithmetic mean,
//! so the thresholded confidence reflects a run of windows rather than one.

use std::collections::VecDeque;

/// Bounded FIFO of recent raw classifier scores.
#[derive(Debug, Clone)]
pub struct ConfidenceSmoother {
    scores: VecDeque<f64>,
    capacity: usize,
}

impl ConfidenceSmoother {
    /// Creates a smoother retaining at most `capacity` scores.
    ///
    /// A zero capacity is promoted to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            scores: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a raw score, evicting the oldest when full.
    pub fn push(&mut self, score: f64) {
        if self.scores.len() >= self.capacity {
            self.scores.pop_front();
        }
        self.scores.push_back(score);
    }

    /// Arithmetic mean of the retained scores, or `None` when empty.
    ///
    /// Callers fall back to the raw score on `None`, so the first-ever
    /// evaluation reports its unsmoothed probability.
    #[must_use]
    pub fn smoothed(&self) -> Option<f64> {
        if self.scores.is_empty() {
            return None;
        }
        Some(self.scores.iter().sum::<f64>() / self.scores.len() as f64)
    }

    /// Number of scores currently retained.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Whether the history is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Maximum number of retained scores.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Discards all retained scores.
    pub fn clear(&mut self) {
        self.scores.clear();
    }
}
