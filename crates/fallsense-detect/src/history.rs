//! Detection log.
//!
//! Bounded ring of recent window evaluations with summary statistics,
//! surfaced through the pipeline's status report. Process-lifetime only.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One recorded window evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct DetectionRecord {
    /// Smoothed confidence reported for the window
    pub confidence: f64,
    /// Whether the window declared a fall
    pub fall_detected: bool,
    /// When the evaluation completed
    pub timestamp: DateTime<Utc>,
}

/// Summary statistics over all recorded evaluations.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DetectionSummary {
    /// Total windows evaluated since startup
    pub evaluations: u64,
    /// Windows that declared a fall
    pub positives: u64,
    /// Fraction of evaluations that declared a fall
    pub detection_rate: f64,
    /// Highest smoothed confidence seen
    pub peak_confidence: f64,
}

/// Capacity-limited log of recent evaluations plus running counters.
///
/// The counters cover the whole process lifetime; only the per-record ring
/// is bounded.
#[derive(Debug, Clone)]
pub struct DetectionLog {
    records: VecDeque<DetectionRecord>,
    capacity: usize,
    evaluations: u64,
    positives: u64,
    peak_confidence: f64,
}

impl DetectionLog {
    /// Creates a log retaining at most `capacity` recent records.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity,
            evaluations: 0,
            positives: 0,
            peak_confidence: 0.0,
        }
    }

    /// Records a completed window evaluation.
    pub fn record(&mut self, confidence: f64, fall_detected: bool) {
        if self.records.len() >= self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(DetectionRecord {
            confidence,
            fall_detected,
            timestamp: Utc::now(),
        });

        self.evaluations += 1;
        if fall_detected {
            self.positives += 1;
        }
        if confidence > self.peak_confidence {
            self.peak_confidence = confidence;
        }
    }

    /// The most recent record, if any.
    #[must_use]
    pub fn latest(&self) -> Option<&DetectionRecord> {
        self.records.back()
    }

    /// Number of records currently retained.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no records are retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Maximum retained record count.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Summary statistics over all evaluations since startup.
    #[must_use]
    pub fn summary(&self) -> DetectionSummary {
        DetectionSummary {
            evaluations: self.evaluations,
            positives: self.positives,
            detection_rate: if self.evaluations > 0 {
                self.positives as f64 / self.evaluations as f64
            } else {
                0.0
            },
            peak_confidence: self.peak_confidence,
        }
    }

    /// Clears the record ring. Lifetime counters are preserved.
    pub fn clear(&mut self) {
        self.records.clear();
    }
}
