//! Detection policy state machine.
//!
//! Combines the smoothed confidence, the stationarity feature, and the
//! configured threshold into the final verdict, and owns the latch that
//! stops a confirmed fall from re-firing on every subsequent sample.

use tracing::info;

use fallsense_core::DetectionState;

/// Latching decision state machine for one detection stream.
///
/// Streams start in [`DetectionState::Idle`] and move to
/// [`DetectionState::Monitoring`] on their first full-window evaluation.
/// With latching enabled, a positive verdict moves the stream to
/// [`DetectionState::Triggered`], which suppresses all further evaluation
/// until [`reset`](DetectionPolicy::reset). Without latching the
/// `Triggered` state is unreachable and every ready window is evaluated
/// independently.
#[derive(Debug, Clone)]
pub struct DetectionPolicy {
    state: DetectionState,
    latch_on_trigger: bool,
}

impl DetectionPolicy {
    /// Creates a policy in the `Idle` state.
    #[must_use]
    pub fn new(latch_on_trigger: bool) -> Self {
        Self {
            state: DetectionState::Idle,
            latch_on_trigger,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> DetectionState {
        self.state
    }

    /// Whether a positive verdict latches the stream.
    #[must_use]
    pub fn latch_on_trigger(&self) -> bool {
        self.latch_on_trigger
    }

    /// Whether evaluation is currently suppressed by the latch.
    #[must_use]
    pub fn is_suppressed(&self) -> bool {
        self.latch_on_trigger && self.state.is_triggered()
    }

    /// Applies the decision rule to a completed window evaluation.
    ///
    /// A fall is declared when the smoothed confidence strictly exceeds the
    /// threshold *and* the window's stationarity feature is off. The
    /// stationarity check here is a second gate: it rejects a confident
    /// score produced during a motionless period even when the cheap
    /// deviation pre-check upstream already passed.
    pub fn evaluate(&mut self, smoothed: f64, threshold: f64, stationary_flag: f64) -> bool {
        let is_event = smoothed > threshold && stationary_flag < 0.5;

        if is_event && self.latch_on_trigger {
            info!(confidence = smoothed, "fall confirmed, latching stream");
            self.state = DetectionState::Triggered;
        } else {
            self.state = DetectionState::Monitoring;
        }

        is_event
    }

    /// Releases the latch, returning the stream to `Monitoring`.
    ///
    /// Does not touch the window or the confidence history; only the latch
    /// is cleared.
    pub fn reset(&mut self) -> DetectionState {
        self.state = DetectionState::Monitoring;
        self.state
    }
}
