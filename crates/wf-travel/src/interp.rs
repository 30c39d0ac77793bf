//! Continuous position within a timed step.
//!
//! Agent records only store coordinates at step granularity; anything that
//! wants a smooth position mid-step (map rendering, proximity checks,
//! snapshots on cancel) derives it here from the step's time window.

use wf_core::{Coord, TimeMs};

use crate::itinerary::ItineraryStep;

/// The game-time window one itinerary step runs over.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StepWindow {
    pub start: TimeMs,
    pub end:   TimeMs,
}

impl StepWindow {
    pub fn duration_ms(&self) -> u64 {
        self.end.since(self.start)
    }

    /// Fraction of the window elapsed at `now`, clamped to `[0, 1]`.
    ///
    /// A zero-length window counts as already complete.
    pub fn progress(&self, now: TimeMs) -> f64 {
        let total = self.end.since(self.start);
        if total == 0 {
            return 1.0;
        }
        let elapsed = now.since(self.start);
        (elapsed as f64 / total as f64).min(1.0)
    }
}

/// Position along `step` at `now`.
///
/// Travel steps interpolate linearly between their endpoints; rest steps pin
/// to the stop. Times outside the window clamp to the nearer endpoint.
pub fn step_position(step: &ItineraryStep, window: StepWindow, now: TimeMs) -> Coord {
    match step {
        ItineraryStep::Travel { from, to, .. } => from.lerp(*to, window.progress(now)),
        ItineraryStep::Rest { at, .. } => *at,
    }
}
