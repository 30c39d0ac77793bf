//! Millisecond time model.
//!
//! # Design
//!
//! Travel is simulated over real elapsed time, so the canonical unit is a
//! monotonically increasing millisecond counter, [`TimeMs`].  The library
//! never reads a clock on its own: every scheduler operation takes
//! `now: TimeMs` explicitly, which keeps the whole state machine a pure
//! function of its inputs and makes tests trivially deterministic.
//!
//! Real hosts derive `now` from a [`GameClock`], which anchors `TimeMs(0)`
//! at its construction instant.  Where the timeline's zero sits is
//! irrelevant; only differences are ever used.

use std::fmt;
use std::time::Instant;

// ── TimeMs ────────────────────────────────────────────────────────────────────

/// An absolute instant on the host's travel timeline, in milliseconds.
///
/// Stored as `u64`: at 1 ms resolution that is ~584 million years of play.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeMs(pub u64);

impl TimeMs {
    pub const ZERO: TimeMs = TimeMs(0);

    /// The instant `ms` milliseconds after `self`.
    #[inline]
    pub fn offset(self, ms: u64) -> TimeMs {
        TimeMs(self.0 + ms)
    }

    /// Milliseconds elapsed from `earlier` to `self`, saturating at zero.
    ///
    /// Saturation (rather than a panic) matters for interpolation: a caller
    /// holding a slightly stale `now` must read a clamped zero progress, not
    /// crash the frame.
    #[inline]
    pub fn since(self, earlier: TimeMs) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for TimeMs {
    type Output = TimeMs;
    #[inline]
    fn add(self, rhs: u64) -> TimeMs {
        TimeMs(self.0 + rhs)
    }
}

impl fmt::Display for TimeMs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

// ── GameClock ─────────────────────────────────────────────────────────────────

/// Maps the process's monotonic clock onto the [`TimeMs`] timeline.
///
/// Construct one at simulation start and pass `clock.now()` into every
/// scheduler call.  Tests skip this entirely and fabricate `TimeMs` values.
#[derive(Clone, Debug)]
pub struct GameClock {
    origin: Instant,
}

impl GameClock {
    /// A clock whose `TimeMs(0)` is the moment of this call.
    pub fn start() -> Self {
        Self { origin: Instant::now() }
    }

    /// Milliseconds elapsed since the clock started.
    pub fn now(&self) -> TimeMs {
        TimeMs(self.origin.elapsed().as_millis() as u64)
    }
}
