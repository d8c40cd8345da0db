//! Frame time model.
//!
//! # Design
//!
//! Every control cycle is stamped with a monotonically non-decreasing
//! `FrameTime`.  The engine only ever subtracts timestamps (option time,
//! state time) and compares them for equality (cold-entry detection), so the
//! unit is up to the embedding application: a frame counter, milliseconds,
//! simulation ticks.
//!
//! `FrameClock` is a convenience for drivers without a clock of their own:
//! it starts at a given time and advances by a fixed step per cycle.

use std::fmt;

// ── FrameTime ────────────────────────────────────────────────────────────────

/// The timestamp of one control cycle.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameTime(pub u64);

impl FrameTime {
    pub const ZERO: FrameTime = FrameTime(0);

    /// Return the time `n` units after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> FrameTime {
        FrameTime(self.0 + n)
    }

    /// Units elapsed from `earlier` to `self`, saturating at zero.
    #[inline]
    pub fn since(self, earlier: FrameTime) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for FrameTime {
    type Output = FrameTime;
    #[inline]
    fn add(self, rhs: u64) -> FrameTime {
        FrameTime(self.0 + rhs)
    }
}

impl std::ops::Sub for FrameTime {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: FrameTime) -> u64 {
        self.since(rhs)
    }
}

impl fmt::Display for FrameTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F{}", self.0)
    }
}

// ── FrameClock ───────────────────────────────────────────────────────────────

/// Produces evenly spaced frame timestamps.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameClock {
    /// Timestamp of the first cycle.
    pub start: FrameTime,
    /// Units added per `advance()`.  A step of 0 is bumped to 1.
    pub step: u64,
    /// Timestamp of the current cycle.
    pub current: FrameTime,
    /// Number of completed `advance()` calls.
    pub cycles: u64,
}

impl FrameClock {
    pub fn new(start: FrameTime, step: u64) -> Self {
        Self {
            start,
            step: step.max(1),
            current: start,
            cycles: 0,
        }
    }

    /// A clock counting frames: 0, 1, 2, …
    pub fn frames() -> Self {
        Self::new(FrameTime::ZERO, 1)
    }

    /// Move to the next cycle and return its timestamp.
    #[inline]
    pub fn advance(&mut self) -> FrameTime {
        self.current = self.current + self.step;
        self.cycles += 1;
        self.current
    }

    /// Time elapsed since `start`.
    #[inline]
    pub fn elapsed(&self) -> u64 {
        self.current.since(self.start)
    }
}

impl fmt::Display for FrameClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (cycle {})", self.current, self.cycles)
    }
}
