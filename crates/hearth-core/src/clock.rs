//! Monotonic millisecond clock
//!
//! Target microcontrollers expose a free-running 32-bit millisecond counter
//! that wraps roughly every 49.7 days. Everything that compares times must
//! go through [`millis_since`] / [`deadline_reached`] so the wrap is
//! handled with wrapping arithmetic instead of plain ordering.

use std::cell::Cell;
use std::time::Instant;

/// Half the counter range; a deadline further out than this is
/// indistinguishable from one that already passed.
const HALF_RANGE: u32 = u32::MAX / 2;

/// Milliseconds since boot, wrapping at `u32::MAX`.
pub trait MonotonicClock {
    /// Current counter value.
    fn millis(&self) -> u32;
}

/// Elapsed milliseconds from `since` to `now`, correct across counter wrap.
pub fn millis_since(now: u32, since: u32) -> u32 {
    now.wrapping_sub(since)
}

/// Whether `deadline` has been reached at `now`, correct across counter wrap.
///
/// A deadline counts as reached once it lies within half the counter range
/// behind `now`, which limits schedulable delays to ~24.8 days.
pub fn deadline_reached(now: u32, deadline: u32) -> bool {
    now.wrapping_sub(deadline) < HALF_RANGE
}

/// Host-side clock backed by [`Instant`].
///
/// Truncating the elapsed milliseconds to `u32` reproduces the counter wrap
/// of the hardware clock.
pub struct SystemClock {
    boot: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            boot: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock for SystemClock {
    fn millis(&self) -> u32 {
        self.boot.elapsed().as_millis() as u32
    }
}

/// Clock advanced explicitly by the caller.
///
/// Used by tests and the simulator so timing behavior can be exercised
/// without sleeping.
pub struct ManualClock {
    now: Cell<u32>,
}

impl ManualClock {
    pub fn new(start: u32) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    /// Move the clock forward by `ms`, wrapping like the hardware counter.
    pub fn advance(&self, ms: u32) {
        self.now.set(self.now.get().wrapping_add(ms));
    }
}

impl MonotonicClock for ManualClock {
    fn millis(&self) -> u32 {
        self.now.get()
    }
}
