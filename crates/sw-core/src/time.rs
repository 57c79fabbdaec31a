//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing `Tick` counter advanced once per
//! scheduling quantum.  Every duration in the game (dwell, warning interval,
//! wave length, rest, …) is configured in seconds and resolved to a whole
//! number of ticks once, at session build time, via
//! [`SimClock::ticks_for_secs`].  After that all timer arithmetic is integer
//! and exact.
//!
//! Suspension points ("wait N seconds, then …") are expressed as
//! [`Countdown`]s that the owner ticks once per quantum.  A countdown can be
//! cancelled, after which it never fires.

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// Ticks elapsed from `earlier` to `self` (saturating).
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Maps ticks to elapsed seconds for a fixed quantum.
#[derive(Clone, Debug)]
pub struct SimClock {
    /// Milliseconds represented by one tick.
    pub tick_duration_ms: u32,
    /// The current tick: advanced by [`SimClock::advance`] each iteration.
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new(tick_duration_ms: u32) -> Self {
        Self { tick_duration_ms, current_tick: Tick::ZERO }
    }

    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Seconds represented by one tick.
    #[inline]
    pub fn secs_per_tick(&self) -> f32 {
        self.tick_duration_ms as f32 / 1_000.0
    }

    /// Elapsed simulated seconds since tick 0.
    #[inline]
    pub fn elapsed_secs(&self) -> f64 {
        self.current_tick.0 as f64 * self.tick_duration_ms as f64 / 1_000.0
    }

    /// How many ticks span `secs` seconds?  Rounds up, so a timer never
    /// fires early.  Negative or NaN inputs resolve to zero ticks.
    pub fn ticks_for_secs(&self, secs: f32) -> u64 {
        if secs.is_nan() || secs <= 0.0 || self.tick_duration_ms == 0 {
            return 0;
        }
        let ms = (secs as f64 * 1_000.0).round() as u64;
        ms.div_ceil(self.tick_duration_ms as u64)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.1}s)", self.current_tick, self.elapsed_secs())
    }
}

// ── Countdown ─────────────────────────────────────────────────────────────────

/// A revocable one-shot timer measured in ticks.
///
/// [`tick`](Self::tick) returns `true` exactly once, on the tick the
/// countdown reaches zero.  A countdown armed with zero ticks fires on its
/// first `tick()`.  After [`cancel`](Self::cancel) it never fires.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct Countdown {
    remaining: u64,
    armed:     bool,
}

impl Countdown {
    /// An armed countdown that fires after `ticks` calls to `tick()`.
    pub fn new(ticks: u64) -> Self {
        Self { remaining: ticks, armed: true }
    }

    /// A countdown that is not running.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Advance by one tick.  Returns `true` on the firing tick.
    pub fn tick(&mut self) -> bool {
        if !self.armed {
            return false;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.armed = false;
            return true;
        }
        false
    }

    /// Re-arm with a fresh duration.
    pub fn reset(&mut self, ticks: u64) {
        *self = Self::new(ticks);
    }

    /// Disarm; the countdown will not fire until re-armed.
    pub fn cancel(&mut self) {
        self.armed = false;
        self.remaining = 0;
    }

    #[inline]
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Ticks left before firing (0 when idle).
    #[inline]
    pub fn remaining(&self) -> u64 {
        if self.armed { self.remaining } else { 0 }
    }
}
