//! Simulation time model.
//!
//! # Design
//!
//! The motion engine advances in fixed steps of `dt_secs` simulated seconds.
//! Time is tracked as a monotonically increasing `Tick` counter and converted
//! to seconds on demand:
//!
//!   elapsed_secs = tick * dt_secs
//!
//! Periodic work (route re-evaluation, snapshots, spawn waves) is configured
//! in simulated seconds and converted to a tick interval once with
//! [`SimClock::ticks_for_secs`], so changing the step size never changes how
//! often agents re-plan in simulated time.

use std::fmt;

use crate::{EvacError, EvacResult};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation step counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// Steps elapsed from `earlier` to `self` (zero if `earlier` is later).
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

/// Maps step counts to simulated seconds.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Simulated seconds per step.
    pub dt_secs: f64,
    /// The current tick — advanced by `SimClock::advance()` each iteration.
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new(dt_secs: f64) -> Self {
        Self { dt_secs, current_tick: Tick::ZERO }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Elapsed simulated seconds since tick 0.
    #[inline]
    pub fn elapsed_secs(&self) -> f64 {
        self.secs_at(self.current_tick)
    }

    /// Simulated seconds at an arbitrary tick.
    #[inline]
    pub fn secs_at(&self, tick: Tick) -> f64 {
        tick.0 as f64 * self.dt_secs
    }

    /// How many ticks span `secs` seconds? Rounds up so a period is never
    /// shorter than requested, and never returns zero.
    pub fn ticks_for_secs(&self, secs: f64) -> u64 {
        // Guard against float noise like 2.0 / 0.01 = 200.00000000000003.
        let raw = secs / self.dt_secs;
        let rounded = raw.round();
        let ticks = if (raw - rounded).abs() < 1e-9 { rounded } else { raw.ceil() };
        (ticks as u64).max(1)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2} s)", self.current_tick, self.elapsed_secs())
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Run-level timing configuration.
///
/// Typically embedded in the scenario file loaded by the application and
/// passed to the simulation builder once; nothing reads it globally.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Simulated seconds per motion-engine step.  Default: 0.01.
    pub dt_secs: f64,

    /// Total simulated duration in seconds (exclusive upper bound).
    pub total_secs: f64,

    /// Pre-movement phase: agents stand still and no routes are evaluated.
    pub premovement_secs: f64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Emit a trajectory snapshot every N simulated seconds.  `0` disables.
    pub snapshot_interval_secs: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt_secs:                0.01,
            total_secs:             600.0,
            premovement_secs:       400.0,
            seed:                   1,
            snapshot_interval_secs: 1.0,
        }
    }
}

impl SimConfig {
    /// Reject step sizes and durations that would stall or invert the loop.
    pub fn validate(&self) -> EvacResult<()> {
        if !(self.dt_secs > 0.0) || !self.dt_secs.is_finite() {
            return Err(EvacError::InvalidConfiguration(format!(
                "dt_secs must be positive and finite, got {}",
                self.dt_secs
            )));
        }
        for (name, value) in [
            ("total_secs", self.total_secs),
            ("premovement_secs", self.premovement_secs),
            ("snapshot_interval_secs", self.snapshot_interval_secs),
        ] {
            if !(value >= 0.0) || !value.is_finite() {
                return Err(EvacError::InvalidConfiguration(format!(
                    "{name} must be non-negative and finite, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// The tick at which the simulation ends (exclusive upper bound).
    pub fn end_tick(&self) -> Tick {
        Tick(self.make_clock().ticks_for_secs(self.total_secs))
    }

    /// The first tick at which agents may move and re-plan.
    pub fn premovement_ticks(&self) -> u64 {
        if self.premovement_secs == 0.0 {
            return 0;
        }
        self.make_clock().ticks_for_secs(self.premovement_secs)
    }

    /// Snapshot interval in ticks; `None` when snapshots are disabled.
    pub fn snapshot_interval_ticks(&self) -> Option<u64> {
        (self.snapshot_interval_secs > 0.0)
            .then(|| self.make_clock().ticks_for_secs(self.snapshot_interval_secs))
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.dt_secs)
    }
}
