//! Simulation observer trait for progress reporting and data collection.

use evac_behavior::{BehaviorError, Decision, Journey};
use evac_core::{AgentId, Point, Tick};
use evac_motion::MotionEngine;

/// One applied decision, as reported to [`SimObserver::on_decisions`].
#[derive(Clone, Debug, PartialEq)]
pub struct DecisionRecord {
    pub agent:    AgentId,
    /// Where the agent stood when it decided.
    pub position: Point,
    /// Journey held before the decision.
    pub previous: Journey,
    pub decision: Decision,
}

impl DecisionRecord {
    #[inline]
    pub fn switched(&self) -> bool {
        self.previous != self.decision.journey
    }
}

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — switch counter
///
/// ```rust,ignore
/// struct Switches(usize);
///
/// impl SimObserver for Switches {
///     fn on_decisions(&mut self, _tick: Tick, _time: f64, records: &[DecisionRecord]) {
///         self.0 += records.iter().filter(|r| r.switched()).count();
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called after a spawn wave with the ids of the new agents.
    fn on_agents_spawned(&mut self, _tick: Tick, _agents: &[AgentId]) {}

    /// Called after every re-evaluation pass with the decisions applied, in
    /// ascending agent order.
    fn on_decisions(&mut self, _tick: Tick, _time: f64, _records: &[DecisionRecord]) {}

    /// Called for each agent whose re-evaluation failed recoverably.  The
    /// agent kept its journey and speed for this tick.
    fn on_agent_skipped(&mut self, _tick: Tick, _agent: AgentId, _error: &BehaviorError) {}

    /// Called at snapshot intervals (every `config.snapshot_interval_secs`).
    ///
    /// Provides read-only access to the motion engine so output writers can
    /// record positions without the sim knowing any output format.
    fn on_snapshot(&mut self, _tick: Tick, _time: f64, _engine: &dyn MotionEngine) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
