//! The `Sim` struct and its tick loop.

use std::sync::Arc;

use tracing::{debug, info, warn};

use evac_behavior::{
    AgentView, BehaviorModel, BehaviorResult, Decision, EvacContext, ExitPair, Journey,
};
use evac_core::{AgentId, JourneyId, SimClock, SimConfig, StageId, Tick};
use evac_motion::{AgentSpawn, MotionEngine};
use evac_spatial::{Router, WaypointSet};
use evac_visibility::VisibilityField;

use crate::{DecisionRecord, SimError, SimObserver, SimResult, Spawner};

// ── Journey table ─────────────────────────────────────────────────────────────

/// Motion-engine ids behind the two decision states.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct JourneyTable {
    pub primary:   (JourneyId, StageId),
    pub secondary: (JourneyId, StageId),
}

impl JourneyTable {
    #[inline]
    pub fn ids(&self, journey: Journey) -> (JourneyId, StageId) {
        match journey {
            Journey::Primary   => self.primary,
            Journey::Secondary => self.secondary,
        }
    }

    /// Decision state of an engine journey id.  `None` for journeys the
    /// decision layer does not manage.
    pub fn journey_of(&self, id: JourneyId) -> Option<Journey> {
        if id == self.primary.0 {
            Some(Journey::Primary)
        } else if id == self.secondary.0 {
            Some(Journey::Secondary)
        } else {
            None
        }
    }
}

// ── Tick outcome ──────────────────────────────────────────────────────────────

/// What happened during one tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub spawned:   usize,
    pub evaluated: usize,
    pub switched:  usize,
    pub skipped:   usize,
    pub exited:    usize,
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// `Sim<B, M>` drives one evacuation run.  Per tick:
///
/// 1. **Spawn**: if a wave is due, add its agents on the primary journey
///    with desired speed 0.
/// 2. **Intent phase** (re-evaluation ticks after premovement only,
///    optionally parallel with the `parallel` feature): call
///    [`BehaviorModel::reevaluate`] for every active agent against a shared
///    read-only [`EvacContext`].
/// 3. **Apply phase** (sequential, ascending `AgentId`): write each decision
///    into the motion engine.  Agents whose evaluation failed recoverably
///    are left untouched.
/// 4. **Step**: advance the motion engine and the clock.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<B: BehaviorModel, M: MotionEngine> {
    /// Run timing (step size, duration, premovement, seed, snapshots).
    pub config: SimConfig,

    pub clock: SimClock,

    pub behavior: B,

    /// The pedestrian engine.  Owns positions; the sim only writes speeds
    /// and journey assignments.
    pub engine: M,

    pub field: Arc<dyn VisibilityField>,

    pub router: Arc<dyn Router>,

    pub waypoints: WaypointSet,

    pub exits: ExitPair,

    pub journeys: JourneyTable,

    pub spawner: Spawner,

    /// Ticks between re-evaluations.
    pub reevaluation_ticks: u64,
}

impl<B: BehaviorModel, M: MotionEngine> Sim<B, M> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run the simulation from the current tick to `config.end_tick()`, or
    /// until every wave has spawned and every agent has left.
    ///
    /// Calls observer hooks at every tick boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let end = self.config.end_tick();
        info!(
            end_tick = end.0,
            dt = self.config.dt_secs,
            reevaluation_ticks = self.reevaluation_ticks,
            "simulation started"
        );
        loop {
            let now = self.clock.current_tick;
            if now >= end {
                break;
            }
            if self.is_finished() {
                info!(tick = now.0, "all agents evacuated");
                break;
            }
            self.step(observer)?;
        }
        observer.on_sim_end(self.clock.current_tick);
        info!(
            tick = self.clock.current_tick.0,
            elapsed_secs = self.clock.elapsed_secs(),
            "simulation finished"
        );
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.step(observer)?;
        }
        Ok(())
    }

    /// Process the current tick and advance the clock by one.
    pub fn step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<TickSummary> {
        let now = self.clock.current_tick;
        observer.on_tick_start(now);
        let mut summary = TickSummary::default();

        // ── Phase 1: spawn ────────────────────────────────────────────────
        summary.spawned = self.spawn_wave(now, observer)?;

        // ── Phase 2+3: re-evaluate and apply ──────────────────────────────
        if self.is_reevaluation_tick(now) {
            self.reevaluate(now, observer, &mut summary)?;
        }

        if let Some(k) = self.config.snapshot_interval_ticks() {
            if now.0.is_multiple_of(k) {
                observer.on_snapshot(now, self.clock.secs_at(now), &self.engine);
            }
        }

        // ── Phase 4: step the engine ──────────────────────────────────────
        summary.exited = self.engine.iterate()?.len();
        self.clock.advance();
        Ok(summary)
    }

    /// Every wave has spawned and nobody is left.
    pub fn is_finished(&self) -> bool {
        self.spawner.is_exhausted() && self.engine.active_agents().is_empty()
    }

    /// Whether `tick` is a re-evaluation tick.
    #[inline]
    pub fn is_reevaluation_tick(&self, tick: Tick) -> bool {
        tick.0 >= self.config.premovement_ticks() && tick.0.is_multiple_of(self.reevaluation_ticks)
    }

    /// Current decision state of `agent`, read back from the engine.
    pub fn journey_of(&self, agent: AgentId) -> SimResult<Journey> {
        let (journey, _) = self.engine.assignment(agent)?;
        self.journeys.journey_of(journey).ok_or_else(|| {
            SimError::Config(format!("{agent} is on unmanaged journey {journey}"))
        })
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn spawn_wave<O: SimObserver>(&mut self, now: Tick, observer: &mut O) -> SimResult<usize> {
        let Some(positions) = self.spawner.take_wave(now) else {
            return Ok(0);
        };
        let (journey, stage) = self.journeys.primary;
        let mut ids = Vec::with_capacity(positions.len());
        for &position in positions {
            ids.push(self.engine.add_agent(AgentSpawn {
                position,
                journey,
                stage,
                desired_speed: 0.0,
            })?);
        }
        info!(
            tick = now.0,
            wave = self.spawner.waves_spawned(),
            agents = ids.len(),
            "spawned wave"
        );
        observer.on_agents_spawned(now, &ids);
        Ok(ids.len())
    }

    fn reevaluate<O: SimObserver>(
        &mut self,
        now:      Tick,
        observer: &mut O,
        summary:  &mut TickSummary,
    ) -> SimResult<()> {
        let time = self.clock.secs_at(now);

        // Snapshot agent state before the intent phase so it only reads
        // immutable data.
        let views = self
            .engine
            .active_agents()
            .into_iter()
            .map(|agent| -> SimResult<(AgentId, AgentView)> {
                Ok((agent, AgentView {
                    position:      self.engine.position(agent)?,
                    journey:       self.journey_of(agent)?,
                    desired_speed: self.engine.desired_speed(agent)?,
                }))
            })
            .collect::<SimResult<Vec<_>>>()?;

        let results = self.compute_decisions(now, time, &views);

        // Results are in ascending AgentId order; sequential application in
        // this order keeps runs deterministic under the parallel feature.
        let mut records = Vec::with_capacity(results.len());
        for ((agent, view), result) in views.into_iter().zip(results) {
            match result {
                Ok(decision) => {
                    self.apply(agent, &decision)?;
                    records.push(DecisionRecord {
                        agent,
                        position: view.position,
                        previous: view.journey,
                        decision,
                    });
                }
                Err(err) if err.is_recoverable() => {
                    warn!(tick = now.0, %agent, %err, "re-evaluation skipped; keeping journey and speed");
                    observer.on_agent_skipped(now, agent, &err);
                    summary.skipped += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }

        summary.evaluated = records.len();
        summary.switched = records.iter().filter(|r| r.switched()).count();
        debug!(
            tick = now.0,
            time,
            evaluated = summary.evaluated,
            switched = summary.switched,
            skipped = summary.skipped,
            "re-evaluation pass"
        );
        observer.on_decisions(now, time, &records);
        Ok(())
    }

    /// Intent phase.  With the `parallel` Cargo feature the per-agent calls
    /// run on Rayon's thread pool.
    fn compute_decisions(
        &self,
        now:   Tick,
        time:  f64,
        views: &[(AgentId, AgentView)],
    ) -> Vec<BehaviorResult<Decision>> {
        let behavior = &self.behavior;
        let ctx = EvacContext::new(
            now,
            time,
            self.field.as_ref(),
            self.router.as_ref(),
            &self.waypoints,
            &self.exits,
        );

        #[cfg(not(feature = "parallel"))]
        {
            views
                .iter()
                .map(|&(agent, view)| behavior.reevaluate(agent, view, &ctx))
                .collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            views
                .par_iter()
                .map(|&(agent, view)| behavior.reevaluate(agent, view, &ctx))
                .collect()
        }
    }

    fn apply(&mut self, agent: AgentId, decision: &Decision) -> SimResult<()> {
        let (journey, stage) = self.journeys.ids(decision.journey);
        self.engine.switch_journey(agent, journey, stage)?;
        self.engine.set_desired_speed(agent, decision.desired_speed)?;
        Ok(())
    }
}
