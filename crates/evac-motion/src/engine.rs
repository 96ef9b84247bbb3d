//! The `MotionEngine` interface and a kinematic reference implementation.

use tracing::debug;

use evac_core::{AgentId, JourneyId, Point, StageId};
use evac_spatial::Router;

use crate::{AgentSpawn, ExitStage, MotionError, MotionResult, MotionStore, Polyline};

// ── MotionEngine ──────────────────────────────────────────────────────────────

/// The capabilities the simulation loop needs from a pedestrian engine.
///
/// Deliberately narrow: read positions and speeds, write speeds and journey
/// assignments, add agents, step.  Object-safe so observers can take
/// `&dyn MotionEngine`.
pub trait MotionEngine {
    /// Seconds advanced by one [`iterate`](Self::iterate).
    fn delta_time(&self) -> f64;

    /// Seconds simulated so far.
    fn elapsed_time(&self) -> f64;

    fn iteration_count(&self) -> u64;

    /// Agents still in the simulation, in ascending id order.
    fn active_agents(&self) -> Vec<AgentId>;

    fn position(&self, agent: AgentId) -> MotionResult<Point>;

    fn desired_speed(&self, agent: AgentId) -> MotionResult<f64>;

    /// Current `(journey, stage)` assignment.
    fn assignment(&self, agent: AgentId) -> MotionResult<(JourneyId, StageId)>;

    fn set_desired_speed(&mut self, agent: AgentId, speed: f64) -> MotionResult<()>;

    /// Reassign `agent` to `stage` of `journey`.  Reassigning the current
    /// journey and stage is a no-op.
    fn switch_journey(
        &mut self,
        agent:   AgentId,
        journey: JourneyId,
        stage:   StageId,
    ) -> MotionResult<()>;

    fn add_agent(&mut self, spawn: AgentSpawn) -> MotionResult<AgentId>;

    /// Advance one step.  Returns the agents that left the simulation.
    fn iterate(&mut self) -> MotionResult<Vec<AgentId>>;
}

// ── KinematicEngine ───────────────────────────────────────────────────────────

/// Reference engine: agents follow routed polylines at their desired speed.
///
/// No collision avoidance or crowd dynamics.  Each step moves an agent
/// `desired_speed · dt` metres along its route; an agent whose position is
/// inside its target exit zone is removed.  Routes are planned with `R` on
/// spawn and whenever the agent's stage changes.
///
/// # Type parameter
///
/// `R` must implement [`Router`].  Pass an `Arc<GraphRouter>` to share one
/// graph with the decision layer.
pub struct KinematicEngine<R: Router> {
    pub router: R,

    pub store: MotionStore,

    dt_secs:    f64,
    iterations: u64,
    stages:     Vec<ExitStage>,
    journeys:   Vec<Vec<StageId>>,
}

impl<R: Router> KinematicEngine<R> {
    pub fn new(router: R, dt_secs: f64) -> MotionResult<Self> {
        if !(dt_secs > 0.0) || !dt_secs.is_finite() {
            return Err(MotionError::InvalidInput(format!(
                "step size must be positive, got {dt_secs}"
            )));
        }
        Ok(Self {
            router,
            store: MotionStore::new(),
            dt_secs,
            iterations: 0,
            stages: Vec::new(),
            journeys: Vec::new(),
        })
    }

    /// Register a circular exit zone.
    pub fn add_exit_stage(&mut self, center: Point, radius: f64) -> MotionResult<StageId> {
        if !center.is_finite() || !(radius > 0.0) {
            return Err(MotionError::InvalidInput(format!(
                "exit at {center} needs a positive radius, got {radius}"
            )));
        }
        let id = StageId::try_from(self.stages.len())
            .map_err(|_| MotionError::InvalidInput("too many stages".into()))?;
        self.stages.push(ExitStage { center, radius });
        Ok(id)
    }

    /// Register a journey visiting `stages` in order.
    pub fn add_journey(&mut self, stages: Vec<StageId>) -> MotionResult<JourneyId> {
        if stages.is_empty() {
            return Err(MotionError::InvalidInput("journey has no stages".into()));
        }
        for &stage in &stages {
            self.stage(stage)?;
        }
        let id = JourneyId::try_from(self.journeys.len())
            .map_err(|_| MotionError::InvalidInput("too many journeys".into()))?;
        self.journeys.push(stages);
        Ok(id)
    }

    pub fn stage(&self, stage: StageId) -> MotionResult<&ExitStage> {
        self.stages.get(stage.index()).ok_or(MotionError::UnknownStage(stage))
    }

    fn check_assignment(&self, journey: JourneyId, stage: StageId) -> MotionResult<&ExitStage> {
        let stages = self
            .journeys
            .get(journey.index())
            .ok_or(MotionError::UnknownJourney(journey))?;
        if !stages.contains(&stage) {
            return Err(MotionError::StageNotInJourney { journey, stage });
        }
        self.stage(stage)
    }

    fn plan(&self, from: Point, stage: &ExitStage) -> MotionResult<Polyline> {
        Ok(Polyline::new(self.router.shortest_path(from, stage.center)?))
    }

    /// Route still to be walked by `agent`.
    pub fn remaining_route(&self, agent: AgentId) -> MotionResult<&[Point]> {
        self.store.get(agent)?;
        Ok(self.store.routes.get(&agent).map(Polyline::remaining).unwrap_or_default())
    }
}

impl<R: Router> MotionEngine for KinematicEngine<R> {
    fn delta_time(&self) -> f64 {
        self.dt_secs
    }

    fn elapsed_time(&self) -> f64 {
        self.iterations as f64 * self.dt_secs
    }

    fn iteration_count(&self) -> u64 {
        self.iterations
    }

    fn active_agents(&self) -> Vec<AgentId> {
        self.store.active()
    }

    fn position(&self, agent: AgentId) -> MotionResult<Point> {
        Ok(self.store.get(agent)?.position)
    }

    fn desired_speed(&self, agent: AgentId) -> MotionResult<f64> {
        Ok(self.store.get(agent)?.desired_speed)
    }

    fn assignment(&self, agent: AgentId) -> MotionResult<(JourneyId, StageId)> {
        let s = self.store.get(agent)?;
        Ok((s.journey, s.stage))
    }

    fn set_desired_speed(&mut self, agent: AgentId, speed: f64) -> MotionResult<()> {
        if !(speed >= 0.0) || !speed.is_finite() {
            return Err(MotionError::InvalidInput(format!(
                "desired speed of {agent} must be non-negative, got {speed}"
            )));
        }
        self.store.get_mut(agent)?.desired_speed = speed;
        Ok(())
    }

    fn switch_journey(
        &mut self,
        agent:   AgentId,
        journey: JourneyId,
        stage:   StageId,
    ) -> MotionResult<()> {
        let state = self.store.get(agent)?;
        if state.journey == journey && state.stage == stage {
            return Ok(());
        }
        let position = state.position;
        let target = *self.check_assignment(journey, stage)?;
        let route = self.plan(position, &target)?;

        let state = self.store.get_mut(agent)?;
        state.journey = journey;
        state.stage = stage;
        self.store.routes.insert(agent, route);
        debug!(%agent, %journey, %stage, "journey switched");
        Ok(())
    }

    fn add_agent(&mut self, spawn: AgentSpawn) -> MotionResult<AgentId> {
        if !spawn.position.is_finite() {
            return Err(MotionError::InvalidInput(format!(
                "spawn position {} is not finite",
                spawn.position
            )));
        }
        if !(spawn.desired_speed >= 0.0) || !spawn.desired_speed.is_finite() {
            return Err(MotionError::InvalidInput(format!(
                "spawn speed must be non-negative, got {}",
                spawn.desired_speed
            )));
        }
        let target = *self.check_assignment(spawn.journey, spawn.stage)?;
        let route = self.plan(spawn.position, &target)?;
        self.store.insert(&spawn, route)
    }

    fn iterate(&mut self) -> MotionResult<Vec<AgentId>> {
        let dt = self.dt_secs;
        let mut exited = Vec::new();

        for agent in self.store.active() {
            let state = &mut self.store.states[agent.index()];
            let step = state.desired_speed * dt;
            if step > 0.0 {
                if let Some(route) = self.store.routes.get_mut(&agent) {
                    state.position = route.advance(state.position, step);
                }
            }
            let exit = self
                .stages
                .get(state.stage.index())
                .ok_or(MotionError::UnknownStage(state.stage))?;
            if state.position.distance(exit.center) <= exit.radius {
                exited.push(agent);
            }
        }

        for &agent in &exited {
            self.store.remove(agent);
        }
        self.iterations += 1;
        if !exited.is_empty() {
            debug!(iteration = self.iterations, count = exited.len(), "agents left through exits");
        }
        Ok(exited)
    }
}
