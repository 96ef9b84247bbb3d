//! The `MotionStore` — per-agent motion state and sparse route cache.

use rustc_hash::FxHashMap;

use evac_core::AgentId;

use crate::{AgentSpawn, MotionError, MotionResult, MotionState, Polyline};

/// Holds motion state for every agent ever added plus routes for agents
/// still walking.
///
/// `states` is indexed by `AgentId`; ids are handed out in insertion order
/// and never reused, so an exited agent keeps its slot with
/// `active = false`.  `routes` is sparse and loses an agent's entry when it
/// exits.  The ascending list of active ids is kept alongside so per-tick
/// scans cost the live population, not every agent ever spawned.
#[derive(Default)]
pub struct MotionStore {
    pub states: Vec<MotionState>,

    pub routes: FxHashMap<AgentId, Polyline>,

    active: Vec<AgentId>,
}

impl MotionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new active agent and return its id.
    pub fn insert(&mut self, spawn: &AgentSpawn, route: Polyline) -> MotionResult<AgentId> {
        let agent = AgentId::try_from(self.states.len())
            .map_err(|_| MotionError::InvalidInput("agent id space exhausted".into()))?;
        self.states.push(MotionState::from_spawn(spawn));
        self.routes.insert(agent, route);
        self.active.push(agent);
        Ok(agent)
    }

    /// State of an agent that is still in the simulation.
    pub fn get(&self, agent: AgentId) -> MotionResult<&MotionState> {
        self.states
            .get(agent.index())
            .filter(|s| s.active)
            .ok_or(MotionError::UnknownAgent(agent))
    }

    pub fn get_mut(&mut self, agent: AgentId) -> MotionResult<&mut MotionState> {
        self.states
            .get_mut(agent.index())
            .filter(|s| s.active)
            .ok_or(MotionError::UnknownAgent(agent))
    }

    /// Mark `agent` as gone and drop its route.
    pub fn remove(&mut self, agent: AgentId) {
        if let Some(state) = self.states.get_mut(agent.index()) {
            state.active = false;
        }
        if let Ok(pos) = self.active.binary_search(&agent) {
            self.active.remove(pos);
        }
        self.routes.remove(&agent);
    }

    /// Ids of active agents in ascending order.
    pub fn active(&self) -> Vec<AgentId> {
        self.active.clone()
    }

    pub fn active_ids(&self) -> &[AgentId] {
        &self.active
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}
