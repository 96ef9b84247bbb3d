//! Scenario files: everything a run needs except the visibility field.
//!
//! A scenario is a JSON document with one section per concern.  Sections
//! marked optional fall back to the values used by the two-exit reference
//! scenario.
//!
//! ```json
//! {
//!   "sim":       { "dt_secs": 0.01, "total_secs": 600, "premovement_secs": 400,
//!                  "seed": 1, "snapshot_interval_secs": 1 },
//!   "waypoints": { "points": [{ "position": { "x": 13.5, "y": 8.5 } }],
//!                  "capture_radius": 0.5 },
//!   "exits":     { "primary":   { "center": { "x": 25.5, "y": 16.5 }, "radius": 0.5 },
//!                  "secondary": { "center": { "x": 2.5,  "y": 16.5 }, "radius": 0.5 } },
//!   "spawn":     { "areas": [{ "min": { "x": 1, "y": 0 }, "max": { "x": 15, "y": 3 } }],
//!                  "agents_per_area": 40 },
//!   "nav_graph": { "nodes": [{ "x": 8, "y": 1.5 }], "corridors": [[0, 1]] }
//! }
//! ```

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use evac_behavior::{ExitPair, SpeedModel, VisibilityRouteChoice};
use evac_core::{Point, SimConfig, SimRng};
use evac_motion::KinematicEngine;
use evac_spatial::{GraphRouter, NavGraph, NavGraphBuilder, Waypoint, WaypointSet};
use evac_visibility::VisibilityField;

use crate::spawn::{SpawnArea, Spawner, distribute_in_area};
use crate::{JourneyTable, Sim, SimBuilder, SimError, SimResult};

/// The simulation type a scenario file produces.
pub type ScenarioSim = Sim<VisibilityRouteChoice, KinematicEngine<Arc<GraphRouter>>>;

// ── Sections ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaypointConfig {
    pub points: Vec<Waypoint>,
    /// Radius within which a waypoint counts as reached.
    #[serde(default = "default_capture_radius")]
    pub capture_radius: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExitConfig {
    pub center: Point,
    #[serde(default = "default_exit_radius")]
    pub radius: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExitsConfig {
    pub primary:   ExitConfig,
    pub secondary: ExitConfig,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedConfig {
    /// Visibility (m) at or below which agents stop.
    pub threshold:     f64,
    pub max_speed:     f64,
    pub falloff_range: f64,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self { threshold: 3.0, max_speed: 1.0, falloff_range: 5.0 }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteConfig {
    /// Smoke visibility factor used when scoring route exposure.
    pub visibility_factor: f64,
    pub reevaluation_secs: f64,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self { visibility_factor: 3.0, reevaluation_secs: 20.0 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnConfig {
    pub areas:           Vec<SpawnArea>,
    pub agents_per_area: usize,
    #[serde(default = "default_distance_to_agents")]
    pub distance_to_agents: f64,
    #[serde(default = "default_distance_to_edge")]
    pub distance_to_edge: f64,
    /// Seconds between waves.  `None` spawns a single wave.
    #[serde(default)]
    pub wave_interval_secs: Option<f64>,
    /// Waves repeat only once this many seconds past premovement have run.
    #[serde(default = "default_wave_delay")]
    pub wave_delay_secs: f64,
    #[serde(default)]
    pub max_waves: Option<u32>,
}

/// Walkable corridor network, as node positions and undirected node pairs.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NavGraphConfig {
    pub nodes:     Vec<Point>,
    pub corridors: Vec<(usize, usize)>,
}

fn default_capture_radius() -> f64 { 0.5 }
fn default_exit_radius() -> f64 { 0.5 }
fn default_distance_to_agents() -> f64 { 0.4 }
fn default_distance_to_edge() -> f64 { 0.3 }
fn default_wave_delay() -> f64 { 2.0 }

// ── ScenarioConfig ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub sim:       SimConfig,
    pub waypoints: WaypointConfig,
    pub exits:     ExitsConfig,
    #[serde(default)]
    pub speed:     SpeedConfig,
    #[serde(default)]
    pub route:     RouteConfig,
    pub spawn:     SpawnConfig,
    pub nav_graph: NavGraphConfig,
}

impl ScenarioConfig {
    pub fn from_json_str(json: &str) -> SimResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and validate a scenario file.
    pub fn load(path: &Path) -> SimResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        config.validate()?;
        info!(path = %path.display(), "scenario loaded");
        Ok(config)
    }

    /// Check everything that can be checked without building the run.
    pub fn validate(&self) -> SimResult<()> {
        self.sim.validate()?;
        for (name, exit) in [("primary", &self.exits.primary), ("secondary", &self.exits.secondary)] {
            if !exit.center.is_finite() || !(exit.radius > 0.0) {
                return Err(SimError::Config(format!(
                    "{name} exit at {} needs a positive radius, got {}",
                    exit.center, exit.radius
                )));
            }
        }
        if !(self.route.reevaluation_secs > 0.0) || !self.route.reevaluation_secs.is_finite() {
            return Err(SimError::Config(format!(
                "reevaluation_secs must be positive, got {}",
                self.route.reevaluation_secs
            )));
        }
        if let Some(secs) = self.spawn.wave_interval_secs {
            if !(secs > 0.0) || !secs.is_finite() {
                return Err(SimError::Config(format!(
                    "wave_interval_secs must be positive, got {secs}"
                )));
            }
        }
        if !(self.spawn.wave_delay_secs >= 0.0) || !self.spawn.wave_delay_secs.is_finite() {
            return Err(SimError::Config(format!(
                "wave_delay_secs must be non-negative, got {}",
                self.spawn.wave_delay_secs
            )));
        }
        if self.nav_graph.nodes.is_empty() {
            return Err(SimError::Config("nav_graph has no nodes".into()));
        }
        let n = self.nav_graph.nodes.len();
        if let Some(&(a, b)) = self.nav_graph.corridors.iter().find(|&&(a, b)| a >= n || b >= n) {
            return Err(SimError::Config(format!(
                "corridor ({a}, {b}) references a node outside 0..{n}"
            )));
        }
        Ok(())
    }

    pub fn waypoint_set(&self) -> SimResult<WaypointSet> {
        Ok(WaypointSet::new(self.waypoints.points.clone(), self.waypoints.capture_radius)?)
    }

    pub fn speed_model(&self) -> SimResult<SpeedModel> {
        let s = &self.speed;
        Ok(SpeedModel::new(s.threshold, s.max_speed, s.falloff_range)?)
    }

    pub fn behavior(&self) -> SimResult<VisibilityRouteChoice> {
        Ok(VisibilityRouteChoice::new(self.speed_model()?, self.route.visibility_factor)?)
    }

    pub fn nav_graph(&self) -> NavGraph {
        let mut b = NavGraphBuilder::new();
        let ids: Vec<_> = self.nav_graph.nodes.iter().map(|&p| b.add_node(p)).collect();
        for &(from, to) in &self.nav_graph.corridors {
            b.add_corridor(ids[from], ids[to]);
        }
        b.build()
    }

    pub fn exit_pair(&self) -> ExitPair {
        ExitPair {
            primary:   self.exits.primary.center,
            secondary: self.exits.secondary.center,
        }
    }

    /// Place every area's agents and wrap them in the wave schedule.
    ///
    /// Each area draws from its own child RNG, so positions are a pure
    /// function of the seed and the area's index.
    pub fn spawner(&self) -> SimResult<Spawner> {
        let spawn = &self.spawn;
        let mut positions = Vec::with_capacity(spawn.areas.len() * spawn.agents_per_area);
        for (i, area) in spawn.areas.iter().enumerate() {
            let mut rng = SimRng::child(self.sim.seed, i as u64);
            positions.extend(distribute_in_area(
                area,
                spawn.agents_per_area,
                spawn.distance_to_agents,
                spawn.distance_to_edge,
                &mut rng,
            )?);
        }

        let Some(interval) = spawn.wave_interval_secs else {
            return Ok(Spawner::once(positions));
        };
        let clock = self.sim.make_clock();
        let repeat_after = self.sim.premovement_ticks() + clock.ticks_for_secs(spawn.wave_delay_secs);
        Ok(Spawner::repeating(
            positions,
            clock.ticks_for_secs(interval),
            repeat_after,
            spawn.max_waves,
        ))
    }

    /// Assemble the full run: graph router shared by engine and decision
    /// model, both exits registered as single-stage journeys, agents placed.
    pub fn build_sim(&self, field: Arc<dyn VisibilityField>) -> SimResult<ScenarioSim> {
        self.validate()?;
        let router = Arc::new(GraphRouter::new(self.nav_graph()));

        let mut engine = KinematicEngine::new(Arc::clone(&router), self.sim.dt_secs)?;
        let primary_stage = engine.add_exit_stage(self.exits.primary.center, self.exits.primary.radius)?;
        let secondary_stage =
            engine.add_exit_stage(self.exits.secondary.center, self.exits.secondary.radius)?;
        let journeys = JourneyTable {
            primary:   (engine.add_journey(vec![primary_stage])?, primary_stage),
            secondary: (engine.add_journey(vec![secondary_stage])?, secondary_stage),
        };

        SimBuilder::new(self.sim.clone(), self.behavior()?, engine)
            .field(field)
            .router(router)
            .waypoints(self.waypoint_set()?)
            .exits(self.exit_pair())
            .journeys(journeys)
            .spawner(self.spawner()?)
            .reevaluation_secs(self.route.reevaluation_secs)
            .build()
    }
}
