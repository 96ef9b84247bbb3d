//! Fluent builder for constructing a [`Sim`].

use std::sync::Arc;

use evac_behavior::{BehaviorModel, ExitPair};
use evac_core::SimConfig;
use evac_motion::MotionEngine;
use evac_spatial::{Router, WaypointSet};
use evac_visibility::VisibilityField;

use crate::{JourneyTable, Sim, SimError, SimResult, Spawner};

/// Re-evaluation period used when none is given.
pub const DEFAULT_REEVALUATION_SECS: f64 = 20.0;

/// Fluent builder for [`Sim<B, M>`].
///
/// # Required inputs
///
/// - [`SimConfig`] — step size, duration, premovement, seed, …
/// - `B: BehaviorModel` — the decision model
/// - `M: MotionEngine` — the pedestrian engine, with its exit stages and
///   journeys already registered
/// - `.field(..)`, `.router(..)`, `.waypoints(..)`, `.exits(..)`,
///   `.journeys(..)` — everything the decision model reads
///
/// # Optional inputs (have defaults)
///
/// | Method                    | Default                  |
/// |---------------------------|--------------------------|
/// | `.spawner(s)`             | `Spawner::none()`        |
/// | `.reevaluation_secs(s)`   | 20 s                     |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, behavior, engine)
///     .field(field)
///     .router(router)
///     .waypoints(waypoints)
///     .exits(exits)
///     .journeys(journeys)
///     .spawner(spawner)
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<B: BehaviorModel, M: MotionEngine> {
    config:            SimConfig,
    behavior:          B,
    engine:            M,
    field:             Option<Arc<dyn VisibilityField>>,
    router:            Option<Arc<dyn Router>>,
    waypoints:         Option<WaypointSet>,
    exits:             Option<ExitPair>,
    journeys:          Option<JourneyTable>,
    spawner:           Option<Spawner>,
    reevaluation_secs: f64,
}

impl<B: BehaviorModel, M: MotionEngine> SimBuilder<B, M> {
    pub fn new(config: SimConfig, behavior: B, engine: M) -> Self {
        Self {
            config,
            behavior,
            engine,
            field:             None,
            router:            None,
            waypoints:         None,
            exits:             None,
            journeys:          None,
            spawner:           None,
            reevaluation_secs: DEFAULT_REEVALUATION_SECS,
        }
    }

    pub fn field(mut self, field: Arc<dyn VisibilityField>) -> Self {
        self.field = Some(field);
        self
    }

    /// Router used by the decision model.  Usually the same graph the
    /// motion engine walks.
    pub fn router(mut self, router: Arc<dyn Router>) -> Self {
        self.router = Some(router);
        self
    }

    pub fn waypoints(mut self, waypoints: WaypointSet) -> Self {
        self.waypoints = Some(waypoints);
        self
    }

    pub fn exits(mut self, exits: ExitPair) -> Self {
        self.exits = Some(exits);
        self
    }

    /// Engine journey and stage ids for the primary and secondary exit.
    pub fn journeys(mut self, journeys: JourneyTable) -> Self {
        self.journeys = Some(journeys);
        self
    }

    pub fn spawner(mut self, spawner: Spawner) -> Self {
        self.spawner = Some(spawner);
        self
    }

    /// Simulated seconds between route re-evaluations.
    pub fn reevaluation_secs(mut self, secs: f64) -> Self {
        self.reevaluation_secs = secs;
        self
    }

    /// Validate inputs and return a ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim<B, M>> {
        self.config.validate()?;
        if !(self.reevaluation_secs > 0.0) || !self.reevaluation_secs.is_finite() {
            return Err(SimError::Config(format!(
                "re-evaluation period must be positive, got {}",
                self.reevaluation_secs
            )));
        }
        let journeys = required(self.journeys, "journey table")?;
        if journeys.primary.0 == journeys.secondary.0 {
            return Err(SimError::Config(
                "primary and secondary exits must use different journeys".into(),
            ));
        }

        let clock = self.config.make_clock();
        let reevaluation_ticks = clock.ticks_for_secs(self.reevaluation_secs);

        Ok(Sim {
            clock,
            config:    self.config,
            behavior:  self.behavior,
            engine:    self.engine,
            field:     required(self.field, "visibility field")?,
            router:    required(self.router, "router")?,
            waypoints: required(self.waypoints, "waypoint table")?,
            exits:     required(self.exits, "exit pair")?,
            journeys,
            spawner:   self.spawner.unwrap_or_else(Spawner::none),
            reevaluation_ticks,
        })
    }
}

fn required<T>(value: Option<T>, what: &str) -> SimResult<T> {
    value.ok_or_else(|| SimError::Config(format!("{what} is required")))
}
