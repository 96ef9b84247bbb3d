//! Read-only state passed to every behavior callback.

use evac_core::{Point, Tick};
use evac_spatial::{Router, WaypointSet};
use evac_visibility::VisibilityField;

use crate::Journey;

/// Target positions of the two candidate exits.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ExitPair {
    pub primary:   Point,
    pub secondary: Point,
}

impl ExitPair {
    #[inline]
    pub fn target(&self, journey: Journey) -> Point {
        match journey {
            Journey::Primary   => self.primary,
            Journey::Secondary => self.secondary,
        }
    }
}

/// What the model may know about one agent.  Copied out of the motion
/// engine before the intent phase so models never touch engine state.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AgentView {
    pub position:      Point,
    pub journey:       Journey,
    pub desired_speed: f64,
}

/// A read-only snapshot of the world for one re-evaluation pass.
///
/// Built once per pass by evac-sim and shared immutably across all agents,
/// possibly from several threads.
pub struct EvacContext<'a> {
    /// Current simulation tick.
    pub tick: Tick,

    /// Simulated seconds at `tick`; the time every field query uses.
    pub time: f64,

    pub field:     &'a dyn VisibilityField,
    pub router:    &'a dyn Router,
    pub waypoints: &'a WaypointSet,
    pub exits:     &'a ExitPair,
}

impl<'a> EvacContext<'a> {
    #[inline]
    pub fn new(
        tick:      Tick,
        time:      f64,
        field:     &'a dyn VisibilityField,
        router:    &'a dyn Router,
        waypoints: &'a WaypointSet,
        exits:     &'a ExitPair,
    ) -> Self {
        Self { tick, time, field, router, waypoints, exits }
    }
}
