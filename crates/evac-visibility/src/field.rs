//! The `VisibilityField` trait — the only way route choice sees smoke.

use evac_core::{Point, WaypointId};

use crate::VisibilityResult;

/// Read-only visibility queries keyed by simulation time and position.
///
/// Implementations must behave as pure functions for the duration of a run:
/// identical arguments return identical results.  They must be `Send + Sync`
/// so one field can serve every agent during a parallel re-evaluation pass.
///
/// Out-of-domain queries (time beyond the horizon, point off the grid,
/// unknown waypoint) return an error; they are never silently clamped.
pub trait VisibilityField: Send + Sync {
    /// Whether `waypoint` can be seen from `at` at `time`.
    fn is_visible(&self, time: f64, at: Point, waypoint: WaypointId) -> VisibilityResult<bool>;

    /// Local visibility distance in metres at `at`, for visibility factor `c`
    /// (3 for reflecting signs, 8 for light-emitting ones).  Higher means
    /// clearer air.
    fn local_visibility(&self, time: f64, at: Point, c: f64) -> VisibilityResult<f64>;

    /// Straight-line distance from `at` to `waypoint`.
    fn distance_to_waypoint(&self, at: Point, waypoint: WaypointId) -> VisibilityResult<f64>;
}
