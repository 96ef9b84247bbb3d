//! Diagnostic queries over the visibility field and the decision model.
//!
//! Pure data producers: nothing here logs or draws.  evac-output writes the
//! results to disk; plotting is left to external tools.

use evac_core::{Point, WaypointId};
use evac_spatial::{Router, WaypointSet};
use evac_visibility::VisibilityField;

use crate::{BehaviorResult, ExitPair, Journey, SpeedModel, route_exposure};

/// Visibility of one waypoint as seen from a sample point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WaypointReport {
    pub waypoint: WaypointId,
    pub position: Point,
    pub visible:  bool,
    pub distance: f64,
}

/// Whether each waypoint is visible from `at` at `time`, with its distance.
pub fn waypoint_report(
    field:     &dyn VisibilityField,
    waypoints: &WaypointSet,
    at:        Point,
    time:      f64,
) -> BehaviorResult<Vec<WaypointReport>> {
    waypoints
        .iter()
        .map(|(waypoint, wp)| {
            Ok(WaypointReport {
                waypoint,
                position: wp.position,
                visible:  field.is_visible(time, at, waypoint)?,
                distance: field.distance_to_waypoint(at, waypoint)?,
            })
        })
        .collect()
}

/// `(time, local visibility)` at a fixed point for each of `times`.
pub fn local_visibility_series(
    field: &dyn VisibilityField,
    at:    Point,
    c:     f64,
    times: &[f64],
) -> BehaviorResult<Vec<(f64, f64)>> {
    times
        .iter()
        .map(|&t| Ok((t, field.local_visibility(t, at, c)?)))
        .collect()
}

/// `(visibility, desired speed)` pairs for plotting the speed curve.
pub fn speed_curve(model: &SpeedModel, visibilities: &[f64]) -> Vec<(f64, f64)> {
    visibilities.iter().map(|&v| (v, model.speed(v))).collect()
}

/// Both routes' exposure from one start point at one time.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ExposureSample {
    pub time:      f64,
    pub primary:   f64,
    pub secondary: f64,
    pub journey:   Journey,
}

/// How the route choice from `start` evolves over `times`.
///
/// Routes are computed once, since neither the start point nor the graph
/// change between samples.
pub fn exposure_profile(
    field:     &dyn VisibilityField,
    router:    &dyn Router,
    waypoints: &WaypointSet,
    exits:     &ExitPair,
    start:     Point,
    c:         f64,
    times:     &[f64],
) -> BehaviorResult<Vec<ExposureSample>> {
    let primary_route = router.shortest_path(start, exits.primary)?;
    let secondary_route = router.shortest_path(start, exits.secondary)?;

    times
        .iter()
        .map(|&time| {
            let primary = route_exposure(&primary_route, start, time, field, waypoints, c)?;
            let secondary = route_exposure(&secondary_route, start, time, field, waypoints, c)?;
            Ok(ExposureSample {
                time,
                primary,
                secondary,
                journey: Journey::choose(primary, secondary),
            })
        })
        .collect()
}
