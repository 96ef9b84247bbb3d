//! Route exposure: how much of a candidate route the agent can see.
//!
//! A routed path is first translated into waypoint ids ([`map_path`]), each
//! tagged with whether that waypoint is visible from where the agent stands.
//! [`aggregate`] then sums the local visibility at every visible waypoint,
//! counting each waypoint once however many path vertices resolve to it.
//!
//! Higher exposure means more of the route lies in clear air.

use rustc_hash::FxHashSet;

use evac_core::{Point, WaypointId};
use evac_spatial::WaypointSet;
use evac_visibility::VisibilityField;

use crate::{BehaviorError, BehaviorResult};

/// Resolve every decision point of `route` to its nearest waypoint and ask
/// the field whether that waypoint is visible from `agent_position`.
///
/// `route` is the raw router output: its first point is the agent's own
/// position and is skipped.  Order is preserved and repeats are kept.
///
/// # Errors
///
/// - [`BehaviorError::InvalidInput`] if `route` is empty.
/// - [`BehaviorError::VisibilityQuery`] if the field rejects the query.
pub fn map_path(
    route:          &[Point],
    agent_position: Point,
    time:           f64,
    field:          &dyn VisibilityField,
    waypoints:      &WaypointSet,
) -> BehaviorResult<Vec<(WaypointId, bool)>> {
    let Some((_, decision_points)) = route.split_first() else {
        return Err(BehaviorError::InvalidInput("route has no points".into()));
    };

    decision_points
        .iter()
        .map(|&vertex| {
            let (id, _) = waypoints.resolve(vertex)?;
            let visible = field.is_visible(time, agent_position, id)?;
            Ok((id, visible))
        })
        .collect()
}

/// Sum the local visibility (factor `c`) at each first-seen visible waypoint
/// of `mapped`.  Returns `0.0` when nothing qualifies.
pub fn aggregate(
    mapped:    &[(WaypointId, bool)],
    waypoints: &WaypointSet,
    time:      f64,
    field:     &dyn VisibilityField,
    c:         f64,
) -> BehaviorResult<f64> {
    let mut counted = FxHashSet::default();
    let mut total = 0.0;

    for &(id, visible) in mapped {
        if !visible || !counted.insert(id) {
            continue;
        }
        let position = waypoints.position(id).ok_or_else(|| {
            BehaviorError::InvalidInput(format!("{id} is not in the waypoint table"))
        })?;
        total += field.local_visibility(time, position, c)?;
    }
    Ok(total)
}

/// [`map_path`] followed by [`aggregate`].
pub fn route_exposure(
    route:          &[Point],
    agent_position: Point,
    time:           f64,
    field:          &dyn VisibilityField,
    waypoints:      &WaypointSet,
    c:              f64,
) -> BehaviorResult<f64> {
    let mapped = map_path(route, agent_position, time, field, waypoints)?;
    aggregate(&mapped, waypoints, time, field, c)
}
