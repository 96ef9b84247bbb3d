//! The fixed waypoint table and nearest-waypoint resolution.
//!
//! Waypoints are the named decision points of the building (corridor
//! junctions, doors, exits).  The visibility field is precomputed per
//! waypoint, so every routed path is translated into a sequence of waypoint
//! ids before any visibility query is made.
//!
//! # Invariants
//!
//! - The table is non-empty, ordered, and never mutated after construction;
//!   `WaypointId(i)` is the `i`-th entry for the whole run.
//! - Resolution is total: every finite point maps to exactly one waypoint.
//!   Equidistant candidates resolve to the lowest index.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use evac_core::{Point, WaypointId};

use crate::{SpatialError, SpatialResult};

// ── Waypoint ──────────────────────────────────────────────────────────────────

/// One entry of the waypoint table.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Waypoint {
    pub position: Point,
    /// Orientation of the sign/door in degrees.  Only consumed when the
    /// visibility field is precomputed; the routing logic ignores it.
    #[cfg_attr(feature = "serde", serde(default))]
    pub heading_deg: f64,
}

impl Waypoint {
    pub const fn new(x: f64, y: f64, heading_deg: f64) -> Self {
        Self { position: Point::new(x, y), heading_deg }
    }
}

// ── R-tree entry ──────────────────────────────────────────────────────────────

#[derive(Clone)]
struct WaypointEntry {
    point: [f64; 2],
    id:    WaypointId,
}

impl RTreeObject for WaypointEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for WaypointEntry {
    /// Squared Euclidean distance, computed exactly like [`Point::distance_2`]
    /// so tie detection agrees with a linear scan.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        Point::new(self.point[0], self.point[1]).distance_2(Point::new(point[0], point[1]))
    }
}

// ── WaypointSet ───────────────────────────────────────────────────────────────

/// Immutable, ordered waypoint table with a spatial index.
pub struct WaypointSet {
    waypoints:      Vec<Waypoint>,
    capture_radius: f64,
    index:          RTree<WaypointEntry>,
}

impl WaypointSet {
    /// Build the table.  Fails on an empty list, a non-finite position, or a
    /// non-positive capture radius.
    pub fn new(waypoints: Vec<Waypoint>, capture_radius: f64) -> SpatialResult<Self> {
        if waypoints.is_empty() {
            return Err(SpatialError::InvalidConfiguration(
                "waypoint list is empty".into(),
            ));
        }
        if !(capture_radius > 0.0) || !capture_radius.is_finite() {
            return Err(SpatialError::InvalidConfiguration(format!(
                "capture radius must be positive, got {capture_radius}"
            )));
        }
        if let Some(i) = waypoints.iter().position(|w| !w.position.is_finite()) {
            return Err(SpatialError::InvalidConfiguration(format!(
                "waypoint {i} has a non-finite position"
            )));
        }

        let entries = waypoints
            .iter()
            .enumerate()
            .map(|(i, w)| WaypointEntry {
                point: w.position.to_array(),
                id:    WaypointId(i as u32),
            })
            .collect();

        Ok(Self {
            waypoints,
            capture_radius,
            index: RTree::bulk_load(entries),
        })
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Radius around every waypoint within which an agent counts as having
    /// reached it.  Shared by all waypoints.
    pub fn capture_radius(&self) -> f64 {
        self.capture_radius
    }

    pub fn get(&self, id: WaypointId) -> Option<&Waypoint> {
        self.waypoints.get(id.index())
    }

    /// Stored position of `id`, or `None` if out of range.
    pub fn position(&self, id: WaypointId) -> Option<Point> {
        self.get(id).map(|w| w.position)
    }

    pub fn as_slice(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn iter(&self) -> impl Iterator<Item = (WaypointId, &Waypoint)> + '_ {
        self.waypoints
            .iter()
            .enumerate()
            .map(|(i, w)| (WaypointId(i as u32), w))
    }

    /// Resolve `point` to its nearest waypoint.
    ///
    /// Among equidistant waypoints the one with the lowest index wins.
    pub fn resolve(&self, point: Point) -> SpatialResult<(WaypointId, &Waypoint)> {
        if !point.is_finite() {
            return Err(SpatialError::InvalidInput(format!(
                "cannot resolve non-finite point {point}"
            )));
        }

        let query = point.to_array();
        let mut candidates = self.index.nearest_neighbor_iter_with_distance_2(&query);
        let (first, best_d2) = candidates.next().ok_or_else(|| {
            SpatialError::InvalidInput("waypoint set is empty".into())
        })?;

        // The iterator yields in ascending distance, so every tie follows
        // the first hit directly.
        let id = candidates
            .take_while(|(_, d2)| *d2 == best_d2)
            .map(|(e, _)| e.id)
            .fold(first.id, |best, id| best.min(id));

        Ok((id, &self.waypoints[id.index()]))
    }
}

// ── Free resolver ─────────────────────────────────────────────────────────────

/// Nearest waypoint by linear scan over any slice.
///
/// Same contract as [`WaypointSet::resolve`]: the first waypoint achieving
/// the minimum distance wins; an empty slice is [`SpatialError::InvalidInput`].
pub fn nearest_waypoint(point: Point, waypoints: &[Waypoint]) -> SpatialResult<(WaypointId, &Waypoint)> {
    let mut best: Option<(usize, f64)> = None;
    for (i, w) in waypoints.iter().enumerate() {
        let d2 = point.distance_2(w.position);
        if best.is_none_or(|(_, best_d2)| d2 < best_d2) {
            best = Some((i, d2));
        }
    }
    let (i, _) = best.ok_or_else(|| SpatialError::InvalidInput("waypoint set is empty".into()))?;
    Ok((WaypointId(i as u32), &waypoints[i]))
}
