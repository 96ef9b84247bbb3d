//! `VisibilityMap` — a visibility field backed by precomputed tables.
//!
//! # Data model
//!
//! For each precomputed time point the map stores
//!
//! - the smoke **extinction coefficient** `K` (1/m) of every grid cell, and
//! - for every waypoint, a flag per cell telling whether that waypoint can
//!   be seen from the cell.
//!
//! Local visibility follows the usual sign-visibility relation
//! `V = c / K`, capped at `max_visibility` (clear air has `K → 0`).
//!
//! # Time lookup
//!
//! A query at `t` uses the latest time point not after `t`.  Times before the
//! first point or after the last one are outside the horizon and fail with
//! [`VisibilityError::TimeOutOfRange`].

use serde::{Deserialize, Serialize};

use evac_core::{Point, WaypointId};

use crate::{GridSpec, VisibilityError, VisibilityField, VisibilityResult};

/// Visibility cap in metres used when the caller does not choose one.
pub const DEFAULT_MAX_VISIBILITY: f64 = 30.0;

/// Precomputed visibility tables over a regular grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisibilityMap {
    grid:           GridSpec,
    times:          Vec<f64>,
    waypoints:      Vec<Point>,
    max_visibility: f64,
    /// `[time][cell]`, 1/m.
    extinction:     Vec<Vec<f32>>,
    /// `[time][waypoint · cell_count + cell]`.
    visible:        Vec<Vec<bool>>,
}

impl VisibilityMap {
    /// Assemble and validate a map.
    ///
    /// `extinction[t]` must hold one value per grid cell and `visible[t]`
    /// one flag per (waypoint, cell) pair, waypoint-major.
    pub fn new(
        grid:           GridSpec,
        times:          Vec<f64>,
        waypoints:      Vec<Point>,
        max_visibility: f64,
        extinction:     Vec<Vec<f32>>,
        visible:        Vec<Vec<bool>>,
    ) -> VisibilityResult<Self> {
        let map = Self { grid, times, waypoints, max_visibility, extinction, visible };
        map.validate()?;
        Ok(map)
    }

    /// Check every shape invariant.  Called on construction and after a
    /// cache load, since a cache file may be stale or hand-edited.
    pub fn validate(&self) -> VisibilityResult<()> {
        self.grid.validate()?;
        if self.times.is_empty() {
            return Err(VisibilityError::InvalidData("no time points".into()));
        }
        if self.times.iter().any(|t| !t.is_finite()) || !self.times.is_sorted_by(|a, b| a < b) {
            return Err(VisibilityError::InvalidData(
                "time points must be finite and strictly ascending".into(),
            ));
        }
        if !(self.max_visibility > 0.0) || !self.max_visibility.is_finite() {
            return Err(VisibilityError::InvalidData(format!(
                "max visibility must be positive, got {}",
                self.max_visibility
            )));
        }

        let cells = self.grid.cell_count();
        let flags = cells * self.waypoints.len();
        if self.extinction.len() != self.times.len() || self.visible.len() != self.times.len() {
            return Err(VisibilityError::InvalidData(format!(
                "expected {} time slices, got {} extinction / {} visibility",
                self.times.len(),
                self.extinction.len(),
                self.visible.len()
            )));
        }
        for (t, (k, v)) in self.extinction.iter().zip(&self.visible).enumerate() {
            if k.len() != cells {
                return Err(VisibilityError::InvalidData(format!(
                    "time slice {t}: {} extinction values for {cells} cells",
                    k.len()
                )));
            }
            if v.len() != flags {
                return Err(VisibilityError::InvalidData(format!(
                    "time slice {t}: {} visibility flags for {flags} (waypoint, cell) pairs",
                    v.len()
                )));
            }
            if k.iter().any(|&x| !(x >= 0.0)) {
                return Err(VisibilityError::InvalidData(format!(
                    "time slice {t}: extinction must be non-negative"
                )));
            }
        }
        Ok(())
    }

    pub fn grid(&self) -> &GridSpec {
        &self.grid
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn waypoint_count(&self) -> usize {
        self.waypoints.len()
    }

    pub fn max_visibility(&self) -> f64 {
        self.max_visibility
    }

    /// Index of the time slice used for a query at `time`.
    pub fn time_index(&self, time: f64) -> VisibilityResult<usize> {
        let start = self.times[0];
        let end   = self.times[self.times.len() - 1];
        if !(time >= start && time <= end) {
            return Err(VisibilityError::TimeOutOfRange { time, start, end });
        }
        Ok(self.times.partition_point(|&t| t <= time) - 1)
    }

    fn waypoint_pos(&self, waypoint: WaypointId) -> VisibilityResult<Point> {
        self.waypoints
            .get(waypoint.index())
            .copied()
            .ok_or(VisibilityError::UnknownWaypoint(waypoint))
    }

    /// Raw extinction coefficient at `at` for `time`.
    pub fn extinction_at(&self, time: f64, at: Point) -> VisibilityResult<f64> {
        let t = self.time_index(time)?;
        let cell = self.grid.cell_of(at)?;
        Ok(self.extinction[t][cell] as f64)
    }
}

impl VisibilityField for VisibilityMap {
    fn is_visible(&self, time: f64, at: Point, waypoint: WaypointId) -> VisibilityResult<bool> {
        self.waypoint_pos(waypoint)?;
        let t = self.time_index(time)?;
        let cell = self.grid.cell_of(at)?;
        Ok(self.visible[t][waypoint.index() * self.grid.cell_count() + cell])
    }

    fn local_visibility(&self, time: f64, at: Point, c: f64) -> VisibilityResult<f64> {
        if !(c > 0.0) || !c.is_finite() {
            return Err(VisibilityError::InvalidFactor(c));
        }
        let k = self.extinction_at(time, at)?;
        if k <= 0.0 {
            return Ok(self.max_visibility);
        }
        Ok((c / k).min(self.max_visibility))
    }

    fn distance_to_waypoint(&self, at: Point, waypoint: WaypointId) -> VisibilityResult<f64> {
        Ok(at.distance(self.waypoint_pos(waypoint)?))
    }
}
