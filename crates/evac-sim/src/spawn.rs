//! Spawn areas and the wave schedule.
//!
//! Positions are drawn once per area by rejection sampling and reused for
//! every wave, so each wave refills the same spots.

use serde::{Deserialize, Serialize};

use evac_core::{Point, SimRng, Tick};

use crate::{SimError, SimResult};

/// Attempts per requested agent before giving up on an area.
const MAX_ATTEMPTS_PER_AGENT: usize = 10_000;

/// An axis-aligned rectangular spawn area.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnArea {
    pub min: Point,
    pub max: Point,
}

impl SpawnArea {
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Place `count` points inside `area`, at least `distance_to_edge` from its
/// border and `distance_to_agents` from each other.
///
/// # Errors
///
/// [`SimError::Spawn`] if the shrunken area is empty or the points do not
/// fit after [`MAX_ATTEMPTS_PER_AGENT`] tries per point.
pub fn distribute_in_area(
    area:               &SpawnArea,
    count:              usize,
    distance_to_agents: f64,
    distance_to_edge:   f64,
    rng:                &mut SimRng,
) -> SimResult<Vec<Point>> {
    if count == 0 {
        return Ok(Vec::new());
    }
    let (x0, x1) = (area.min.x + distance_to_edge, area.max.x - distance_to_edge);
    let (y0, y1) = (area.min.y + distance_to_edge, area.max.y - distance_to_edge);
    if !(x0 <= x1 && y0 <= y1) {
        return Err(SimError::Spawn(format!(
            "area {} – {} has no room {distance_to_edge} m from its edges",
            area.min, area.max
        )));
    }

    let min_d2 = distance_to_agents * distance_to_agents;
    let mut placed: Vec<Point> = Vec::with_capacity(count);
    let mut attempts = 0;
    while placed.len() < count {
        if attempts >= MAX_ATTEMPTS_PER_AGENT * count {
            return Err(SimError::Spawn(format!(
                "placed only {} of {count} agents in {} – {} with spacing {distance_to_agents} m",
                placed.len(),
                area.min,
                area.max
            )));
        }
        attempts += 1;
        let candidate = Point::new(rng.gen_range(x0..=x1), rng.gen_range(y0..=y1));
        if placed.iter().all(|p| p.distance_2(candidate) >= min_d2) {
            placed.push(candidate);
        }
    }
    Ok(placed)
}

// ── Spawner ───────────────────────────────────────────────────────────────────

/// Decides when a wave is due and what it contains.
///
/// The first wave is due on the first tick processed.  Later waves are due
/// on every multiple of `interval_ticks` strictly after `repeat_after`,
/// until `max_waves` waves (including the first) have been spawned.
#[derive(Clone, Debug)]
pub struct Spawner {
    positions:      Vec<Point>,
    interval_ticks: Option<u64>,
    repeat_after:   u64,
    max_waves:      Option<u32>,
    waves_spawned:  u32,
}

impl Spawner {
    /// A single wave at the start of the run.
    pub fn once(positions: Vec<Point>) -> Self {
        Self {
            positions,
            interval_ticks: None,
            repeat_after: 0,
            max_waves: Some(1),
            waves_spawned: 0,
        }
    }

    /// A first wave at the start, then one every `interval_ticks` after
    /// `repeat_after`.
    pub fn repeating(
        positions:      Vec<Point>,
        interval_ticks: u64,
        repeat_after:   u64,
        max_waves:      Option<u32>,
    ) -> Self {
        Self {
            positions,
            interval_ticks: Some(interval_ticks.max(1)),
            repeat_after,
            max_waves,
            waves_spawned: 0,
        }
    }

    /// Nobody to spawn, ever.
    pub fn none() -> Self {
        Self::once(Vec::new())
    }

    pub fn positions(&self) -> &[Point] {
        &self.positions
    }

    pub fn waves_spawned(&self) -> u32 {
        self.waves_spawned
    }

    /// No further wave will ever be due.
    pub fn is_exhausted(&self) -> bool {
        if self.positions.is_empty() {
            return true;
        }
        let capped = self.max_waves.is_some_and(|m| self.waves_spawned >= m);
        capped || (self.waves_spawned > 0 && self.interval_ticks.is_none())
    }

    pub fn wave_due(&self, now: Tick) -> bool {
        if self.is_exhausted() {
            return false;
        }
        if self.waves_spawned == 0 {
            return true;
        }
        match self.interval_ticks {
            Some(k) => now.0 > self.repeat_after && now.0.is_multiple_of(k),
            None => false,
        }
    }

    /// Positions of the wave due at `now`, if any, and count it as spawned.
    pub fn take_wave(&mut self, now: Tick) -> Option<&[Point]> {
        if !self.wave_due(now) {
            return None;
        }
        self.waves_spawned += 1;
        Some(&self.positions)
    }
}
