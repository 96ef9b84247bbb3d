//! Per-agent motion state and the value types the engine is configured with.

use evac_core::{JourneyId, Point, StageId};

/// Everything needed to put a new agent into the engine.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AgentSpawn {
    pub position:      Point,
    pub journey:       JourneyId,
    pub stage:         StageId,
    /// Metres per second.  New agents usually stand still until the first
    /// re-evaluation sets a speed.
    pub desired_speed: f64,
}

/// A circular exit zone.  Agents whose current stage is this one leave the
/// simulation once they are within `radius` of `center`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ExitStage {
    pub center: Point,
    pub radius: f64,
}

/// The motion state of a single agent.
#[derive(Clone, Debug, PartialEq)]
pub struct MotionState {
    /// `false` once the agent has left through its exit.
    pub active: bool,

    pub position: Point,

    pub journey: JourneyId,

    /// Stage the agent is currently walking to.
    pub stage: StageId,

    pub desired_speed: f64,
}

impl MotionState {
    #[inline]
    pub fn from_spawn(spawn: &AgentSpawn) -> Self {
        Self {
            active:        true,
            position:      spawn.position,
            journey:       spawn.journey,
            stage:         spawn.stage,
            desired_speed: spawn.desired_speed,
        }
    }
}

/// A routed path plus how far along it the agent is.
#[derive(Clone, Debug, PartialEq)]
pub struct Polyline {
    points: Vec<Point>,
    /// Index of the next vertex to reach.
    next:   usize,
}

impl Polyline {
    /// Wrap a router path.  The first vertex is the agent's own position and
    /// is already reached.
    pub fn new(points: Vec<Point>) -> Self {
        let next = points.len().min(1);
        Self { points, next }
    }

    pub fn is_finished(&self) -> bool {
        self.next >= self.points.len()
    }

    /// Vertices not yet reached.
    pub fn remaining(&self) -> &[Point] {
        &self.points[self.next..]
    }

    /// Walk `step` metres from `from` along the remaining vertices and return
    /// the new position.  Stops at the last vertex.
    pub fn advance(&mut self, from: Point, step: f64) -> Point {
        let mut pos = from;
        let mut budget = step;
        while budget > 0.0 && !self.is_finished() {
            let target = self.points[self.next];
            let d = pos.distance(target);
            if d <= budget {
                pos = target;
                budget -= d;
                self.next += 1;
            } else {
                pos = pos.lerp(target, budget / d);
                budget = 0.0;
            }
        }
        pos
    }
}
