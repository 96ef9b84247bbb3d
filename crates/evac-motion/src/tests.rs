//! Unit tests for evac-motion.

use std::sync::Arc;

use evac_core::{AgentId, JourneyId, Point, StageId};
use evac_spatial::{GraphRouter, NavGraphBuilder, Router, SpatialError, SpatialResult};

use crate::{AgentSpawn, KinematicEngine, MotionEngine, MotionError, Polyline};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Walks in a straight line to any destination.
struct StraightRouter;

impl Router for StraightRouter {
    fn shortest_path(&self, origin: Point, destination: Point) -> SpatialResult<Vec<Point>> {
        Ok(vec![origin, destination])
    }
}

/// Refuses every request.
struct WallRouter;

impl Router for WallRouter {
    fn shortest_path(&self, origin: Point, destination: Point) -> SpatialResult<Vec<Point>> {
        Err(SpatialError::NoRoute { from: origin, to: destination })
    }
}

/// Exits at x = +10 (journey 0) and x = −10 (journey 1), radius 0.5, dt 0.1.
fn corridor() -> (KinematicEngine<StraightRouter>, [(JourneyId, StageId); 2]) {
    let mut e = KinematicEngine::new(StraightRouter, 0.1).unwrap();
    let right = e.add_exit_stage(Point::new(10.0, 0.0), 0.5).unwrap();
    let left = e.add_exit_stage(Point::new(-10.0, 0.0), 0.5).unwrap();
    let jr = e.add_journey(vec![right]).unwrap();
    let jl = e.add_journey(vec![left]).unwrap();
    (e, [(jr, right), (jl, left)])
}

fn spawn_at(x: f64, (journey, stage): (JourneyId, StageId), speed: f64) -> AgentSpawn {
    AgentSpawn { position: Point::new(x, 0.0), journey, stage, desired_speed: speed }
}

// ── Polyline ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod polyline {
    use super::*;

    #[test]
    fn first_vertex_counts_as_reached() {
        let line = Polyline::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)]);
        assert_eq!(line.remaining(), &[Point::new(1.0, 0.0)]);
        assert!(Polyline::new(vec![]).is_finished());
    }

    #[test]
    fn advance_turns_corners() {
        let mut line = Polyline::new(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 2.0),
        ]);
        let p = line.advance(Point::new(0.0, 0.0), 1.5);
        assert!((p.x - 1.0).abs() < 1e-12 && (p.y - 0.5).abs() < 1e-12, "{p}");
        assert_eq!(line.remaining().len(), 1);
    }

    #[test]
    fn advance_stops_at_end() {
        let mut line = Polyline::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)]);
        let p = line.advance(Point::new(0.0, 0.0), 5.0);
        assert_eq!(p, Point::new(1.0, 0.0));
        assert!(line.is_finished());
        assert_eq!(line.advance(p, 1.0), p);
    }
}

// ── Configuration ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod setup {
    use super::*;

    #[test]
    fn rejects_bad_step_and_radius() {
        assert!(KinematicEngine::new(StraightRouter, 0.0).is_err());
        let mut e = KinematicEngine::new(StraightRouter, 0.1).unwrap();
        assert!(e.add_exit_stage(Point::new(0.0, 0.0), 0.0).is_err());
    }

    #[test]
    fn journey_needs_known_stages() {
        let mut e = KinematicEngine::new(StraightRouter, 0.1).unwrap();
        assert!(matches!(e.add_journey(vec![]), Err(MotionError::InvalidInput(_))));
        assert!(matches!(
            e.add_journey(vec![StageId(3)]),
            Err(MotionError::UnknownStage(StageId(3)))
        ));
    }

    #[test]
    fn ids_are_sequential() {
        let (mut e, [right, _]) = corridor();
        let a = e.add_agent(spawn_at(0.0, right, 0.0)).unwrap();
        let b = e.add_agent(spawn_at(1.0, right, 0.0)).unwrap();
        assert_eq!((a, b), (AgentId(0), AgentId(1)));
        assert_eq!(e.active_agents(), vec![a, b]);
    }

    #[test]
    fn spawn_rejects_mismatched_stage() {
        let (mut e, [(jr, _), (_, left)]) = corridor();
        let result = e.add_agent(spawn_at(0.0, (jr, left), 0.0));
        assert!(matches!(result, Err(MotionError::StageNotInJourney { .. })));
        assert!(e.active_agents().is_empty());
    }

    #[test]
    fn spawn_without_route_fails() {
        let mut e = KinematicEngine::new(WallRouter, 0.1).unwrap();
        let s = e.add_exit_stage(Point::new(10.0, 0.0), 0.5).unwrap();
        let j = e.add_journey(vec![s]).unwrap();
        let result = e.add_agent(spawn_at(0.0, (j, s), 1.0));
        assert!(matches!(result, Err(MotionError::Routing(_))));
    }
}

// ── Stepping ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod stepping {
    use super::*;

    #[test]
    fn moves_speed_times_dt() {
        let (mut e, [right, _]) = corridor();
        let a = e.add_agent(spawn_at(0.0, right, 1.0)).unwrap();
        e.iterate().unwrap();
        assert!((e.position(a).unwrap().x - 0.1).abs() < 1e-12);
        assert_eq!(e.iteration_count(), 1);
        assert!((e.elapsed_time() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn zero_speed_stands_still() {
        let (mut e, [right, _]) = corridor();
        let a = e.add_agent(spawn_at(2.0, right, 0.0)).unwrap();
        for _ in 0..10 {
            e.iterate().unwrap();
        }
        assert_eq!(e.position(a).unwrap(), Point::new(2.0, 0.0));
    }

    #[test]
    fn agent_leaves_inside_exit_radius() {
        let (mut e, [right, _]) = corridor();
        let a = e.add_agent(spawn_at(9.05, right, 1.0)).unwrap();
        // Zone edge at x = 9.5, 0.1 m per step.
        for _ in 0..4 {
            assert!(e.iterate().unwrap().is_empty());
        }
        assert_eq!(e.iterate().unwrap(), vec![a]);
        assert!(e.active_agents().is_empty());
        assert!(matches!(e.position(a), Err(MotionError::UnknownAgent(_))));
        assert!(e.store.routes.is_empty());
    }

    #[test]
    fn exited_agents_reject_updates() {
        let (mut e, [right, _]) = corridor();
        let a = e.add_agent(spawn_at(10.0, right, 0.0)).unwrap();
        assert_eq!(e.iterate().unwrap(), vec![a]);
        assert!(e.set_desired_speed(a, 1.0).is_err());
    }

    #[test]
    fn exit_in_the_middle_keeps_active_ids_ordered() {
        let (mut e, [right, _]) = corridor();
        let a = e.add_agent(spawn_at(0.0, right, 0.0)).unwrap();
        let b = e.add_agent(spawn_at(10.0, right, 0.0)).unwrap();
        let c = e.add_agent(spawn_at(2.0, right, 0.0)).unwrap();
        assert_eq!(e.iterate().unwrap(), vec![b]);
        assert_eq!(e.active_agents(), vec![a, c]);
        assert_eq!(e.store.active_ids(), &[a, c]);
        assert_eq!(e.store.active_count(), 2);
        assert_eq!(e.store.states.len(), 3);

        let d = e.add_agent(spawn_at(4.0, right, 0.0)).unwrap();
        assert_eq!(e.active_agents(), vec![a, c, d]);
        // Removing twice leaves the list alone.
        e.store.remove(b);
        assert_eq!(e.store.active_count(), 3);
    }
}

// ── Journey switching ─────────────────────────────────────────────────────────

#[cfg(test)]
mod switching {
    use super::*;

    #[test]
    fn switch_reroutes_toward_new_exit() {
        let (mut e, [right, left]) = corridor();
        let a = e.add_agent(spawn_at(0.0, right, 1.0)).unwrap();
        e.iterate().unwrap();
        e.switch_journey(a, left.0, left.1).unwrap();
        assert_eq!(e.assignment(a).unwrap(), left);
        e.iterate().unwrap();
        assert!(e.position(a).unwrap().x.abs() < 1e-12);
        assert_eq!(e.remaining_route(a).unwrap(), &[Point::new(-10.0, 0.0)]);
    }

    #[test]
    fn redundant_switch_is_a_no_op() {
        let (mut e, [right, _]) = corridor();
        let a = e.add_agent(spawn_at(0.0, right, 1.0)).unwrap();
        e.iterate().unwrap();
        let before = e.remaining_route(a).unwrap().to_vec();
        e.switch_journey(a, right.0, right.1).unwrap();
        e.switch_journey(a, right.0, right.1).unwrap();
        assert_eq!(e.remaining_route(a).unwrap(), before.as_slice());
        assert_eq!(e.assignment(a).unwrap(), right);
    }

    #[test]
    fn unknown_journey_rejected() {
        let (mut e, [right, _]) = corridor();
        let a = e.add_agent(spawn_at(0.0, right, 1.0)).unwrap();
        assert!(matches!(
            e.switch_journey(a, JourneyId(9), StageId(0)),
            Err(MotionError::UnknownJourney(JourneyId(9)))
        ));
        assert_eq!(e.assignment(a).unwrap(), right);
    }

    #[test]
    fn negative_speed_rejected() {
        let (mut e, [right, _]) = corridor();
        let a = e.add_agent(spawn_at(0.0, right, 1.0)).unwrap();
        assert!(e.set_desired_speed(a, -0.5).is_err());
        assert_eq!(e.desired_speed(a).unwrap(), 1.0);
    }

    #[test]
    fn follows_shared_graph_router() {
        let mut b = NavGraphBuilder::new();
        let n0 = b.add_node(Point::new(0.0, 0.0));
        let n1 = b.add_node(Point::new(0.0, 5.0));
        let n2 = b.add_node(Point::new(5.0, 5.0));
        b.add_corridor(n0, n1);
        b.add_corridor(n1, n2);
        let router = Arc::new(GraphRouter::new(b.build()));

        let mut e = KinematicEngine::new(Arc::clone(&router), 1.0).unwrap();
        let s = e.add_exit_stage(Point::new(5.0, 5.0), 0.5).unwrap();
        let j = e.add_journey(vec![s]).unwrap();
        let a = e
            .add_agent(AgentSpawn { position: Point::new(0.0, 0.0), journey: j, stage: s, desired_speed: 1.0 })
            .unwrap();
        for _ in 0..3 {
            e.iterate().unwrap();
        }
        // Up the first corridor, not diagonally.
        let p = e.position(a).unwrap();
        assert!(p.x.abs() < 1e-12 && (p.y - 3.0).abs() < 1e-9, "{p}");
        assert_eq!(Arc::strong_count(&router), 2);
    }
}
