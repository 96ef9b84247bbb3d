//! Unit tests for evac-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AgentId, StageId, WaypointId};

    #[test]
    fn index_roundtrip() {
        let id = WaypointId(5);
        assert_eq!(id.index(), 5);
        assert_eq!(WaypointId::try_from(5usize).unwrap(), id);
    }

    #[test]
    fn default_is_invalid() {
        assert_eq!(AgentId::default(), AgentId::INVALID);
        assert_eq!(StageId::INVALID.0, u32::MAX);
    }

    #[test]
    fn display() {
        assert_eq!(WaypointId(2).to_string(), "WaypointId(2)");
    }
}

#[cfg(test)]
mod geo {
    use crate::Point;

    #[test]
    fn distance_is_euclidean() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance(b) - 5.0).abs() < 1e-12);
        assert!((a.distance_2(b) - 25.0).abs() < 1e-12);
    }

    #[test]
    fn lerp_midpoint() {
        let m = Point::new(0.0, 0.0).lerp(Point::new(10.0, -2.0), 0.5);
        assert_eq!(m, Point::new(5.0, -1.0));
    }

    #[test]
    fn from_tuple() {
        assert_eq!(Point::from((1.5, 2.5)), Point::new(1.5, 2.5));
    }
}

#[cfg(test)]
mod time {
    use crate::{SimClock, SimConfig, Tick};

    #[test]
    fn clock_advances_in_dt_steps() {
        let mut clock = SimClock::new(0.01);
        for _ in 0..250 {
            clock.advance();
        }
        assert_eq!(clock.current_tick, Tick(250));
        assert!((clock.elapsed_secs() - 2.5).abs() < 1e-9);
    }

    #[test]
    fn ticks_for_secs_exact_multiple() {
        let clock = SimClock::new(0.01);
        assert_eq!(clock.ticks_for_secs(20.0), 2_000);
        assert_eq!(clock.ticks_for_secs(2.0), 200);
    }

    #[test]
    fn ticks_for_secs_rounds_up() {
        let clock = SimClock::new(0.4);
        assert_eq!(clock.ticks_for_secs(1.0), 3);
    }

    #[test]
    fn ticks_for_secs_never_zero() {
        let clock = SimClock::new(1.0);
        assert_eq!(clock.ticks_for_secs(0.0), 1);
    }

    #[test]
    fn period_independent_of_step_size() {
        let coarse = SimClock::new(0.05);
        let fine = SimClock::new(0.01);
        let period = 5.0;
        let coarse_secs = coarse.ticks_for_secs(period) as f64 * coarse.dt_secs;
        let fine_secs = fine.ticks_for_secs(period) as f64 * fine.dt_secs;
        assert!((coarse_secs - fine_secs).abs() < 1e-9);
    }

    #[test]
    fn config_end_and_premovement_ticks() {
        let cfg = SimConfig {
            dt_secs: 0.5,
            total_secs: 10.0,
            premovement_secs: 2.0,
            ..SimConfig::default()
        };
        assert_eq!(cfg.end_tick(), Tick(20));
        assert_eq!(cfg.premovement_ticks(), 4);
        assert_eq!(cfg.snapshot_interval_ticks(), Some(2));
    }

    #[test]
    fn zero_premovement_starts_immediately() {
        let cfg = SimConfig { premovement_secs: 0.0, ..SimConfig::default() };
        assert_eq!(cfg.premovement_ticks(), 0);
    }

    #[test]
    fn validate_rejects_bad_step() {
        let cfg = SimConfig { dt_secs: 0.0, ..SimConfig::default() };
        assert!(cfg.validate().is_err());
        let cfg = SimConfig { dt_secs: f64::NAN, ..SimConfig::default() };
        assert!(cfg.validate().is_err());
        let cfg = SimConfig { total_secs: -1.0, ..SimConfig::default() };
        assert!(cfg.validate().is_err());
        assert!(SimConfig::default().validate().is_ok());
    }
}

#[cfg(test)]
mod rng {
    use crate::SimRng;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SimRng::new(7);
        let mut b = SimRng::new(7);
        let xs: Vec<f64> = (0..5).map(|_| a.gen_range(0.0..1.0)).collect();
        let ys: Vec<f64> = (0..5).map(|_| b.gen_range(0.0..1.0)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn children_are_independent_of_parent_draws() {
        let mut c1 = SimRng::child(7, 3);
        let mut c2 = SimRng::child(7, 3);
        let mut other = SimRng::child(7, 4);
        let a: u32 = c1.gen_range(0..u32::MAX);
        let b: u32 = c2.gen_range(0..u32::MAX);
        let c: u32 = other.gen_range(0..u32::MAX);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
