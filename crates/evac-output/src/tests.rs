//! Integration tests for evac-output.

use evac_behavior::{Decision, Journey};
use evac_core::{AgentId, Point, Tick};
use evac_sim::DecisionRecord;

use crate::row::{DecisionRow, TrajectoryRow};

fn record(agent: u32, previous: Journey, journey: Journey) -> DecisionRecord {
    DecisionRecord {
        agent:    AgentId(agent),
        position: Point::new(1.5, -2.0),
        previous,
        decision: Decision {
            journey,
            desired_speed:      0.75,
            local_visibility:   Some(12.0),
            primary_exposure:   Some(4.0),
            secondary_exposure: None,
        },
    }
}

fn traj_row(agent_id: u32, tick: u64) -> TrajectoryRow {
    TrajectoryRow {
        tick,
        time: tick as f64 * 0.01,
        agent_id,
        x: agent_id as f64,
        y: 0.5,
        journey_id: 0,
        desired_speed: 1.0,
    }
}

// ── Rows ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod row_tests {
    use super::*;

    #[test]
    fn decision_row_flattens_record() {
        let row = DecisionRow::new(Tick(40_000), 400.0, &record(3, Journey::Primary, Journey::Secondary));
        assert_eq!(row.tick, 40_000);
        assert_eq!(row.agent_id, 3);
        assert_eq!((row.x, row.y), (1.5, -2.0));
        assert_eq!((row.previous, row.journey), ("primary", "secondary"));
        assert_eq!(row.secondary_exposure, None);
    }
}

// ── CSV tests ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use evac_behavior::diagnostics::ExposureSample;

    use super::*;
    use crate::csv::{
        CsvWriter, DECISION_HEADER, TRAJECTORY_HEADER, write_exposure_profile_csv, write_series_csv,
    };
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn headers(path: &std::path::Path) -> Vec<String> {
        let mut rdr = csv::Reader::from_path(path).unwrap();
        rdr.headers().unwrap().iter().map(str::to_owned).collect()
    }

    fn records(path: &std::path::Path) -> Vec<csv::StringRecord> {
        let mut rdr = csv::Reader::from_path(path).unwrap();
        rdr.records().map(|r| r.unwrap()).collect()
    }

    #[test]
    fn csv_files_created_with_headers() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        assert_eq!(headers(&dir.path().join("decisions.csv")), DECISION_HEADER);
        assert_eq!(headers(&dir.path().join("trajectories.csv")), TRAJECTORY_HEADER);
    }

    #[test]
    fn decisions_leave_missing_values_blank() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        let row = DecisionRow::new(Tick(2000), 20.0, &record(0, Journey::Primary, Journey::Primary));
        w.write_decisions(&[row]).unwrap();
        w.finish().unwrap();

        let rows = records(&dir.path().join("decisions.csv"));
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "2000");
        assert_eq!(&rows[0][6], "primary");
        assert_eq!(&rows[0][8], "12");  // local_visibility
        assert_eq!(&rows[0][10], "");   // secondary_exposure
    }

    #[test]
    fn trajectories_in_written_order() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_trajectories(&[traj_row(0, 5), traj_row(1, 5), traj_row(2, 5)]).unwrap();
        w.finish().unwrap();

        let rows = records(&dir.path().join("trajectories.csv"));
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][0], "5"); // tick
        assert_eq!(&rows[2][2], "2"); // agent_id
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_decisions(&[]).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tmp();
        assert!(CsvWriter::new(&dir.path().join("nope")).is_err());
    }

    #[test]
    fn exposure_profile_written() {
        let dir = tmp();
        let path = dir.path().join("exposure_profile.csv");
        let samples = [
            ExposureSample { time: 0.0, primary: 60.0, secondary: 30.0, journey: Journey::Primary },
            ExposureSample { time: 20.0, primary: 1.5, secondary: 9.0, journey: Journey::Secondary },
        ];
        write_exposure_profile_csv(&path, &samples).unwrap();

        let rows = records(&path);
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[1][0], "20");
        assert_eq!(&rows[1][2], "9");
        assert_eq!(&rows[1][3], "secondary");
    }

    #[test]
    fn speed_curve_series_written() {
        let dir = tmp();
        let path = dir.path().join("speed_curve.csv");
        let curve = evac_behavior::diagnostics::speed_curve(
            &evac_behavior::SpeedModel::default(),
            &[0.0, 3.0, 8.0],
        );
        write_series_csv(&path, ["visibility", "desired_speed"], &curve).unwrap();

        assert_eq!(headers(&path), ["visibility", "desired_speed"]);
        let rows = records(&path);
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[1][1], "0");
        let top: f64 = rows[2][1].parse().unwrap();
        assert!(top > 0.0 && top <= 1.0, "got {top}");
    }
}

// ── Observer tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod observer_tests {
    use evac_behavior::BehaviorError;
    use evac_core::JourneyId;
    use evac_motion::{AgentSpawn, KinematicEngine, MotionEngine};
    use evac_sim::SimObserver;
    use evac_spatial::{Router, SpatialResult};

    use super::*;
    use crate::{OutputError, OutputResult, OutputWriter, SimOutputObserver};

    struct StraightRouter;

    impl Router for StraightRouter {
        fn shortest_path(&self, origin: Point, destination: Point) -> SpatialResult<Vec<Point>> {
            Ok(vec![origin, destination])
        }
    }

    /// Keeps rows in memory; optionally fails every write.
    #[derive(Default)]
    struct MemWriter {
        decisions:    Vec<DecisionRow>,
        trajectories: Vec<TrajectoryRow>,
        finished:     usize,
        fail:         bool,
    }

    impl MemWriter {
        fn check(&self) -> OutputResult<()> {
            if self.fail {
                return Err(OutputError::Io(std::io::Error::other("disk full")));
            }
            Ok(())
        }
    }

    impl OutputWriter for MemWriter {
        fn write_decisions(&mut self, rows: &[DecisionRow]) -> OutputResult<()> {
            self.check()?;
            self.decisions.extend_from_slice(rows);
            Ok(())
        }

        fn write_trajectories(&mut self, rows: &[TrajectoryRow]) -> OutputResult<()> {
            self.check()?;
            self.trajectories.extend_from_slice(rows);
            Ok(())
        }

        fn finish(&mut self) -> OutputResult<()> {
            self.finished += 1;
            Ok(())
        }
    }

    #[test]
    fn decisions_and_switches_recorded() {
        let mut obs = SimOutputObserver::new(MemWriter::default());
        obs.on_decisions(Tick(2000), 20.0, &[
            record(0, Journey::Primary, Journey::Primary),
            record(1, Journey::Primary, Journey::Secondary),
        ]);
        obs.on_decisions(Tick(4000), 40.0, &[]);
        assert_eq!(obs.switches(), 1);
        assert!(obs.take_error().is_none());
        let w = obs.into_writer();
        assert_eq!(w.decisions.len(), 2);
        assert_eq!(w.decisions[1].journey, "secondary");
    }

    #[test]
    fn snapshot_lists_active_agents() {
        let mut engine = KinematicEngine::new(StraightRouter, 0.1).unwrap();
        let stage = engine.add_exit_stage(Point::new(10.0, 0.0), 0.5).unwrap();
        let journey = engine.add_journey(vec![stage]).unwrap();
        for x in [0.0, 2.0] {
            engine
                .add_agent(AgentSpawn { position: Point::new(x, 0.0), journey, stage, desired_speed: 0.5 })
                .unwrap();
        }

        let mut obs = SimOutputObserver::new(MemWriter::default());
        obs.on_snapshot(Tick(100), 1.0, &engine);
        obs.on_sim_end(Tick(100));
        let w = obs.into_writer();
        assert_eq!(w.trajectories.len(), 2);
        assert_eq!(w.trajectories[1].x, 2.0);
        assert_eq!(w.trajectories[1].journey_id, JourneyId(0).0);
        assert_eq!(w.trajectories[0].desired_speed, 0.5);
        assert_eq!(w.finished, 1);
    }

    #[test]
    fn keeps_first_error_and_counts_skips() {
        let mut obs = SimOutputObserver::new(MemWriter { fail: true, ..MemWriter::default() });
        obs.on_decisions(Tick(1), 0.01, &[record(0, Journey::Primary, Journey::Primary)]);
        obs.on_agent_skipped(Tick(2), AgentId(0), &BehaviorError::InvalidInput("x".into()));
        assert_eq!(obs.skipped(), 1);
        assert!(matches!(obs.take_error(), Some(OutputError::Io(_))));
        assert!(obs.take_error().is_none());
    }
}

// ── SQLite tests ──────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use tempfile::TempDir;

    use super::*;
    use crate::sqlite::SqliteWriter;
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn sqlite_db_created() {
        let dir = tmp();
        let _w = SqliteWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("output.db").exists());
    }

    #[test]
    fn sqlite_trajectory_count() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_trajectories(&[traj_row(0, 1), traj_row(1, 1), traj_row(2, 1)]).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM trajectories", [], |r| r.get(0)
        ).unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn sqlite_missing_exposure_is_null() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        let row = DecisionRow::new(Tick(7), 0.07, &record(4, Journey::Secondary, Journey::Primary));
        w.write_decisions(&[row]).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let (journey, primary, secondary): (String, Option<f64>, Option<f64>) = conn.query_row(
            "SELECT journey, primary_exposure, secondary_exposure FROM decisions WHERE agent_id = 4",
            [],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        ).unwrap();
        assert_eq!(journey, "primary");
        assert_eq!(primary, Some(4.0));
        assert_eq!(secondary, None);
    }

    #[test]
    fn sqlite_duplicate_trajectory_rejected() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_trajectories(&[traj_row(0, 1)]).unwrap();
        assert!(w.write_trajectories(&[traj_row(0, 1)]).is_err());
    }

    #[test]
    fn sqlite_rerun_in_same_dir_starts_empty() {
        let dir = tmp();
        for _ in 0..2 {
            let mut w = SqliteWriter::new(dir.path()).unwrap();
            let row = DecisionRow::new(Tick(100), 1.0, &record(0, Journey::Primary, Journey::Secondary));
            w.write_decisions(&[row]).unwrap();
            w.write_trajectories(&[traj_row(0, 100)]).unwrap();
            w.finish().unwrap();
        }

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let decisions: i64 = conn.query_row("SELECT COUNT(*) FROM decisions", [], |r| r.get(0)).unwrap();
        let trajectories: i64 =
            conn.query_row("SELECT COUNT(*) FROM trajectories", [], |r| r.get(0)).unwrap();
        assert_eq!((decisions, trajectories), (1, 1));
    }
}
