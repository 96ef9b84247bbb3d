//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use tracing::warn;

use evac_behavior::BehaviorError;
use evac_core::{AgentId, Tick};
use evac_motion::MotionEngine;
use evac_sim::{DecisionRecord, SimObserver};

use crate::row::{DecisionRow, TrajectoryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes decisions and trajectory snapshots to any
/// [`OutputWriter`] backend (CSV, SQLite, …).
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    skipped:    u64,
    switches:   u64,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            skipped:    0,
            switches:   0,
            last_error: None,
        }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Re-evaluations skipped because of recoverable errors.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Decisions that changed an agent's journey.
    pub fn switches(&self) -> u64 {
        self.switches
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

fn trajectory_rows(tick: Tick, time: f64, engine: &dyn MotionEngine) -> OutputResult<Vec<TrajectoryRow>> {
    engine
        .active_agents()
        .into_iter()
        .map(|agent| {
            let position = engine.position(agent)?;
            let (journey, _) = engine.assignment(agent)?;
            Ok(TrajectoryRow {
                tick:          tick.0,
                time,
                agent_id:      agent.0,
                x:             position.x,
                y:             position.y,
                journey_id:    journey.0,
                desired_speed: engine.desired_speed(agent)?,
            })
        })
        .collect()
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_decisions(&mut self, tick: Tick, time: f64, records: &[DecisionRecord]) {
        self.switches += records.iter().filter(|r| r.switched()).count() as u64;
        if records.is_empty() {
            return;
        }
        let rows: Vec<DecisionRow> = records.iter().map(|r| DecisionRow::new(tick, time, r)).collect();
        let result = self.writer.write_decisions(&rows);
        self.store_err(result);
    }

    fn on_agent_skipped(&mut self, _tick: Tick, _agent: AgentId, _error: &BehaviorError) {
        self.skipped += 1;
    }

    fn on_snapshot(&mut self, tick: Tick, time: f64, engine: &dyn MotionEngine) {
        let result = trajectory_rows(tick, time, engine).and_then(|rows| {
            if rows.is_empty() {
                Ok(())
            } else {
                self.writer.write_trajectories(&rows)
            }
        });
        self.store_err(result);
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        let result = self.writer.finish();
        if let Err(e) = &result {
            warn!(tick = final_tick.0, %e, "output flush failed");
        }
        self.store_err(result);
    }
}
