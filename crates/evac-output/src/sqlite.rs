//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! two tables: `decisions` and `trajectories`.  Both tables are dropped and
//! recreated on open, so every run starts from an empty database just as the
//! CSV backend truncates its files.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{DecisionRow, OutputResult, TrajectoryRow};

/// Writes simulation output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and reset the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             DROP TABLE IF EXISTS decisions;
             DROP TABLE IF EXISTS trajectories;
             CREATE TABLE decisions (
                 tick               INTEGER NOT NULL,
                 time               REAL    NOT NULL,
                 agent_id           INTEGER NOT NULL,
                 x                  REAL    NOT NULL,
                 y                  REAL    NOT NULL,
                 previous           TEXT    NOT NULL,
                 journey            TEXT    NOT NULL,
                 desired_speed      REAL    NOT NULL,
                 local_visibility   REAL,
                 primary_exposure   REAL,
                 secondary_exposure REAL
             );
             CREATE TABLE trajectories (
                 tick          INTEGER NOT NULL,
                 time          REAL    NOT NULL,
                 agent_id      INTEGER NOT NULL,
                 x             REAL    NOT NULL,
                 y             REAL    NOT NULL,
                 journey_id    INTEGER NOT NULL,
                 desired_speed REAL    NOT NULL,
                 PRIMARY KEY (tick, agent_id)
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_decisions(&mut self, rows: &[DecisionRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO decisions \
                 (tick, time, agent_id, x, y, previous, journey, desired_speed, \
                  local_visibility, primary_exposure, secondary_exposure) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.tick,
                    row.time,
                    row.agent_id,
                    row.x,
                    row.y,
                    row.previous,
                    row.journey,
                    row.desired_speed,
                    row.local_visibility,
                    row.primary_exposure,
                    row.secondary_exposure,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_trajectories(&mut self, rows: &[TrajectoryRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO trajectories \
                 (tick, time, agent_id, x, y, journey_id, desired_speed) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.tick,
                    row.time,
                    row.agent_id,
                    row.x,
                    row.y,
                    row.journey_id,
                    row.desired_speed,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn
            .execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
