//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `decisions.csv`
//! - `trajectories.csv`
//!
//! The exposure profile has its own one-shot writer,
//! [`write_exposure_profile_csv`]; other diagnostic curves go through
//! [`write_series_csv`].

use std::fs::File;
use std::path::Path;

use csv::Writer;

use evac_behavior::diagnostics::ExposureSample;

use crate::row::opt_cell;
use crate::writer::OutputWriter;
use crate::{DecisionRow, ExposureProfileRow, OutputResult, TrajectoryRow};

pub const DECISION_HEADER: [&str; 11] = [
    "tick",
    "time",
    "agent_id",
    "x",
    "y",
    "previous",
    "journey",
    "desired_speed",
    "local_visibility",
    "primary_exposure",
    "secondary_exposure",
];

pub const TRAJECTORY_HEADER: [&str; 7] =
    ["tick", "time", "agent_id", "x", "y", "journey_id", "desired_speed"];

pub const EXPOSURE_PROFILE_HEADER: [&str; 4] =
    ["time", "primary_exposure", "secondary_exposure", "journey"];

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    decisions:    Writer<File>,
    trajectories: Writer<File>,
    finished:     bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut decisions = Writer::from_path(dir.join("decisions.csv"))?;
        decisions.write_record(DECISION_HEADER)?;

        let mut trajectories = Writer::from_path(dir.join("trajectories.csv"))?;
        trajectories.write_record(TRAJECTORY_HEADER)?;

        Ok(Self {
            decisions,
            trajectories,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_decisions(&mut self, rows: &[DecisionRow]) -> OutputResult<()> {
        for row in rows {
            self.decisions.write_record(&[
                row.tick.to_string(),
                row.time.to_string(),
                row.agent_id.to_string(),
                row.x.to_string(),
                row.y.to_string(),
                row.previous.to_owned(),
                row.journey.to_owned(),
                row.desired_speed.to_string(),
                opt_cell(row.local_visibility),
                opt_cell(row.primary_exposure),
                opt_cell(row.secondary_exposure),
            ])?;
        }
        Ok(())
    }

    fn write_trajectories(&mut self, rows: &[TrajectoryRow]) -> OutputResult<()> {
        for row in rows {
            self.trajectories.write_record(&[
                row.tick.to_string(),
                row.time.to_string(),
                row.agent_id.to_string(),
                row.x.to_string(),
                row.y.to_string(),
                row.journey_id.to_string(),
                row.desired_speed.to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.decisions.flush()?;
        self.trajectories.flush()?;
        Ok(())
    }
}

/// Write an exposure profile to `path` (header plus one row per sample).
pub fn write_exposure_profile_csv(path: &Path, samples: &[ExposureSample]) -> OutputResult<()> {
    let mut w = Writer::from_path(path)?;
    w.write_record(EXPOSURE_PROFILE_HEADER)?;
    for row in samples.iter().map(ExposureProfileRow::from) {
        w.write_record(&[
            row.time.to_string(),
            row.primary_exposure.to_string(),
            row.secondary_exposure.to_string(),
            row.journey.to_owned(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// Write `(x, y)` pairs to `path` under a two-column header.
///
/// Used for the diagnostic curves: local visibility over time and the speed
/// curve over visibility.
pub fn write_series_csv(path: &Path, header: [&str; 2], rows: &[(f64, f64)]) -> OutputResult<()> {
    let mut w = Writer::from_path(path)?;
    w.write_record(header)?;
    for (x, y) in rows {
        w.write_record(&[x.to_string(), y.to_string()])?;
    }
    w.flush()?;
    Ok(())
}
