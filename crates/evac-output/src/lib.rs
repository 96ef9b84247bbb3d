//! `evac-output` — simulation output writers for the evac framework.
//!
//! Two backends are provided behind Cargo features:
//!
//! | Feature   | Backend     | Files created                                 |
//! |-----------|-------------|-----------------------------------------------|
//! | *(none)*  | CSV         | `decisions.csv`, `trajectories.csv`           |
//! | `sqlite`  | SQLite      | `output.db`                                   |
//!
//! Both backends implement [`OutputWriter`] and are driven by
//! [`SimOutputObserver`], which implements `evac_sim::SimObserver`.  The
//! exposure profile from `evac_behavior::diagnostics` is written separately
//! with [`write_exposure_profile_csv`], and the other diagnostic curves with
//! [`write_series_csv`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use evac_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer);
//! sim.run(&mut obs)?;
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(test)]
mod tests;

pub use self::csv::{CsvWriter, write_exposure_profile_csv, write_series_csv};
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{DecisionRow, ExposureProfileRow, TrajectoryRow};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
