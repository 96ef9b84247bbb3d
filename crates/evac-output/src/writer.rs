//! The `OutputWriter` trait implemented by all backend writers.

use crate::{DecisionRow, OutputResult, TrajectoryRow};

/// Trait implemented by the CSV and SQLite writers.
///
/// All methods are infallible from the observer's perspective; errors are
/// stored internally and retrieved with
/// [`SimOutputObserver::take_error`][crate::SimOutputObserver::take_error].
pub trait OutputWriter {
    /// Write the decisions of one re-evaluation pass.
    fn write_decisions(&mut self, rows: &[DecisionRow]) -> OutputResult<()>;

    /// Write one trajectory snapshot.
    fn write_trajectories(&mut self, rows: &[TrajectoryRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent — safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
