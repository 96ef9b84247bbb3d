//! Visibility-subsystem error type.

use thiserror::Error;

use evac_core::{Point, WaypointId};

/// Errors produced by `evac-visibility`.
#[derive(Debug, Error)]
pub enum VisibilityError {
    /// `time` lies outside the precomputed horizon `[start, end]`.
    #[error("time {time} s is outside the precomputed range [{start}, {end}] s")]
    TimeOutOfRange { time: f64, start: f64, end: f64 },

    #[error("point {0} is outside the visibility grid")]
    OutOfBounds(Point),

    #[error("waypoint {0} is not part of the visibility map")]
    UnknownWaypoint(WaypointId),

    /// The visibility factor `c` must be positive and finite.
    #[error("invalid visibility factor {0}")]
    InvalidFactor(f64),

    /// Table shapes or values that cannot describe a field.
    #[error("invalid visibility data: {0}")]
    InvalidData(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache format error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type VisibilityResult<T> = Result<T, VisibilityError>;
