//! Spatial-subsystem error type.

use thiserror::Error;

use evac_core::{EvacError, Point};

/// Errors produced by `evac-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    /// Empty waypoint set, non-finite query point, and similar caller errors.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("no route from {from} to {to}")]
    NoRoute { from: Point, to: Point },
}

impl From<SpatialError> for EvacError {
    fn from(e: SpatialError) -> Self {
        match e {
            SpatialError::InvalidConfiguration(msg) => EvacError::InvalidConfiguration(msg),
            other => EvacError::InvalidInput(other.to_string()),
        }
    }
}

pub type SpatialResult<T> = Result<T, SpatialError>;
