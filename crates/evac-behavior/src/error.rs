//! Behavior-layer error type.

use thiserror::Error;

use evac_spatial::SpatialError;
use evac_visibility::VisibilityError;

#[derive(Debug, Error)]
pub enum BehaviorError {
    /// Malformed route or a waypoint id outside the table.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("behavior configuration error: {0}")]
    InvalidConfiguration(String),

    #[error("visibility query failed: {0}")]
    VisibilityQuery(#[from] VisibilityError),

    #[error(transparent)]
    Spatial(#[from] SpatialError),
}

impl BehaviorError {
    /// Whether the simulation may skip the affected agent for this tick and
    /// carry on.
    ///
    /// Queries outside the field's precomputed domain and unroutable
    /// positions are recoverable.  Everything else points at a broken
    /// configuration and would fail again on every tick.
    pub fn is_recoverable(&self) -> bool {
        match self {
            BehaviorError::VisibilityQuery(e) => matches!(
                e,
                VisibilityError::TimeOutOfRange { .. }
                    | VisibilityError::OutOfBounds(_)
                    | VisibilityError::UnknownWaypoint(_)
            ),
            BehaviorError::Spatial(SpatialError::NoRoute { .. }) => true,
            _ => false,
        }
    }
}

pub type BehaviorResult<T> = Result<T, BehaviorError>;
