use evac_behavior::BehaviorError;
use evac_core::EvacError;
use evac_motion::MotionError;
use evac_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    /// Spawn positions could not be placed with the requested spacing.
    #[error("spawn error: {0}")]
    Spawn(String),

    #[error(transparent)]
    Core(#[from] EvacError),

    #[error(transparent)]
    Spatial(#[from] SpatialError),

    /// A behavior error that cannot be skipped for one tick.
    #[error("behavior error: {0}")]
    Behavior(#[from] BehaviorError),

    #[error("motion engine error: {0}")]
    Motion(#[from] MotionError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("scenario parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SimResult<T> = Result<T, SimError>;
