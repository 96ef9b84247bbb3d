use evac_core::{AgentId, JourneyId, StageId};
use evac_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MotionError {
    /// Never added, or already left through an exit.
    #[error("agent {0} is not in the simulation")]
    UnknownAgent(AgentId),

    #[error("journey {0} is not registered")]
    UnknownJourney(JourneyId),

    #[error("stage {0} is not registered")]
    UnknownStage(StageId),

    #[error("stage {stage} is not part of journey {journey}")]
    StageNotInJourney { journey: JourneyId, stage: StageId },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("routing failed: {0}")]
    Routing(#[from] SpatialError),
}

pub type MotionResult<T> = Result<T, MotionError>;
