//! A no-op behavior model — agents never change their mind.

use evac_core::AgentId;

use crate::{AgentView, BehaviorModel, BehaviorResult, Decision, EvacContext};

/// A [`BehaviorModel`] that keeps every agent's journey and speed.
///
/// Useful as a baseline run without smoke-driven decisions, and in tests.
pub struct NoopBehavior;

impl BehaviorModel for NoopBehavior {
    fn reevaluate(
        &self,
        _agent: AgentId,
        view:   AgentView,
        _ctx:   &EvacContext<'_>,
    ) -> BehaviorResult<Decision> {
        Ok(Decision::retain(&view))
    }
}
