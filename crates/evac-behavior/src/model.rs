//! The `BehaviorModel` trait — the decision extension point.

use evac_core::AgentId;

use crate::{AgentView, BehaviorResult, Decision, EvacContext};

/// Pluggable per-agent decision logic.
///
/// The simulation calls [`reevaluate`](Self::reevaluate) for every active
/// agent on each re-evaluation tick.  Calls for different agents are
/// independent and may run in parallel via Rayon, so implementations must be
/// `Send + Sync` and keep no per-agent mutable state of their own.
///
/// Returning an error whose
/// [`is_recoverable`](crate::BehaviorError::is_recoverable) is true makes the
/// simulation keep the agent's previous journey and speed for this tick.
/// Any other error aborts the run.
///
/// # Example
///
/// ```rust,ignore
/// struct AlwaysSecondary;
///
/// impl BehaviorModel for AlwaysSecondary {
///     fn reevaluate(&self, _: AgentId, view: AgentView, _: &EvacContext<'_>) -> BehaviorResult<Decision> {
///         Ok(Decision { journey: Journey::Secondary, ..Decision::retain(&view) })
///     }
/// }
/// ```
pub trait BehaviorModel: Send + Sync + 'static {
    fn reevaluate(
        &self,
        agent: AgentId,
        view:  AgentView,
        ctx:   &EvacContext<'_>,
    ) -> BehaviorResult<Decision>;
}
