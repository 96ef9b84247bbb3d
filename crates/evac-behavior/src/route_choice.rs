//! Visibility-based choice between the primary and secondary exit.

use tracing::trace;

use evac_core::AgentId;

use crate::{
    AgentView, BehaviorError, BehaviorModel, BehaviorResult, Decision, EvacContext, Journey,
    SpeedModel, route_exposure,
};

/// Per re-evaluation, for one agent:
///
/// 1. route from the agent's position to both exits;
/// 2. score each route with [`route_exposure`] at visibility factor
///    `visibility_factor`;
/// 3. pick the journey with [`Journey::choose`];
/// 4. set the desired speed from the local visibility at the agent's own
///    position, measured with the speed threshold as visibility factor.
///
/// Any failure leaves the agent untouched for this tick; the whole decision
/// is computed before anything is returned.
#[derive(Clone, Debug)]
pub struct VisibilityRouteChoice {
    speed:             SpeedModel,
    visibility_factor: f64,
}

impl VisibilityRouteChoice {
    pub fn new(speed: SpeedModel, visibility_factor: f64) -> BehaviorResult<Self> {
        if !(visibility_factor > 0.0) || !visibility_factor.is_finite() {
            return Err(BehaviorError::InvalidConfiguration(format!(
                "visibility factor must be positive, got {visibility_factor}"
            )));
        }
        Ok(Self { speed, visibility_factor })
    }

    pub fn speed_model(&self) -> &SpeedModel {
        &self.speed
    }

    pub fn visibility_factor(&self) -> f64 {
        self.visibility_factor
    }
}

impl BehaviorModel for VisibilityRouteChoice {
    fn reevaluate(
        &self,
        agent: AgentId,
        view:  AgentView,
        ctx:   &EvacContext<'_>,
    ) -> BehaviorResult<Decision> {
        let mut exposure = [0.0; 2];
        for (slot, target) in [ctx.exits.primary, ctx.exits.secondary].into_iter().enumerate() {
            let route = ctx.router.shortest_path(view.position, target)?;
            exposure[slot] = route_exposure(
                &route,
                view.position,
                ctx.time,
                ctx.field,
                ctx.waypoints,
                self.visibility_factor,
            )?;
        }
        let [primary, secondary] = exposure;
        let journey = Journey::choose(primary, secondary);

        let local = ctx
            .field
            .local_visibility(ctx.time, view.position, self.speed.threshold())?;
        let desired_speed = self.speed.speed(local);

        trace!(%agent, primary, secondary, %journey, local, desired_speed, "re-evaluated");

        Ok(Decision {
            journey,
            desired_speed,
            local_visibility:   Some(local),
            primary_exposure:   Some(primary),
            secondary_exposure: Some(secondary),
        })
    }
}
