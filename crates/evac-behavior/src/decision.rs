//! Journey state and the result of one re-evaluation.

use std::fmt;

use crate::AgentView;

/// Which exit an agent is currently heading for.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Journey {
    /// Every agent starts here.
    #[default]
    Primary,
    Secondary,
}

impl Journey {
    /// The decision rule: the secondary route wins only if its exposure is
    /// strictly greater.  Ties (and NaN) keep the primary route.
    #[inline]
    pub fn choose(primary_exposure: f64, secondary_exposure: f64) -> Journey {
        if secondary_exposure > primary_exposure {
            Journey::Secondary
        } else {
            Journey::Primary
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Journey::Primary   => "primary",
            Journey::Secondary => "secondary",
        }
    }
}

impl fmt::Display for Journey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What one re-evaluation decided for one agent.
///
/// The measurement fields are `None` when the model did not compute them
/// (e.g. [`NoopBehavior`](crate::NoopBehavior)).
#[derive(Clone, Debug, PartialEq)]
pub struct Decision {
    pub journey:            Journey,
    pub desired_speed:      f64,
    pub local_visibility:   Option<f64>,
    pub primary_exposure:   Option<f64>,
    pub secondary_exposure: Option<f64>,
}

impl Decision {
    /// Keep the agent's current journey and speed.
    pub fn retain(view: &AgentView) -> Self {
        Self {
            journey:            view.journey,
            desired_speed:      view.desired_speed,
            local_visibility:   None,
            primary_exposure:   None,
            secondary_exposure: None,
        }
    }
}
