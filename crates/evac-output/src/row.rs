//! Plain data row types written by output backends.

use evac_behavior::diagnostics::ExposureSample;
use evac_core::Tick;
use evac_sim::DecisionRecord;

/// One applied route decision.
///
/// Exposure and local visibility columns are `None` when the decision model
/// did not compute them (e.g. the no-op model).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionRow {
    pub tick:               u64,
    pub time:               f64,
    pub agent_id:           u32,
    pub x:                  f64,
    pub y:                  f64,
    pub previous:           &'static str,
    pub journey:            &'static str,
    pub desired_speed:      f64,
    pub local_visibility:   Option<f64>,
    pub primary_exposure:   Option<f64>,
    pub secondary_exposure: Option<f64>,
}

impl DecisionRow {
    pub fn new(tick: Tick, time: f64, record: &DecisionRecord) -> Self {
        let d = &record.decision;
        Self {
            tick:               tick.0,
            time,
            agent_id:           record.agent.0,
            x:                  record.position.x,
            y:                  record.position.y,
            previous:           record.previous.as_str(),
            journey:            d.journey.as_str(),
            desired_speed:      d.desired_speed,
            local_visibility:   d.local_visibility,
            primary_exposure:   d.primary_exposure,
            secondary_exposure: d.secondary_exposure,
        }
    }
}

/// Position of one active agent at a snapshot tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryRow {
    pub tick:          u64,
    pub time:          f64,
    pub agent_id:      u32,
    pub x:             f64,
    pub y:             f64,
    /// Engine journey id the agent is walking.
    pub journey_id:    u32,
    pub desired_speed: f64,
}

/// One sample of the exposure profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExposureProfileRow {
    pub time:               f64,
    pub primary_exposure:   f64,
    pub secondary_exposure: f64,
    pub journey:            &'static str,
}

impl From<&ExposureSample> for ExposureProfileRow {
    fn from(s: &ExposureSample) -> Self {
        Self {
            time:               s.time,
            primary_exposure:   s.primary,
            secondary_exposure: s.secondary,
            journey:            s.journey.as_str(),
        }
    }
}

/// Empty string for a missing value, so CSV readers see a blank cell.
pub(crate) fn opt_cell(v: Option<f64>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}
