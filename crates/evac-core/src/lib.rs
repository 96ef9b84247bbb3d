//! `evac-core` — foundational types for the `evac` visibility-routing framework.
//!
//! This crate is a dependency of every other `evac-*` crate.  It has no
//! `evac-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                |
//! |-----------------|---------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `WaypointId`, `JourneyId`, `StageId`         |
//! | [`geo`]         | `Point` (planar metres), Euclidean distance             |
//! | [`time`]        | `Tick`, `SimClock`, `SimConfig`                         |
//! | [`rng`]         | `SimRng` (seeded, run-level)                            |
//! | [`error`]       | `EvacError`, `EvacResult`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{EvacError, EvacResult};
pub use geo::Point;
pub use ids::{AgentId, JourneyId, StageId, WaypointId};
pub use rng::SimRng;
pub use time::{SimClock, SimConfig, Tick};
