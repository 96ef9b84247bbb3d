//! `evac-spatial` — waypoints, navigation graph, and routing.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                     |
//! |--------------|--------------------------------------------------------------|
//! | [`waypoint`] | `Waypoint`, `WaypointSet` (R-tree), nearest-waypoint resolver |
//! | [`network`]  | `NavGraph` (CSR + R-tree), `NavGraphBuilder`                  |
//! | [`router`]   | `Router` trait, `GraphRouter` (Dijkstra on corridor length)   |
//! | [`error`]    | `SpatialError`, `SpatialResult<T>`                            |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod error;
pub mod network;
pub mod router;
pub mod waypoint;


pub use error::{SpatialError, SpatialResult};
pub use network::{NavGraph, NavGraphBuilder, NavNodeId};
pub use router::{GraphRouter, Router};
pub use waypoint::{Waypoint, WaypointSet, nearest_waypoint};
