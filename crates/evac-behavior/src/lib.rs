//! `evac-behavior` — route exposure, desired speed, and journey decisions.
//!
//! # Crate layout
//!
//! | Module            | Contents                                                      |
//! |-------------------|---------------------------------------------------------------|
//! | [`exposure`]      | `map_path`, `aggregate`, `route_exposure`                     |
//! | [`speed`]         | `desired_speed`, `SpeedModel`                                 |
//! | [`decision`]      | `Journey` state, `Decision` result                            |
//! | [`context`]       | `EvacContext<'a>`, `AgentView`, `ExitPair`                    |
//! | [`model`]         | `BehaviorModel` trait                                         |
//! | [`route_choice`]  | `VisibilityRouteChoice` — the visibility-driven model         |
//! | [`noop`]          | `NoopBehavior` — keeps every agent's journey and speed        |
//! | [`diagnostics`]   | waypoint reports, visibility series, speed curve, profiles    |
//! | [`error`]         | `BehaviorError`, `BehaviorResult<T>`                          |
//!
//! # Design notes
//!
//! The tick loop in evac-sim runs in two phases:
//!
//! 1. **Intent phase** (optionally parallel): on a re-evaluation tick, call
//!    `BehaviorModel::reevaluate` for every active agent.  All reads go
//!    through `&EvacContext` and a copied `AgentView`; no mutation.
//!
//! 2. **Apply phase** (sequential): write each `Decision` back into the
//!    motion engine in ascending agent order.
//!
//! Models therefore only need to be `Send + Sync`.  The visibility field and
//! router are reached through narrow traits so tests can swap in stubs.

pub mod context;
pub mod decision;
pub mod diagnostics;
pub mod error;
pub mod exposure;
pub mod model;
pub mod noop;
pub mod route_choice;
pub mod speed;


pub use context::{AgentView, EvacContext, ExitPair};
pub use decision::{Decision, Journey};
pub use error::{BehaviorError, BehaviorResult};
pub use exposure::{aggregate, map_path, route_exposure};
pub use model::BehaviorModel;
pub use noop::NoopBehavior;
pub use route_choice::VisibilityRouteChoice;
pub use speed::{SpeedModel, desired_speed};
