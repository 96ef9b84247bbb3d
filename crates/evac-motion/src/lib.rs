//! `evac-motion` — the pedestrian engine seen by the simulation loop.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                          |
//! |-------------|-------------------------------------------------------------------|
//! | [`state`]   | `MotionState`, `AgentSpawn`, `ExitStage`, `Polyline`              |
//! | [`store`]   | `MotionStore` — `Vec<MotionState>` + sparse route cache           |
//! | [`engine`]  | `MotionEngine` trait, `KinematicEngine<R>` reference engine       |
//! | [`error`]   | `MotionError`, `MotionResult<T>`                                  |
//!
//! # Movement model
//!
//! The decision layer only ever talks to the [`MotionEngine`] trait, so a
//! full crowd simulator can sit behind it.  [`KinematicEngine`] is the
//! built-in stand-in:
//!
//! 1. Stages are circular exit zones; a journey is an ordered list of stages.
//! 2. `add_agent` and `switch_journey` plan a path to the target stage with
//!    a pluggable [`Router`][evac_spatial::Router].
//! 3. `iterate` moves every agent `desired_speed · dt` metres along its
//!    path and removes agents that are inside their exit zone.

pub mod engine;
pub mod error;
pub mod state;
pub mod store;

#[cfg(test)]
mod tests;

pub use engine::{KinematicEngine, MotionEngine};
pub use error::{MotionError, MotionResult};
pub use state::{AgentSpawn, ExitStage, MotionState, Polyline};
pub use store::MotionStore;
