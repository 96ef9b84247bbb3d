//! `evac-visibility` — the visibility field consumed by route choice.
//!
//! The field itself is produced outside this framework (from a smoke
//! simulation) and is only ever *queried* here.  This crate defines the
//! narrow query interface and one concrete implementation backed by
//! precomputed tables.
//!
//! # Crate layout
//!
//! | Module    | Contents                                                         |
//! |-----------|------------------------------------------------------------------|
//! | [`field`] | `VisibilityField` trait — the three queries route choice needs   |
//! | [`grid`]  | `GridSpec` — regular cell grid, point → cell lookup              |
//! | [`map`]   | `VisibilityMap` — precomputed extinction + waypoint visibility    |
//! | [`cache`] | JSON save/load and `load_or_compute`                             |
//! | [`error`] | `VisibilityError`, `VisibilityResult<T>`                         |
//!
//! # Domain errors
//!
//! Queries outside the precomputed time horizon or spatial extent return an
//! error instead of clamping.  Callers decide whether that is fatal; the
//! simulation loop treats it as "skip this agent for this tick".

pub mod cache;
pub mod error;
pub mod field;
pub mod grid;
pub mod map;


pub use error::{VisibilityError, VisibilityResult};
pub use field::VisibilityField;
pub use grid::GridSpec;
pub use map::{DEFAULT_MAX_VISIBILITY, VisibilityMap};
