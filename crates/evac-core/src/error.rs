//! Framework error type.
//!
//! Sub-crates define their own error enums and either convert them into
//! `EvacError` via `From` impls or wrap `EvacError` as one variant.

use thiserror::Error;

/// The top-level error type for `evac-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum EvacError {
    /// Malformed input handed to a pure function (empty waypoint set,
    /// malformed route).  A programmer or configuration error.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A configuration value outside its legal domain.  Fatal at startup.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `evac-*` crates.
pub type EvacResult<T> = Result<T, EvacError>;
