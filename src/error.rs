//! Errors raised by the series engine.
//!
//! Everything here is a local validation failure or a missing random source;
//! the engine performs no I/O so nothing is ever retried.

use thiserror::Error;

/// Errors that can occur while creating or advancing a series
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// A configuration field is out of range or not a finite number
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// An advance was requested on a series without any points
    #[error("series has no data points to advance from")]
    EmptySeries,

    /// The OS entropy source could not seed the generator
    #[error("random source unavailable: {0}")]
    RandomSource(String),
}

impl SimulationError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, SimulationError>;
