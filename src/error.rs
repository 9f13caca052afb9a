//! Error types for the risk engine.
//!
//! Only parameter validation failures surface as errors. Numerically
//! degenerate cases (singular covariances, zero modeled uncertainty,
//! infeasible maneuver configurations) resolve to documented fallbacks or
//! explicit result variants that callers can inspect.

use thiserror::Error;

/// Errors surfaced by the conjunction risk engine
#[derive(Error, Debug)]
pub enum ConjunctionError {
    /// A physical parameter failed validation before any computation ran
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The state provider has no satellite under this identifier
    #[error("unknown satellite: {0}")]
    UnknownSatellite(String),
}

pub type Result<T> = std::result::Result<T, ConjunctionError>;
