//! Error types for the simulator

use thiserror::Error;

/// Top-level error type for simulator operations.
///
/// Every modeled "failure" inside the engine is an outcome, not a fault, so
/// errors only surface at the edges, when external input (configuration) is
/// malformed.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Invalid time value: {0}")]
    InvalidTime(String),
}
