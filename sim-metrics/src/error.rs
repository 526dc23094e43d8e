//! Error types for metrics export

use thiserror::Error;

/// Errors related to metrics serialization and export.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
