//! Metrics collection and export for the resilience pipeline simulator
//!
//! This crate owns everything derived from completed requests: the rolling
//! [`MetricsWindow`] the engine records terminal outcomes into, the
//! [`SimulationMetrics`] summary copied into every snapshot, high-resolution
//! [`LatencyStats`], fixed-length [`MetricsHistory`] for charting, gauge
//! publication through the `metrics` facade, and JSON export.

pub mod error;
pub mod export;
pub mod history;
pub mod latency;
pub mod recorder;
pub mod window;

pub use error::MetricsError;
pub use export::{to_json_string, JsonExporter};
pub use history::{MetricsHistory, DEFAULT_HISTORY_LENGTH};
pub use latency::LatencyStats;
pub use recorder::publish_metrics;
pub use window::{CompletedSample, MetricsWindow, SimulationMetrics};
