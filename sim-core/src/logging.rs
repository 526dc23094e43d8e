//! Structured logging for simulation debugging
//!
//! The engine emits `tracing` events throughout: TRACE for per-tick request
//! movement and sampling, DEBUG for state transitions (breaker trips,
//! admission rejections, retry scheduling), INFO for driver-level progress.
//!
//! Output is controlled the usual way through `RUST_LOG`, e.g.:
//!
//! ```bash
//! RUST_LOG=resim_engine=debug cargo run --example failure_storm
//! ```

use tracing::{info, Span};
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging for the simulation with sensible defaults.
pub fn init_simulation_logging() {
    init_simulation_logging_with_level("info")
}

/// Initialize logging with a specific level.
///
/// `RUST_LOG`, when set, wins over the `level` argument.
///
/// # Arguments
/// * `level` - Log level: "trace", "debug", "info", "warn", or "error"
pub fn init_simulation_logging_with_level(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("{level},resim_core={level},resim_engine={level},resim_metrics={level}").into()
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_level(true))
        .with(filter)
        .init();

    info!("Simulation logging initialized at level: {}", level);
}

/// Create a span for tracking one simulation run.
pub fn simulation_span(name: &str) -> Span {
    tracing::info_span!("simulation", name = name)
}
