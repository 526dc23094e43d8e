//! # resim - Resilience Pipeline Simulator
//!
//! A discrete-time-stepped simulation of a single request pipeline passing
//! through a chain of resilience controls: admission/rate limiting, bulkhead
//! lanes, a failing downstream dependency, timeout deadlines, retry with
//! backoff/jitter, and a circuit breaker.
//!
//! ## Quick Start
//!
//! ```rust
//! use resim::prelude::*;
//!
//! let mut engine = SimulationEngine::new(SimulationConfig::default());
//! let snapshot = engine.tick(SimTime::from_millis(16));
//! assert!(snapshot.tokens >= 0.0);
//! ```
//!
//! ## Examples
//!
//! - `basic_usage`: a fixed-step driver collecting chart history and
//!   exporting a JSON report.
//! - `failure_storm`: a degraded dependency tripping the breaker, with debug
//!   logging of every transition.

pub use resim_core as core;

pub use resim_engine as engine;

pub use resim_metrics as metrics;

// Convenience re-exports of commonly used items.
pub mod prelude {
    //! Commonly used types and traits

    pub use resim_core::{
        init_simulation_logging, init_simulation_logging_with_level, EntropySource, Lane, Outcome,
        RandomSource, Request, RequestId, RequestStatus, SeededSource, SimTime,
    };

    pub use resim_engine::{
        BreakerState, RetryStrategy, SimulationConfig, SimulationEngine, Snapshot,
    };

    pub use resim_metrics::{
        publish_metrics, JsonExporter, LatencyStats, MetricsHistory, MetricsWindow,
        SimulationMetrics,
    };
}
