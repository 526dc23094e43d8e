//! Discrete-time resilience pipeline simulation engine.
//!
//! This crate models a single request pipeline passing through a chain of
//! resilience controls (admission/rate limiting, bulkhead lanes, a failing
//! downstream dependency, timeout deadlines, retry with backoff/jitter, and a
//! circuit breaker) and exposes a fresh [`Snapshot`] of system state and
//! aggregate metrics on every tick.
//!
//! # Basic Usage
//!
//! ```rust
//! use resim_core::SimTime;
//! use resim_engine::{SimulationConfig, SimulationEngine};
//!
//! let mut engine = SimulationEngine::new(SimulationConfig::default());
//!
//! // The driver supplies monotonically non-decreasing timestamps,
//! // nominally once per rendering frame.
//! let snapshot = engine.tick(SimTime::from_millis(16));
//! println!("{} active requests", snapshot.requests.len());
//! ```
//!
//! There is no internal concurrency and no I/O: every "failure" the engine
//! produces is a modeled outcome, not a fault. The engine degrades only
//! through its exposed metrics, never by halting.

pub mod breaker;
pub mod config;
pub mod engine;
pub mod snapshot;
pub mod token_bucket;

pub use breaker::{BreakerState, CircuitBreaker, DEFAULT_COOLDOWN, DEFAULT_FAILURE_THRESHOLD};
pub use config::{RetryStrategy, SimulationConfig};
pub use engine::SimulationEngine;
pub use snapshot::Snapshot;
pub use token_bucket::TokenBucket;
