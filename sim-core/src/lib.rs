//! Core building blocks for the resilience pipeline simulator.
//!
//! This crate provides the foundation the engine and metrics crates are built
//! on: simulation time, the request data model, the randomness facade, error
//! types, and logging setup.
//!
//! # Time Model
//!
//! All timing uses [`SimTime`], a monotone point in simulation time supplied
//! by an external driver (nominally once per rendering frame). The engine
//! never reads wall clocks; out-of-order timestamps clamp rather than moving
//! simulated time backward.
//!
//! # Randomness
//!
//! Every stochastic decision flows through one [`RandomSource`] injected into
//! the engine, so tests can substitute a deterministic stream and
//! reproducible runs can use [`SeededSource`].

pub mod error;
pub mod logging;
pub mod request;
pub mod rng;
pub mod time;

pub use error::SimError;
pub use logging::{init_simulation_logging, init_simulation_logging_with_level, simulation_span};
pub use request::{Lane, Outcome, Request, RequestId, RequestStatus, ServiceCall};
pub use rng::{EntropySource, RandomSource, SeededSource};
pub use time::SimTime;
