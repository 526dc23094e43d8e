//! Randomness facade for the simulation.
//!
//! All stochastic decisions in the engine (admission draws, lane assignment,
//! failure sampling, retry jitter) flow through a single [`RandomSource`]
//! injected at construction time. Tests substitute a deterministic source;
//! reproducible runs use [`SeededSource`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::Uniform;

/// Sampling interface threaded through the engine.
///
/// Implementations only need a uniform draw in `[0, 1)`; the Bernoulli and
/// range helpers are derived from it so a scripted test source controls every
/// decision with one value stream.
pub trait RandomSource: Send {
    /// Uniform draw in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Bernoulli draw. Probabilities at or below zero never fire; at or above
    /// one they always fire.
    fn chance(&mut self, probability: f64) -> bool {
        self.next_f64() < probability
    }

    /// Uniform draw in `[low, high)`.
    fn range(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.next_f64()
    }
}

/// Entropy-seeded source for normal runs.
pub struct EntropySource {
    rng: StdRng,
    unit: Uniform<f64>,
}

impl EntropySource {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            unit: Uniform::new(0.0, 1.0),
        }
    }
}

impl Default for EntropySource {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for EntropySource {
    fn next_f64(&mut self) -> f64 {
        self.rng.sample(self.unit)
    }
}

/// Seeded source with a portable stream, for reproducible runs and tests.
pub struct SeededSource {
    rng: ChaCha8Rng,
    unit: Uniform<f64>,
}

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            unit: Uniform::new(0.0, 1.0),
        }
    }
}

impl RandomSource for SeededSource {
    fn next_f64(&mut self) -> f64 {
        self.rng.sample(self.unit)
    }
}
