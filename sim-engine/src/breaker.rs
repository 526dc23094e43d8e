//! Circuit breaker state machine
//!
//! Consecutive-failure semantics: the counter increments on every failed or
//! timed-out service attempt, is reset only when the breaker closes (or the
//! engine resets), and does not decay on success while closed. While
//! `Open`, admission fast-fails new requests without touching the downstream;
//! after the cooldown the breaker goes `HalfOpen` and the first observed
//! probe result decides the next state.

use resim_core::SimTime;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Consecutive failures required to trip the breaker.
pub const DEFAULT_FAILURE_THRESHOLD: u32 = 5;

/// Time spent `Open` before probing the downstream again.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakerState {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CircuitBreaker {
    state: BreakerState,
    failure_count: u32,
    opened_at: SimTime,
    threshold: u32,
    cooldown: Duration,
}

impl CircuitBreaker {
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_FAILURE_THRESHOLD, DEFAULT_COOLDOWN)
    }

    pub fn with_limits(threshold: u32, cooldown: Duration) -> Self {
        Self {
            state: BreakerState::Closed,
            failure_count: 0,
            opened_at: SimTime::zero(),
            threshold: threshold.max(1),
            cooldown,
        }
    }

    /// Move `Open` to `HalfOpen` once the cooldown has fully elapsed.
    pub fn evaluate_cooldown(&mut self, now: SimTime) {
        if self.state == BreakerState::Open
            && now.duration_since(self.opened_at) >= self.cooldown
        {
            self.state = BreakerState::HalfOpen;
            debug!(failures = self.failure_count, "breaker half-open, probing downstream");
        }
    }

    /// Record one failed or timed-out service attempt.
    ///
    /// While `HalfOpen` any failure re-opens the breaker and restarts the
    /// cooldown clock; while `Closed` the breaker trips on reaching the
    /// threshold. A failure observed while already `Open` (an attempt that
    /// was in flight when the breaker tripped) only increments the counter;
    /// it is not a new transition and does not extend the cooldown.
    pub fn record_failure(&mut self, now: SimTime) {
        self.failure_count = self.failure_count.saturating_add(1);
        match self.state {
            BreakerState::HalfOpen => self.trip(now),
            BreakerState::Closed if self.failure_count >= self.threshold => self.trip(now),
            _ => {}
        }
    }

    fn trip(&mut self, now: SimTime) {
        self.state = BreakerState::Open;
        self.opened_at = now;
        debug!(failures = self.failure_count, at = %now, "breaker open");
    }

    /// Record one successful service call. The first success observed while
    /// `HalfOpen` heals the breaker; successes in any other state are
    /// ignored (consecutive-failure counting, not a ratio).
    pub fn record_success(&mut self) {
        if self.state == BreakerState::HalfOpen {
            self.state = BreakerState::Closed;
            self.failure_count = 0;
            debug!("breaker closed, probe succeeded");
        }
    }

    /// Disabled-breaker path, applied every tick: the breaker is effectively
    /// removed, not merely bypassed.
    pub fn force_closed(&mut self) {
        self.state = BreakerState::Closed;
        self.failure_count = 0;
    }

    pub fn reset(&mut self) {
        self.force_closed();
        self.opened_at = SimTime::zero();
    }

    pub fn is_open(&self) -> bool {
        self.state == BreakerState::Open
    }

    pub fn state(&self) -> BreakerState {
        self.state
    }

    pub fn failure_count(&self) -> u32 {
        self.failure_count
    }
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        Self::new()
    }
}
