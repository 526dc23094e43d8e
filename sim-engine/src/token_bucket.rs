//! Token bucket for admission rate limiting
//!
//! The bucket holds only the floating-point token count; rate and capacity
//! come from the live configuration on every tick, so config changes apply
//! without rebuilding the bucket. There is no blocking and no queuing: a
//! failed consumption is an immediate terminal rejection at the caller.

use std::time::Duration;

/// Capacity-bounded token counter refilled continuously with elapsed time.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenBucket {
    tokens: f64,
}

impl TokenBucket {
    /// A bucket starting at full capacity.
    pub fn full(capacity: f64) -> Self {
        Self {
            tokens: sanitize(capacity),
        }
    }

    /// Add `rate_per_sec x elapsed` tokens, clamped to `capacity`. A capacity
    /// below the current count (config lowered mid-run) clamps downward.
    pub fn refill(&mut self, rate_per_sec: f64, capacity: f64, elapsed: Duration) {
        let gained = rate_per_sec.max(0.0) * elapsed.as_secs_f64();
        self.tokens = (self.tokens + gained).min(sanitize(capacity));
    }

    /// Force the bucket to full capacity. This is the disabled-limiter path:
    /// applied every tick, so re-enabling the limiter starts saturated rather
    /// than empty.
    pub fn saturate(&mut self, capacity: f64) {
        self.tokens = sanitize(capacity);
    }

    /// Take one token if at least one whole token is available.
    pub fn try_consume(&mut self) -> bool {
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    pub fn available(&self) -> f64 {
        self.tokens
    }
}

fn sanitize(capacity: f64) -> f64 {
    // NaN compares false against everything; max() turns it into zero.
    capacity.max(0.0)
}
