//! Simulation configuration
//!
//! The configuration is supplied externally and is immutable for the duration
//! of a tick; [`crate::SimulationEngine::update_config`] swaps it between
//! ticks. [`SimulationConfig::validate`] is for external config loading;
//! independently of validation, the engine clamps derived pacing values so a
//! malformed live config degrades instead of faulting.

use resim_core::SimError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Retry behavior after a failed or timed-out attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryStrategy {
    /// Failures are terminal.
    Off,
    /// Exponential backoff with a fixed delay per attempt.
    Fixed,
    /// Exponential backoff scaled by a uniform factor in `[0.5, 1.5)`.
    Jitter,
}

/// Tunable parameters of the simulated pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Average request arrival rate, requests per second.
    pub rps: f64,
    /// Base latency of the downstream service, milliseconds.
    pub service_latency_base_ms: f64,
    /// Probability that a downstream call fails, in `[0, 1]`.
    pub service_failure_rate: f64,
    /// Deadline for a request, milliseconds from arrival.
    pub timeout_ms: f64,
    pub retry_strategy: RetryStrategy,
    /// Maximum retry attempts per request (not counting the first attempt).
    pub max_retries: u32,
    pub circuit_breaker_enabled: bool,
    pub rate_limiter_enabled: bool,
    /// Token bucket capacity and refill rate, requests per second.
    pub rate_limit_rps: f64,
    pub bulkhead_enabled: bool,
    pub backpressure_enabled: bool,
    /// Occupancy bound applied when backpressure is enabled.
    pub queue_size: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            rps: 10.0,
            service_latency_base_ms: 100.0,
            service_failure_rate: 0.05,
            timeout_ms: 800.0,
            retry_strategy: RetryStrategy::Off,
            max_retries: 3,
            circuit_breaker_enabled: false,
            rate_limiter_enabled: false,
            rate_limit_rps: 15.0,
            bulkhead_enabled: false,
            backpressure_enabled: false,
            queue_size: 50,
        }
    }
}

impl SimulationConfig {
    /// Check that externally loaded values are usable.
    pub fn validate(&self) -> Result<(), SimError> {
        ensure_finite_non_negative("rps", self.rps)?;
        ensure_finite_non_negative("service_latency_base_ms", self.service_latency_base_ms)?;
        ensure_finite_non_negative("rate_limit_rps", self.rate_limit_rps)?;
        if !self.timeout_ms.is_finite() || self.timeout_ms <= 0.0 {
            return Err(SimError::Configuration(format!(
                "timeout_ms must be finite and positive, got {}",
                self.timeout_ms
            )));
        }
        if !self.service_failure_rate.is_finite()
            || !(0.0..=1.0).contains(&self.service_failure_rate)
        {
            return Err(SimError::Configuration(format!(
                "service_failure_rate must be in [0, 1], got {}",
                self.service_failure_rate
            )));
        }
        if self.queue_size == 0 {
            return Err(SimError::Configuration(
                "queue_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// The request deadline as a duration. Malformed values clamp to zero,
    /// which degrades into immediate timeouts rather than a fault.
    pub fn timeout(&self) -> Duration {
        millis_to_duration(self.timeout_ms)
    }
}

fn ensure_finite_non_negative(name: &str, value: f64) -> Result<(), SimError> {
    if !value.is_finite() || value < 0.0 {
        return Err(SimError::Configuration(format!(
            "{name} must be finite and non-negative, got {value}"
        )));
    }
    Ok(())
}

/// Convert floating-point milliseconds to a duration. Non-finite and negative
/// values clamp to zero; absurdly large ones clamp to a ceiling far beyond
/// any plausible simulation horizon, keeping the conversion panic-free.
pub(crate) fn millis_to_duration(millis: f64) -> Duration {
    const MAX_MILLIS: f64 = 1e15;
    if millis.is_finite() && millis > 0.0 {
        Duration::from_secs_f64(millis.min(MAX_MILLIS) / 1000.0)
    } else {
        Duration::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SimulationConfig::default();
        assert_eq!(config.rps, 10.0);
        assert_eq!(config.timeout_ms, 800.0);
        assert_eq!(config.retry_strategy, RetryStrategy::Off);
        assert_eq!(config.max_retries, 3);
        assert!(!config.circuit_breaker_enabled);
        assert!(!config.rate_limiter_enabled);
        assert_eq!(config.rate_limit_rps, 15.0);
        assert_eq!(config.queue_size, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = SimulationConfig::default();
        config.rps = -1.0;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.timeout_ms = 0.0;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.service_failure_rate = 1.5;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.service_failure_rate = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.queue_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_timeout_clamps_malformed_values() {
        let mut config = SimulationConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(800));

        config.timeout_ms = -5.0;
        assert_eq!(config.timeout(), Duration::ZERO);

        config.timeout_ms = f64::NAN;
        assert_eq!(config.timeout(), Duration::ZERO);
    }

    #[test]
    fn test_millis_to_duration() {
        assert_eq!(millis_to_duration(1500.0), Duration::from_millis(1500));
        assert_eq!(millis_to_duration(f64::INFINITY), Duration::ZERO);
        assert_eq!(millis_to_duration(-1.0), Duration::ZERO);
        // Clamped, not panicking.
        assert!(millis_to_duration(f64::MAX) <= Duration::from_secs(1_000_000_000_000));
    }

    #[test]
    fn test_config_serde_round_trip() {
        let config = SimulationConfig {
            retry_strategy: RetryStrategy::Jitter,
            circuit_breaker_enabled: true,
            ..SimulationConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"jitter\""));
        let parsed: SimulationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
