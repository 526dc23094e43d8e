//! Immutable per-tick view of the simulation
//!
//! A snapshot is fully detached from engine state: consumers may hold it
//! across ticks, compare it, serialize it, or hand it to a renderer without
//! any aliasing of the engine's internals.

use crate::breaker::BreakerState;
use resim_core::Request;
use resim_metrics::SimulationMetrics;
use serde::{Deserialize, Serialize};

/// Read-only copy of the active requests, derived metrics, breaker state and
/// token count, produced fresh on every tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// All currently active (non-terminal) requests.
    pub requests: Vec<Request>,
    pub metrics: SimulationMetrics,
    pub breaker_state: BreakerState,
    pub breaker_failures: u32,
    /// Current token bucket level.
    pub tokens: f64,
}

impl Snapshot {
    /// The snapshot of a simulation that has not started: no requests, zero
    /// metrics, breaker closed, empty bucket. Used by drivers for the initial
    /// render before the first tick.
    pub fn empty() -> Self {
        Self {
            requests: Vec::new(),
            metrics: SimulationMetrics::default(),
            breaker_state: BreakerState::Closed,
            breaker_failures: 0,
            tokens: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_snapshot() {
        let snapshot = Snapshot::empty();
        assert!(snapshot.requests.is_empty());
        assert_eq!(snapshot.metrics, SimulationMetrics::default());
        assert_eq!(snapshot.breaker_state, BreakerState::Closed);
        assert_eq!(snapshot.tokens, 0.0);
    }

    #[test]
    fn test_snapshot_serializes() {
        let json = serde_json::to_string(&Snapshot::empty()).unwrap();
        assert!(json.contains("\"breaker_state\":\"closed\""));
    }
}
