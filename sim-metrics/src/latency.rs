//! High-resolution latency statistics
//!
//! Thin wrapper over `hdrhistogram` for the percentile summaries drivers want
//! to print or chart. Latencies are recorded with microsecond resolution and
//! three significant figures, covering 1µs to 60s.

use hdrhistogram::Histogram;
use serde::Serialize;
use std::time::Duration;

/// Summary statistics over a set of latencies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatencyStats {
    pub count: u64,
    pub min: Duration,
    pub max: Duration,
    pub mean: Duration,
    pub p50: Duration,
    pub p95: Duration,
    pub p99: Duration,
}

impl LatencyStats {
    /// Build statistics from raw durations. Returns `None` for an empty set.
    pub fn from_durations(latencies: &[Duration]) -> Option<Self> {
        if latencies.is_empty() {
            return None;
        }

        let mut histogram: Histogram<u64> =
            Histogram::new_with_bounds(1, 60_000_000, 3).expect("static histogram bounds");
        for latency in latencies {
            // Values outside the bounds clamp instead of erroring.
            histogram.saturating_record(latency.as_micros() as u64);
        }

        Some(Self {
            count: histogram.len(),
            min: Duration::from_micros(histogram.min()),
            max: Duration::from_micros(histogram.max()),
            mean: Duration::from_micros(histogram.mean() as u64),
            p50: Duration::from_micros(histogram.value_at_quantile(0.5)),
            p95: Duration::from_micros(histogram.value_at_quantile(0.95)),
            p99: Duration::from_micros(histogram.value_at_quantile(0.99)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_yields_none() {
        assert!(LatencyStats::from_durations(&[]).is_none());
    }

    #[test]
    fn test_single_value() {
        let stats = LatencyStats::from_durations(&[Duration::from_millis(100)]).unwrap();
        assert_eq!(stats.count, 1);
        // Three significant figures of precision around 100ms.
        assert!(stats.p50 >= Duration::from_millis(99) && stats.p50 <= Duration::from_millis(101));
    }

    #[test]
    fn test_percentile_ordering() {
        let latencies: Vec<Duration> = (1..=100).map(Duration::from_millis).collect();
        let stats = LatencyStats::from_durations(&latencies).unwrap();

        assert_eq!(stats.count, 100);
        assert!(stats.min <= stats.p50);
        assert!(stats.p50 <= stats.p95);
        assert!(stats.p95 <= stats.p99);
        assert!(stats.p99 <= stats.max);
    }
}
