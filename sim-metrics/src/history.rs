//! Fixed-length metric history for charting
//!
//! Drivers sample the snapshot metrics on their own cadence (the original UI
//! sampled every 200ms) and push them here. Each series is a shift-and-append
//! ring of fixed length, pre-filled with zeros so charts render a full axis
//! from the first frame.

use crate::window::SimulationMetrics;

/// Default number of points each series retains.
pub const DEFAULT_HISTORY_LENGTH: usize = 40;

/// Rolling chart history of throughput, error count and average latency.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsHistory {
    length: usize,
    throughput: Vec<f64>,
    errors: Vec<f64>,
    latency_ms: Vec<f64>,
}

impl MetricsHistory {
    pub fn new() -> Self {
        Self::with_length(DEFAULT_HISTORY_LENGTH)
    }

    /// A history retaining `length` points per series (at least one).
    pub fn with_length(length: usize) -> Self {
        let length = length.max(1);
        Self {
            length,
            throughput: vec![0.0; length],
            errors: vec![0.0; length],
            latency_ms: vec![0.0; length],
        }
    }

    /// Append one metrics sample, dropping the oldest point of each series.
    pub fn push(&mut self, metrics: &SimulationMetrics) {
        shift_append(&mut self.throughput, metrics.throughput);
        shift_append(&mut self.errors, metrics.errors() as f64);
        shift_append(&mut self.latency_ms, metrics.avg_latency_ms);
    }

    /// Refill every series with zeros.
    pub fn reset(&mut self) {
        self.throughput.fill(0.0);
        self.errors.fill(0.0);
        self.latency_ms.fill(0.0);
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn throughput(&self) -> &[f64] {
        &self.throughput
    }

    pub fn errors(&self) -> &[f64] {
        &self.errors
    }

    pub fn latency_ms(&self) -> &[f64] {
        &self.latency_ms
    }
}

impl Default for MetricsHistory {
    fn default() -> Self {
        Self::new()
    }
}

fn shift_append(series: &mut Vec<f64>, value: f64) {
    series.remove(0);
    series.push(value);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(throughput: f64, failed: u64, latency_ms: f64) -> SimulationMetrics {
        SimulationMetrics {
            failed,
            throughput,
            avg_latency_ms: latency_ms,
            ..SimulationMetrics::default()
        }
    }

    #[test]
    fn test_starts_zero_filled() {
        let history = MetricsHistory::new();
        assert_eq!(history.len(), DEFAULT_HISTORY_LENGTH);
        assert!(history.throughput().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_push_shifts_and_appends() {
        let mut history = MetricsHistory::with_length(3);
        history.push(&sample(1.0, 2, 10.0));
        history.push(&sample(2.0, 0, 20.0));

        assert_eq!(history.throughput(), &[0.0, 1.0, 2.0]);
        assert_eq!(history.errors(), &[0.0, 2.0, 0.0]);
        assert_eq!(history.latency_ms(), &[0.0, 10.0, 20.0]);
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_length_stays_fixed() {
        let mut history = MetricsHistory::with_length(2);
        for i in 0..10 {
            history.push(&sample(i as f64, 0, 0.0));
        }
        assert_eq!(history.throughput(), &[8.0, 9.0]);
    }

    #[test]
    fn test_reset_refills_zeros() {
        let mut history = MetricsHistory::with_length(4);
        history.push(&sample(5.0, 1, 50.0));
        history.reset();

        assert!(history.throughput().iter().all(|&v| v == 0.0));
        assert!(history.errors().iter().all(|&v| v == 0.0));
        assert!(history.latency_ms().iter().all(|&v| v == 0.0));
    }
}
