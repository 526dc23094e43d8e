//! Rolling completed-sample window and derived metrics
//!
//! The window is the sole source for the simulator's point-in-time metrics:
//! an append-only, time-pruned sequence of terminal request outcomes. It
//! intentionally discards anything older than its span instead of retaining
//! full history.

use crate::latency::LatencyStats;
use resim_core::{Outcome, SimTime};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// One terminal request outcome, recorded at completion time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompletedSample {
    pub outcome: Outcome,
    /// End-to-end latency measured from the request's original arrival.
    pub latency: Duration,
    pub completed_at: SimTime,
}

/// Point-in-time metrics derived from the window.
///
/// `queue_length` counts currently active (non-terminal) requests, not the
/// backpressure queue alone.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationMetrics {
    pub success: u64,
    pub failed: u64,
    pub rejected: u64,
    pub timed_out: u64,
    /// Completed samples per second, averaged over the window span.
    pub throughput: f64,
    /// Mean latency of success samples in the window, in milliseconds.
    /// Zero when the window holds no successes.
    pub avg_latency_ms: f64,
    pub queue_length: usize,
}

impl SimulationMetrics {
    /// Failed, timed-out and rejected samples combined.
    pub fn errors(&self) -> u64 {
        self.failed + self.timed_out + self.rejected
    }
}

/// Append-only, time-pruned window of completed samples.
#[derive(Debug, Clone)]
pub struct MetricsWindow {
    samples: VecDeque<CompletedSample>,
    span: Duration,
}

impl MetricsWindow {
    /// Default trailing span the window retains.
    pub const DEFAULT_SPAN: Duration = Duration::from_secs(2);

    pub fn new() -> Self {
        Self::with_span(Self::DEFAULT_SPAN)
    }

    /// A window with a custom trailing span. Zero spans are bumped to one
    /// millisecond so throughput never divides by zero.
    pub fn with_span(span: Duration) -> Self {
        Self {
            samples: VecDeque::new(),
            span: span.max(Duration::from_millis(1)),
        }
    }

    /// Record one terminal outcome and drop anything that has aged out.
    pub fn record(&mut self, outcome: Outcome, latency: Duration, now: SimTime) {
        self.samples.push_back(CompletedSample {
            outcome,
            latency,
            completed_at: now,
        });
        self.prune(now);
    }

    /// Drop samples older than the window span. Called on every engine tick
    /// so an idle window still expires its contents.
    pub fn prune(&mut self, now: SimTime) {
        while let Some(front) = self.samples.front() {
            if now.duration_since(front.completed_at) >= self.span {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }

    /// Derive point-in-time metrics from the current window contents.
    pub fn summarize(&self, active_requests: usize) -> SimulationMetrics {
        let mut metrics = SimulationMetrics {
            queue_length: active_requests,
            ..SimulationMetrics::default()
        };
        let mut latency_sum_ms = 0.0;

        for sample in &self.samples {
            match sample.outcome {
                Outcome::Success => {
                    metrics.success += 1;
                    latency_sum_ms += sample.latency.as_secs_f64() * 1000.0;
                }
                Outcome::Failed => metrics.failed += 1,
                Outcome::Rejected => metrics.rejected += 1,
                Outcome::Timeout => metrics.timed_out += 1,
            }
        }

        metrics.throughput = self.samples.len() as f64 / self.span.as_secs_f64();
        if metrics.success > 0 {
            metrics.avg_latency_ms = latency_sum_ms / metrics.success as f64;
        }
        metrics
    }

    /// High-resolution latency statistics over the success samples currently
    /// in the window, or `None` when there are none.
    pub fn latency_stats(&self) -> Option<LatencyStats> {
        let latencies: Vec<Duration> = self
            .samples
            .iter()
            .filter(|s| s.outcome == Outcome::Success)
            .map(|s| s.latency)
            .collect();
        LatencyStats::from_durations(&latencies)
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn span(&self) -> Duration {
        self.span
    }

    pub fn samples(&self) -> impl Iterator<Item = &CompletedSample> {
        self.samples.iter()
    }
}

impl Default for MetricsWindow {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ms: u64) -> SimTime {
        SimTime::from_millis(ms)
    }

    #[test]
    fn test_record_and_counts() {
        let mut window = MetricsWindow::new();
        window.record(Outcome::Success, Duration::from_millis(100), at(10));
        window.record(Outcome::Failed, Duration::from_millis(50), at(20));
        window.record(Outcome::Rejected, Duration::ZERO, at(30));
        window.record(Outcome::Timeout, Duration::from_millis(800), at(40));

        let metrics = window.summarize(3);
        assert_eq!(metrics.success, 1);
        assert_eq!(metrics.failed, 1);
        assert_eq!(metrics.rejected, 1);
        assert_eq!(metrics.timed_out, 1);
        assert_eq!(metrics.queue_length, 3);
        assert_eq!(metrics.errors(), 3);
    }

    #[test]
    fn test_throughput_is_samples_over_span() {
        let mut window = MetricsWindow::new();
        for i in 0..6 {
            window.record(Outcome::Success, Duration::from_millis(10), at(i * 10));
        }

        // Six samples over a two-second span.
        let metrics = window.summarize(0);
        assert_eq!(metrics.throughput, 3.0);
    }

    #[test]
    fn test_avg_latency_counts_successes_only() {
        let mut window = MetricsWindow::new();
        window.record(Outcome::Success, Duration::from_millis(100), at(10));
        window.record(Outcome::Success, Duration::from_millis(300), at(20));
        window.record(Outcome::Failed, Duration::from_millis(9000), at(30));

        let metrics = window.summarize(0);
        assert_eq!(metrics.avg_latency_ms, 200.0);
    }

    #[test]
    fn test_avg_latency_zero_when_no_successes() {
        let mut window = MetricsWindow::new();
        window.record(Outcome::Failed, Duration::from_millis(100), at(10));

        assert_eq!(window.summarize(0).avg_latency_ms, 0.0);
    }

    #[test]
    fn test_prune_expires_samples_at_span_boundary() {
        let mut window = MetricsWindow::new();
        window.record(Outcome::Success, Duration::from_millis(100), at(1000));

        // One nanosecond short of the boundary: still present.
        window.prune(SimTime::from_nanos(1000 * 1_000_000 + 2_000_000_000 - 1));
        assert_eq!(window.len(), 1);

        // Exactly at the boundary: gone.
        window.prune(at(3000));
        assert!(window.is_empty());
    }

    #[test]
    fn test_sample_expired_after_window_plus_one_ms() {
        let mut window = MetricsWindow::new();
        window.record(Outcome::Success, Duration::from_millis(100), at(500));
        window.prune(at(500 + 2001));

        let metrics = window.summarize(0);
        assert_eq!(metrics.success, 0);
        assert_eq!(metrics.avg_latency_ms, 0.0);
        assert_eq!(metrics.throughput, 0.0);
    }

    #[test]
    fn test_clear() {
        let mut window = MetricsWindow::new();
        window.record(Outcome::Success, Duration::from_millis(100), at(10));
        window.clear();
        assert!(window.is_empty());
    }

    #[test]
    fn test_latency_stats_over_successes() {
        let mut window = MetricsWindow::new();
        window.record(Outcome::Success, Duration::from_millis(100), at(10));
        window.record(Outcome::Success, Duration::from_millis(200), at(20));
        window.record(Outcome::Failed, Duration::from_millis(5000), at(30));

        let stats = window.latency_stats().unwrap();
        assert_eq!(stats.count, 2);
        assert!(stats.max >= Duration::from_millis(199));

        let empty = MetricsWindow::new();
        assert!(empty.latency_stats().is_none());
    }
}
