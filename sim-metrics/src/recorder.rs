//! Publication of simulation metrics through the standard `metrics` facade
//!
//! Windowed values are resampled every tick, so everything is published as a
//! gauge; whichever recorder the host application installs (Prometheus
//! exporter, logging recorder, ...) sees the simulator alongside its other
//! instrumentation.

use crate::window::SimulationMetrics;
use metrics::gauge;

/// Publish one snapshot's worth of metrics.
///
/// A no-op unless the host application has installed a `metrics` recorder.
pub fn publish_metrics(metrics: &SimulationMetrics, tokens: f64, breaker_failures: u32) {
    gauge!("resim_throughput_rps").set(metrics.throughput);
    gauge!("resim_avg_latency_ms").set(metrics.avg_latency_ms);
    gauge!("resim_active_requests").set(metrics.queue_length as f64);
    gauge!("resim_bucket_tokens").set(tokens);
    gauge!("resim_breaker_failures").set(f64::from(breaker_failures));

    gauge!("resim_window_completions", "outcome" => "success").set(metrics.success as f64);
    gauge!("resim_window_completions", "outcome" => "failed").set(metrics.failed as f64);
    gauge!("resim_window_completions", "outcome" => "rejected").set(metrics.rejected as f64);
    gauge!("resim_window_completions", "outcome" => "timeout").set(metrics.timed_out as f64);
}
