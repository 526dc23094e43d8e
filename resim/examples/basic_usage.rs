//! Fixed-step driver: run the pipeline for ten simulated seconds, sample
//! chart history every 200ms the way a UI would, and export a JSON report.

use resim::prelude::*;

const FRAME_MS: u64 = 16;
const SAMPLE_EVERY_MS: u64 = 200;
const RUN_FOR_MS: u64 = 10_000;

fn main() {
    init_simulation_logging();

    let config = SimulationConfig {
        rps: 20.0,
        service_failure_rate: 0.15,
        retry_strategy: RetryStrategy::Jitter,
        rate_limiter_enabled: true,
        rate_limit_rps: 15.0,
        ..SimulationConfig::default()
    };
    config.validate().expect("example config is well-formed");

    let mut engine =
        SimulationEngine::with_source(config, Box::new(SeededSource::new(42)));
    let mut history = MetricsHistory::new();

    // Drivers render from a peek before the first tick.
    let mut snapshot = engine.peek();
    println!(
        "driving {:.0} req/s against a {:.0}ms dependency, {:.0} tokens in the bucket",
        engine.config().rps,
        engine.config().service_latency_base_ms,
        snapshot.tokens
    );

    let mut last_sample = 0;
    let mut now = 0;
    while now <= RUN_FOR_MS {
        snapshot = engine.tick(SimTime::from_millis(now));
        if now - last_sample >= SAMPLE_EVERY_MS {
            history.push(&snapshot.metrics);
            publish_metrics(&snapshot.metrics, snapshot.tokens, snapshot.breaker_failures);
            last_sample = now;
        }
        now += FRAME_MS;
    }

    println!("after {RUN_FOR_MS}ms of simulated time:");
    println!("  active requests: {}", snapshot.requests.len());
    println!("  throughput:      {:.1} req/s", snapshot.metrics.throughput);
    println!("  avg latency:     {:.0} ms", snapshot.metrics.avg_latency_ms);
    println!(
        "  window counts:   {} ok / {} failed / {} rejected / {} timed out",
        snapshot.metrics.success,
        snapshot.metrics.failed,
        snapshot.metrics.rejected,
        snapshot.metrics.timed_out,
    );
    println!("  breaker:         {:?} ({} failures)", snapshot.breaker_state, snapshot.breaker_failures);
    println!("  bucket tokens:   {:.2}", snapshot.tokens);
    println!(
        "  history tail:    throughput {:?}",
        &history.throughput()[history.len() - 5..]
    );

    let report_path = std::env::temp_dir().join("resim_report.json");
    JsonExporter::new(&report_path, true)
        .export(&snapshot)
        .expect("export snapshot");
    println!("snapshot written to {}", report_path.display());
}
