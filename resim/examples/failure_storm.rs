//! Failure storm: a badly degraded dependency trips the circuit breaker,
//! the breaker fast-fails traffic through the cooldown, then a healed
//! dependency closes it again on the first probe.
//!
//! Run with debug logging to watch every transition:
//!
//! ```bash
//! RUST_LOG=resim_engine=debug cargo run --example failure_storm
//! ```

use resim::prelude::*;

fn main() {
    init_simulation_logging_with_level("debug");
    let span = resim::core::simulation_span("failure_storm");
    let _guard = span.enter();

    let degraded = SimulationConfig {
        rps: 25.0,
        service_failure_rate: 0.9,
        timeout_ms: 600.0,
        retry_strategy: RetryStrategy::Fixed,
        max_retries: 1,
        circuit_breaker_enabled: true,
        ..SimulationConfig::default()
    };
    let healed = SimulationConfig {
        service_failure_rate: 0.05,
        ..degraded.clone()
    };

    let mut engine =
        SimulationEngine::with_source(degraded, Box::new(SeededSource::new(7)));

    let mut now = 0u64;
    let mut tripped_at = None;
    while now < 60_000 {
        now += 16;
        let snapshot = engine.tick(SimTime::from_millis(now));

        if tripped_at.is_none() && snapshot.breaker_state == BreakerState::Open {
            tripped_at = Some(now);
            println!("breaker tripped at {now}ms, healing the dependency");
            engine.update_config(healed.clone());
        }
        if let Some(tripped) = tripped_at {
            if snapshot.breaker_state == BreakerState::Closed && now > tripped {
                println!("breaker closed again at {now}ms ({}ms after the trip)", now - tripped);
                break;
            }
        }
    }

    let last = engine.peek();
    println!(
        "final window: {} ok / {} failed / {} timed out, {:.1} req/s",
        last.metrics.success, last.metrics.failed, last.metrics.timed_out, last.metrics.throughput,
    );
}
