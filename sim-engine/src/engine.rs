//! The discrete-time simulation engine
//!
//! One engine owns one pipeline's worth of state: the active request set, the
//! backpressure queue, the token bucket, the circuit breaker, and the rolling
//! metrics window. An external driver calls [`SimulationEngine::tick`] with a
//! monotonically non-decreasing timestamp (nominally once per rendering
//! frame); everything else happens synchronously inside that call.
//!
//! Per-tick order: compute the elapsed delta (zero on the first tick, clamped
//! to zero for out-of-order timestamps) -> refill the token bucket -> evaluate
//! the breaker cooldown -> probabilistically admit one new request -> dequeue
//! one backpressure-queued request -> advance every in-flight request -> prune
//! the metrics window -> snapshot.

use crate::breaker::CircuitBreaker;
use crate::config::{millis_to_duration, RetryStrategy, SimulationConfig};
use crate::snapshot::Snapshot;
use crate::token_bucket::TokenBucket;
use resim_core::{
    EntropySource, Lane, Outcome, RandomSource, Request, RequestId, RequestStatus, ServiceCall,
    SimTime,
};
use resim_metrics::MetricsWindow;
use std::collections::VecDeque;
use std::time::Duration;
use tracing::{debug, trace};

/// Position where admitted requests enter the pipeline.
const PIPELINE_ENTRY: f64 = 50.0;
/// Position a retrying request re-enters from (past admission, before the
/// service).
const RETRY_REENTRY: f64 = 150.0;
/// Position of the downstream service; reaching it starts the service call.
const SERVICE_BOUNDARY: f64 = 400.0;

/// Fraction of the timeout window a request should need to traverse the
/// pipeline, leaving headroom for the service call itself.
const VELOCITY_HEADROOM: f64 = 0.7;
/// Floor for the timeout when deriving pacing, seconds.
const MIN_TIMEOUT_SECS: f64 = 0.1;

/// Uniform jitter added on top of the configured base service latency, ms.
const SERVICE_JITTER_MS: f64 = 200.0;
/// Extra latency incurred on the impaired bulkhead lane, ms.
const IMPAIRED_LANE_PENALTY_MS: f64 = 1000.0;
/// Failure probability on the impaired bulkhead lane.
const IMPAIRED_LANE_FAILURE_RATE: f64 = 0.8;

/// Base retry backoff; the delay is this doubled per attempt, ms.
const RETRY_BASE_DELAY_MS: f64 = 100.0;

/// How a service call resolved on this tick.
enum CallResolution {
    /// Sampled latency has not elapsed yet, or the would-be success lands
    /// past the request's deadline (the deadline check wins).
    InFlight,
    Success,
    Failure,
}

/// Discrete-time simulation of one request pipeline behind a chain of
/// resilience controls.
///
/// All state is owned exclusively by the engine; external code interacts
/// through [`tick`](Self::tick), [`peek`](Self::peek),
/// [`update_config`](Self::update_config) and [`reset`](Self::reset) only.
/// Multiple independent engines can coexist; there is no ambient state.
pub struct SimulationEngine {
    config: SimulationConfig,
    source: Box<dyn RandomSource>,
    requests: Vec<Request>,
    queue: VecDeque<Request>,
    window: MetricsWindow,
    breaker: CircuitBreaker,
    bucket: TokenBucket,
    next_id: u64,
    last_tick: Option<SimTime>,
}

impl SimulationEngine {
    /// An engine drawing randomness from OS entropy.
    pub fn new(config: SimulationConfig) -> Self {
        Self::with_source(config, Box::new(EntropySource::new()))
    }

    /// An engine with an injected randomness source, for reproducible runs
    /// and tests.
    pub fn with_source(config: SimulationConfig, source: Box<dyn RandomSource>) -> Self {
        let bucket = TokenBucket::full(config.rate_limit_rps);
        Self {
            config,
            source,
            requests: Vec::new(),
            queue: VecDeque::new(),
            window: MetricsWindow::new(),
            breaker: CircuitBreaker::new(),
            bucket,
            next_id: 0,
            last_tick: None,
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Replace the active configuration, effective from the next tick.
    ///
    /// Disabling the rate limiter takes effect through the next tick's bucket
    /// saturation, not immediately; disabling the breaker likewise clears it
    /// on the next tick.
    pub fn update_config(&mut self, config: SimulationConfig) {
        self.config = config;
    }

    /// Clear all simulation state back to initial values. Leaves the
    /// configuration untouched.
    pub fn reset(&mut self) {
        self.requests.clear();
        self.queue.clear();
        self.window.clear();
        self.breaker.reset();
        self.bucket = TokenBucket::full(self.config.rate_limit_rps);
        self.next_id = 0;
        self.last_tick = None;
        debug!("engine reset");
    }

    /// Advance the simulation to `now` and return a fresh snapshot.
    ///
    /// The first call records `now` as the baseline (elapsed time zero); a
    /// timestamp earlier than the previous one clamps the delta to zero
    /// rather than moving simulated time backward.
    pub fn tick(&mut self, now: SimTime) -> Snapshot {
        let last = *self.last_tick.get_or_insert(now);
        let delta = now.duration_since(last);
        self.last_tick = Some(now);
        trace!(now = %now, delta_ms = delta.as_secs_f64() * 1000.0, "tick");

        if self.config.rate_limiter_enabled {
            self.bucket
                .refill(self.config.rate_limit_rps, self.config.rate_limit_rps, delta);
        } else {
            self.bucket.saturate(self.config.rate_limit_rps);
        }

        if self.config.circuit_breaker_enabled {
            self.breaker.evaluate_cooldown(now);
        } else {
            self.breaker.force_closed();
        }

        self.maybe_admit(now, delta);
        self.dequeue_waiting(now);
        self.advance_requests(now, delta);
        self.window.prune(now);
        self.snapshot()
    }

    /// A snapshot of current state without advancing the simulation. Used for
    /// the initial render and post-reset render; calling it repeatedly yields
    /// equal snapshots.
    pub fn peek(&self) -> Snapshot {
        self.snapshot()
    }

    /// Admission control: one Bernoulli arrival draw per tick, then the fixed
    /// rejection order of a real gateway's admission stack: rate limit, then
    /// capacity, then dependency health.
    fn maybe_admit(&mut self, now: SimTime, delta: Duration) {
        let probability = self.config.rps * delta.as_secs_f64();
        if !self.source.chance(probability) {
            return;
        }

        if self.config.rate_limiter_enabled && !self.bucket.try_consume() {
            debug!("admission rejected, rate limit exhausted");
            self.record_completion(Outcome::Rejected, Duration::ZERO, now);
            return;
        }

        let lane = if self.config.bulkhead_enabled {
            if self.source.chance(0.5) {
                Lane::Bulkhead2
            } else {
                Lane::Bulkhead1
            }
        } else {
            Lane::Default
        };

        if self.config.backpressure_enabled {
            let pending = self
                .requests
                .iter()
                .filter(|r| matches!(r.status, RequestStatus::Pending))
                .count();
            let occupancy = self.queue.len() + pending;
            if occupancy >= self.config.queue_size {
                debug!(occupancy, bound = self.config.queue_size, "admission rejected, backpressure");
                self.record_completion(Outcome::Rejected, Duration::ZERO, now);
                return;
            }
        }

        if self.breaker.is_open() {
            debug!("admission fast-failed, breaker open");
            self.record_completion(Outcome::Failed, Duration::ZERO, now);
            return;
        }

        let id = RequestId(self.next_id);
        self.next_id += 1;
        trace!(request = %id, ?lane, "request admitted");
        self.requests.push(Request::new(id, now, lane, PIPELINE_ENTRY));
    }

    /// Re-dispatch one queued request per tick, restarting its clock.
    fn dequeue_waiting(&mut self, now: SimTime) {
        if let Some(mut next) = self.queue.pop_front() {
            next.started_at = now;
            trace!(request = %next.id, "request dequeued");
            self.requests.push(next);
        }
    }

    fn advance_requests(&mut self, now: SimTime, delta: Duration) {
        let velocity = self.velocity();
        let mut active = std::mem::take(&mut self.requests);
        active.retain_mut(|request| self.step_request(request, now, delta, velocity));
        self.requests = active;
    }

    /// Advance one request by one tick. Returns `false` when the request
    /// reached a terminal status and must leave the active set.
    fn step_request(
        &mut self,
        request: &mut Request,
        now: SimTime,
        delta: Duration,
        velocity: f64,
    ) -> bool {
        if let RequestStatus::Retrying { next_attempt_at } = request.status {
            if now < next_attempt_at {
                return true;
            }
            request.status = RequestStatus::Pending;
            request.position = RETRY_REENTRY;
            request.call = None;
            trace!(request = %request.id, attempt = request.retry_count, "retry re-entered pipeline");
        }

        if request.position < SERVICE_BOUNDARY {
            request.position =
                (request.position + velocity * delta.as_secs_f64()).min(SERVICE_BOUNDARY);
        }

        if request.position >= SERVICE_BOUNDARY && request.status == RequestStatus::Pending {
            match self.resolve_service_call(request, now) {
                CallResolution::InFlight => {}
                CallResolution::Success => {
                    self.breaker.record_success();
                    let latency = request.elapsed_since(now);
                    request.status = RequestStatus::Success;
                    self.record_completion(Outcome::Success, latency, now);
                    return false;
                }
                CallResolution::Failure => {
                    return self.conclude_failure(request, Outcome::Failed, now);
                }
            }
        }

        // Deadline check, independent of position: a request can time out
        // before ever reaching the service boundary, and the deadline wins
        // over a service call that would resolve later than it.
        if request.status == RequestStatus::Pending
            && request.elapsed_since(now) > self.config.timeout()
        {
            return self.conclude_failure(request, Outcome::Timeout, now);
        }

        true
    }

    /// Start the service call if this is the first time at the boundary, then
    /// observe it if the sampled latency has elapsed.
    fn resolve_service_call(&mut self, request: &mut Request, now: SimTime) -> CallResolution {
        if request.call.is_none() {
            let mut failure_rate = self.config.service_failure_rate;
            let mut latency_ms =
                self.config.service_latency_base_ms + self.source.range(0.0, SERVICE_JITTER_MS);
            if self.config.bulkhead_enabled && request.lane == Lane::Bulkhead2 {
                latency_ms += IMPAIRED_LANE_PENALTY_MS;
                failure_rate = IMPAIRED_LANE_FAILURE_RATE;
            }
            let will_fail = self.source.chance(failure_rate);
            trace!(request = %request.id, latency_ms, will_fail, "service call started");
            request.call = Some(ServiceCall {
                started_at: now,
                target_latency: millis_to_duration(latency_ms),
                will_fail,
            });
        }

        let Some(call) = request.call else {
            return CallResolution::InFlight;
        };
        if now.duration_since(call.started_at) < call.target_latency {
            return CallResolution::InFlight;
        }
        if call.will_fail {
            return CallResolution::Failure;
        }
        // The call would have resolved after the request's deadline: leave it
        // pending so the deadline check converts it to a timeout this tick.
        let deadline = request.started_at + self.config.timeout();
        if call.started_at + call.target_latency > deadline {
            return CallResolution::InFlight;
        }
        CallResolution::Success
    }

    /// Shared failure handling for service failures and timeouts: feed the
    /// breaker, then either schedule a retry or conclude the request.
    /// Returns `false` when the request is terminal.
    fn conclude_failure(&mut self, request: &mut Request, outcome: Outcome, now: SimTime) -> bool {
        if self.config.circuit_breaker_enabled {
            self.breaker.record_failure(now);
        }

        let can_retry = self.config.retry_strategy != RetryStrategy::Off
            && request.retry_count < self.config.max_retries;
        if can_retry {
            request.retry_count += 1;
            let base_ms = RETRY_BASE_DELAY_MS * f64::powi(2.0, request.retry_count as i32);
            let delay_ms = match self.config.retry_strategy {
                RetryStrategy::Jitter => base_ms * self.source.range(0.5, 1.5),
                _ => base_ms,
            };
            let next_attempt_at = now + millis_to_duration(delay_ms);
            request.status = RequestStatus::Retrying { next_attempt_at };
            request.call = None;
            debug!(
                request = %request.id,
                retry = request.retry_count,
                delay_ms,
                cause = outcome.as_str(),
                "retry scheduled"
            );
            return true;
        }

        request.status = outcome.into();
        self.record_completion(outcome, request.elapsed_since(now), now);
        false
    }

    fn record_completion(&mut self, outcome: Outcome, latency: Duration, now: SimTime) {
        trace!(
            outcome = outcome.as_str(),
            latency_ms = latency.as_secs_f64() * 1000.0,
            "request completed"
        );
        self.window.record(outcome, latency, now);
    }

    /// Pipeline traversal speed in position units per second, derived from
    /// the timeout so requests stay visually inside their deadline. Malformed
    /// timeouts clamp to a floor instead of producing a non-finite velocity.
    fn velocity(&self) -> f64 {
        let span = SERVICE_BOUNDARY - PIPELINE_ENTRY;
        let timeout_secs = (self.config.timeout_ms / 1000.0).max(MIN_TIMEOUT_SECS);
        let window = (timeout_secs * VELOCITY_HEADROOM).max(MIN_TIMEOUT_SECS);
        let velocity = span / window;
        if velocity.is_finite() && velocity > 0.0 {
            velocity
        } else {
            span
        }
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            requests: self.requests.clone(),
            metrics: self.window.summarize(self.requests.len()),
            breaker_state: self.breaker.state(),
            breaker_failures: self.breaker.failure_count(),
            tokens: self.bucket.available(),
        }
    }
}
