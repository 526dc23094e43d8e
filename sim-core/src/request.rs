//! Request data model for the resilience pipeline
//!
//! This module models the unit of work flowing through the simulated pipeline.
//! A request is exclusively owned by the engine for its entire lifetime: it is
//! created on admission, mutated every tick while active, and removed from the
//! active set the instant it reaches a terminal status. Terminal outcomes are
//! recorded into the metrics window as [`Outcome`] values rather than retained
//! as request objects.

use crate::time::SimTime;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Unique identifier for a simulated request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub u64);

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Request({})", self.0)
    }
}

/// Capacity partition a request is assigned to on admission.
///
/// `Bulkhead2` is the impaired lane: requests routed there incur an extra
/// latency penalty and an elevated failure probability, which is what makes
/// lane isolation visible in the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lane {
    Default,
    Bulkhead1,
    Bulkhead2,
}

/// Status of a simulated request.
///
/// The retry timestamp only exists while the request is actually retrying;
/// there is no ambient `next_retry_time` field to check out of band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Travelling through the pipeline or waiting on the downstream call.
    Pending,
    /// Backing off after a failed attempt; re-enters the pipeline at
    /// `next_attempt_at`.
    Retrying { next_attempt_at: SimTime },
    /// Downstream call resolved successfully.
    Success,
    /// Downstream returned a failure, or the breaker fast-failed the request.
    Failed,
    /// Deadline exceeded before the downstream call resolved.
    Timeout,
    /// Refused at admission (rate limit or capacity); never reached the
    /// dependency.
    Rejected,
}

impl RequestStatus {
    /// Whether this status ends the request's lifecycle.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RequestStatus::Success
                | RequestStatus::Failed
                | RequestStatus::Timeout
                | RequestStatus::Rejected
        )
    }
}

/// Terminal outcome of a request, as recorded into the metrics window.
///
/// This is the terminal-only subset of [`RequestStatus`], so a non-terminal
/// status can never be recorded as a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    Failed,
    Timeout,
    Rejected,
}

impl Outcome {
    /// Stable label used for logging and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Failed => "failed",
            Outcome::Timeout => "timeout",
            Outcome::Rejected => "rejected",
        }
    }
}

impl From<Outcome> for RequestStatus {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success => RequestStatus::Success,
            Outcome::Failed => RequestStatus::Failed,
            Outcome::Timeout => RequestStatus::Timeout,
            Outcome::Rejected => RequestStatus::Rejected,
        }
    }
}

/// In-progress downstream call for a single attempt.
///
/// Created lazily the first time the request reaches the service boundary.
/// Both the target latency and the outcome are sampled exactly once, at
/// attempt start; only the *observation* of the outcome is delayed until the
/// sampled latency has elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ServiceCall {
    /// Tick at which the attempt reached the service.
    pub started_at: SimTime,
    /// Latency the attempt will take to resolve.
    pub target_latency: Duration,
    /// Pre-sampled outcome, fixed at attempt start.
    pub will_fail: bool,
}

/// The unit of work flowing through the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub id: RequestId,
    /// Simulated horizontal position; a progress proxy, not wall distance.
    pub position: f64,
    pub lane: Lane,
    pub status: RequestStatus,
    /// Arrival time of the current attempt chain (original arrival, except
    /// when re-dispatched from the backpressure queue).
    pub started_at: SimTime,
    pub retry_count: u32,
    /// Downstream call in progress, if the request has reached the service.
    pub call: Option<ServiceCall>,
}

impl Request {
    pub fn new(id: RequestId, started_at: SimTime, lane: Lane, position: f64) -> Self {
        Self {
            id,
            position,
            lane,
            status: RequestStatus::Pending,
            started_at,
            retry_count: 0,
            call: None,
        }
    }

    /// Time elapsed since the request's arrival, including prior retries.
    pub fn elapsed_since(&self, now: SimTime) -> Duration {
        now.duration_since(self.started_at)
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
