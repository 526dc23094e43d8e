//! Simulation time management

use crate::error::SimError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::time::Duration;

/// A point in simulation time, stored as nanoseconds since simulation start.
///
/// Simulation time is supplied by an external driver and is not wall-clock
/// time. Arithmetic saturates instead of wrapping, and [`SimTime::duration_since`]
/// clamps out-of-order inputs to zero, so a stale timestamp can never move the
/// simulation backward.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SimTime(u64);

impl SimTime {
    /// The simulation start (time zero).
    pub const fn zero() -> Self {
        SimTime(0)
    }

    /// Create a `SimTime` from nanoseconds.
    pub const fn from_nanos(nanos: u64) -> Self {
        SimTime(nanos)
    }

    /// Create a `SimTime` from milliseconds.
    pub const fn from_millis(millis: u64) -> Self {
        SimTime(millis * 1_000_000)
    }

    /// Create a `SimTime` from seconds.
    pub const fn from_secs(secs: u64) -> Self {
        SimTime(secs * 1_000_000_000)
    }

    /// Create a `SimTime` from floating-point milliseconds, the unit external
    /// frame drivers usually hand out. Non-finite or negative input clamps to
    /// zero.
    pub fn from_millis_f64(millis: f64) -> Self {
        if !millis.is_finite() || millis <= 0.0 {
            return SimTime::zero();
        }
        SimTime((millis * 1_000_000.0) as u64)
    }

    /// Strict variant of [`SimTime::from_millis_f64`] for drivers that want
    /// to surface a bad timestamp instead of clamping it.
    pub fn try_from_millis_f64(millis: f64) -> Result<Self, SimError> {
        if !millis.is_finite() || millis < 0.0 {
            return Err(SimError::InvalidTime(format!(
                "timestamp must be finite and non-negative, got {millis}"
            )));
        }
        Ok(SimTime((millis * 1_000_000.0) as u64))
    }

    /// Raw nanosecond value.
    pub const fn as_nanos(&self) -> u64 {
        self.0
    }

    /// This point in time expressed as floating-point milliseconds.
    pub fn as_millis_f64(&self) -> f64 {
        self.0 as f64 / 1_000_000.0
    }

    /// Convert to a [`Duration`] since simulation start.
    pub fn as_duration(&self) -> Duration {
        Duration::from_nanos(self.0)
    }

    /// Elapsed time since `earlier`, saturating to zero if `earlier` is in
    /// fact later (out-of-order timestamps from the driver).
    pub fn duration_since(&self, earlier: SimTime) -> Duration {
        Duration::from_nanos(self.0.saturating_sub(earlier.0))
    }
}

impl Add<Duration> for SimTime {
    type Output = SimTime;

    fn add(self, rhs: Duration) -> Self::Output {
        SimTime(self.0.saturating_add(rhs.as_nanos() as u64))
    }
}

impl Sub<SimTime> for SimTime {
    type Output = Duration;

    fn sub(self, rhs: SimTime) -> Self::Output {
        self.duration_since(rhs)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let duration = self.as_duration();
        let secs = duration.as_secs();
        let millis = duration.subsec_millis();
        if secs > 0 {
            write!(f, "{secs}.{millis:03}s")
        } else {
            write!(f, "{millis}ms")
        }
    }
}
