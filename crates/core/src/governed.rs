//! Rate limiter backed by the `governor` crate (GCRA).
//!
//! Offered as a drop-in alternative to [`TokenBucket`](crate::TokenBucket):
//! the same capacity/refill-rate pair maps onto a governor quota whose burst
//! is the capacity and whose replenish period is `1 / refill_rate`.

use crate::error::BucketError;
use crate::limiter::{validate_parameters, RateLimiter};
use governor::clock::{Clock as _, DefaultClock};
use governor::{DefaultDirectRateLimiter, Quota};
use parking_lot::Mutex;
use std::num::NonZeroU32;
use std::time::{Duration, Instant};

/// Process-wide limiter delegating the admission decision to governor.
pub struct GovernorLimiter {
    limiter: DefaultDirectRateLimiter,
    capacity: u32,
    refill_rate: f64,
    /// Wait reported by the most recent rejection and when it was observed.
    last_rejection: Mutex<Option<(Instant, Duration)>>,
}

impl std::fmt::Debug for GovernorLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GovernorLimiter")
            .field("capacity", &self.capacity)
            .field("refill_rate", &self.refill_rate)
            .finish_non_exhaustive()
    }
}

impl GovernorLimiter {
    /// Create a limiter that allows `capacity` requests back to back and then
    /// one request every `1 / refill_rate` seconds.
    pub fn new(capacity: u32, refill_rate: f64) -> Result<Self, BucketError> {
        validate_parameters(capacity, refill_rate)?;
        let invalid_rate = || BucketError::InvalidRefillRate {
            got: refill_rate,
            min: crate::config::MIN_REFILL_RATE,
        };

        let period = Duration::from_secs_f64(1.0 / refill_rate);
        // governor tracks `capacity * period` in u64 nanoseconds.
        u64::try_from(period.as_nanos())
            .ok()
            .and_then(|p| p.checked_mul(u64::from(capacity)))
            .ok_or_else(invalid_rate)?;

        let burst = NonZeroU32::new(capacity).ok_or(BucketError::InvalidCapacity {
            got: capacity,
            max: crate::config::MAX_CAPACITY,
        })?;
        let quota = Quota::with_period(period)
            .ok_or_else(invalid_rate)?
            .allow_burst(burst);

        Ok(Self {
            limiter: governor::RateLimiter::direct(quota),
            capacity,
            refill_rate,
            last_rejection: Mutex::new(None),
        })
    }

    /// Maximum number of back-to-back requests.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Requests restored per second, as configured.
    pub fn refill_rate(&self) -> f64 {
        self.refill_rate
    }
}

impl RateLimiter for GovernorLimiter {
    fn try_consume(&self) -> bool {
        match self.limiter.check() {
            Ok(()) => true,
            Err(not_until) => {
                let wait = not_until.wait_time_from(DefaultClock::default().now());
                *self.last_rejection.lock() = Some((Instant::now(), wait));
                false
            }
        }
    }

    /// Remaining wait from the most recent rejection. governor cannot be
    /// queried without spending quota, so the hint is only as fresh as the
    /// last rejected call.
    fn retry_after(&self) -> Option<Duration> {
        let (seen, wait) = (*self.last_rejection.lock())?;
        let remaining = wait.saturating_sub(seen.elapsed());
        (!remaining.is_zero()).then_some(remaining)
    }
}
