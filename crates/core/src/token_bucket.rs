//! Token bucket rate limiter with continuous lazy refill.
//!
//! The bucket starts full and refills at `refill_rate` tokens per second up to
//! `capacity`. There is no background timer: tokens owed since the last
//! accounting are credited inside each call, under the same lock that
//! decides the outcome.
//!
//! Counts are fixed point (micro-tokens) and the rate is held in nano-tokens
//! per second, rounded up so that waiting `1 / refill_rate` always yields a
//! token. The sub-micro-token remainder of every refill is carried forward, so
//! frequent callers never lose credit to rounding. The carry is dropped only
//! when the bucket is clamped at capacity.

use crate::clock::{Clock, MonotonicClock};
use crate::config::{MICRO_TOKENS_PER_TOKEN, NANO_TOKENS_PER_TOKEN, REFILL_UNITS_PER_MICRO_TOKEN};
use crate::error::BucketError;
use crate::limiter::{validate_parameters, RateLimiter};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// A thread-safe token bucket.
///
/// Capacity and refill rate are fixed for the bucket's lifetime.
/// Each [`try_consume`](TokenBucket::try_consume) call takes exactly one whole token.
#[derive(Debug)]
pub struct TokenBucket {
    state: Mutex<BucketState>,
    capacity: u32,
    /// `capacity` in micro-tokens.
    capacity_micro: u64,
    /// Refill rate as configured, in tokens per second.
    refill_rate: f64,
    /// Refill rate in nano-tokens per second, never below the configured rate.
    rate_nano: u128,
    clock: Arc<dyn Clock>,
}

#[derive(Debug)]
struct BucketState {
    /// Available micro-tokens, `0..=capacity_micro`.
    tokens: u64,
    /// Refill remainder in refill units, always `< REFILL_UNITS_PER_MICRO_TOKEN`.
    carry: u128,
    last_refill: Duration,
}

impl TokenBucket {
    /// Create a full bucket driven by the system monotonic clock.
    pub fn new(capacity: u32, refill_rate: f64) -> Result<Self, BucketError> {
        Self::with_clock(capacity, refill_rate, Arc::new(MonotonicClock::new()))
    }

    /// Create a full bucket driven by `clock`.
    pub fn with_clock(
        capacity: u32,
        refill_rate: f64,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, BucketError> {
        validate_parameters(capacity, refill_rate)?;

        // Saturating float-to-int cast. Rounding up keeps every wait at or
        // below the one implied by the configured rate.
        let rate_nano = ((refill_rate * NANO_TOKENS_PER_TOKEN as f64).ceil() as u128).max(1);
        let capacity_micro = u64::from(capacity) * MICRO_TOKENS_PER_TOKEN;
        let now = clock.now();

        Ok(Self {
            state: Mutex::new(BucketState {
                tokens: capacity_micro,
                carry: 0,
                last_refill: now,
            }),
            capacity,
            capacity_micro,
            refill_rate,
            rate_nano,
            clock,
        })
    }

    /// Maximum number of whole tokens (burst size).
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Refill rate in tokens per second, as configured.
    pub fn refill_rate(&self) -> f64 {
        self.refill_rate
    }

    /// Take one token if available. Returns `true` if allowed, `false` if rate limited.
    pub fn try_consume(&self) -> bool {
        let now = self.clock.now();
        let mut state = self.state.lock();
        self.refill(&mut state, now);
        if state.tokens >= MICRO_TOKENS_PER_TOKEN {
            state.tokens -= MICRO_TOKENS_PER_TOKEN;
            true
        } else {
            false
        }
    }

    /// Time until one whole token will be available, or `None` if one is
    /// available now. Applies pending refill but never consumes.
    pub fn retry_after(&self) -> Option<Duration> {
        let now = self.clock.now();
        let mut state = self.state.lock();
        self.refill(&mut state, now);
        if state.tokens >= MICRO_TOKENS_PER_TOKEN {
            return None;
        }
        let missing = u128::from(MICRO_TOKENS_PER_TOKEN - state.tokens);
        let owed = missing * REFILL_UNITS_PER_MICRO_TOKEN - state.carry;
        let nanos = owed.div_ceil(self.rate_nano);
        Some(Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX)))
    }

    /// Credit tokens earned since `last_refill`. Must be called with the lock held.
    fn refill(&self, state: &mut BucketState, now: Duration) {
        // A clock reading earlier than the last one credits nothing and does
        // not move `last_refill` back, so the same interval is never paid twice.
        let elapsed = now.saturating_sub(state.last_refill);
        state.last_refill = state.last_refill.max(now);

        if state.tokens >= self.capacity_micro {
            state.carry = 0;
            return;
        }

        let owed = elapsed
            .as_nanos()
            .saturating_mul(self.rate_nano)
            .saturating_add(state.carry);
        let earned = owed / REFILL_UNITS_PER_MICRO_TOKEN;
        let total = u128::from(state.tokens) + earned;

        if total >= u128::from(self.capacity_micro) {
            state.tokens = self.capacity_micro;
            state.carry = 0;
        } else {
            // total < capacity_micro, which fits in u64.
            state.tokens = total as u64;
            state.carry = owed % REFILL_UNITS_PER_MICRO_TOKEN;
        }
    }

    #[cfg(test)]
    fn tokens_micro(&self) -> u64 {
        self.state.lock().tokens
    }
}

impl RateLimiter for TokenBucket {
    fn try_consume(&self) -> bool {
        TokenBucket::try_consume(self)
    }

    fn retry_after(&self) -> Option<Duration> {
        TokenBucket::retry_after(self)
    }
}
