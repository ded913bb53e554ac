//! The capability the HTTP layer depends on.
//!
//! The middleware never sees a concrete strategy; anything that can answer
//! "may this request proceed?" atomically can sit behind it.

use crate::config;
use crate::error::BucketError;
use crate::governed::GovernorLimiter;
use crate::token_bucket::TokenBucket;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// A process-wide admission decision.
pub trait RateLimiter: Send + Sync {
    /// Atomically take one unit of quota. Returns `false` when the caller
    /// must be rejected; never blocks waiting for quota.
    fn try_consume(&self) -> bool;

    /// How long until a rejected caller could expect to succeed.
    ///
    /// Purely advisory: it does not reserve anything. `None` means the
    /// strategy offers no hint or quota is available right now.
    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

impl<L: RateLimiter + ?Sized> RateLimiter for Arc<L> {
    fn try_consume(&self) -> bool {
        (**self).try_consume()
    }

    fn retry_after(&self) -> Option<Duration> {
        (**self).retry_after()
    }
}

/// Which limiter implementation backs the protected endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// In-crate [`TokenBucket`] with lazy refill.
    #[default]
    TokenBucket,
    /// GCRA limiter from the `governor` crate.
    Governor,
}

impl Strategy {
    /// Build a shared limiter with the given burst size and refill rate.
    pub fn build(
        self,
        capacity: u32,
        refill_rate: f64,
    ) -> Result<Arc<dyn RateLimiter>, BucketError> {
        Ok(match self {
            Strategy::TokenBucket => Arc::new(TokenBucket::new(capacity, refill_rate)?),
            Strategy::Governor => Arc::new(GovernorLimiter::new(capacity, refill_rate)?),
        })
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Strategy::TokenBucket => "token-bucket",
            Strategy::Governor => "governor",
        })
    }
}

impl FromStr for Strategy {
    type Err = BucketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "token-bucket" => Ok(Strategy::TokenBucket),
            "governor" => Ok(Strategy::Governor),
            other => Err(BucketError::UnknownStrategy(other.to_string())),
        }
    }
}

/// Shared bounds check for every strategy's construction parameters.
pub(crate) fn validate_parameters(capacity: u32, refill_rate: f64) -> Result<(), BucketError> {
    if capacity == 0 || capacity > config::MAX_CAPACITY {
        return Err(BucketError::InvalidCapacity {
            got: capacity,
            max: config::MAX_CAPACITY,
        });
    }
    if !refill_rate.is_finite() || refill_rate < config::MIN_REFILL_RATE {
        return Err(BucketError::InvalidRefillRate {
            got: refill_rate,
            min: config::MIN_REFILL_RATE,
        });
    }
    Ok(())
}
