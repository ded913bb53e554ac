//! Construction errors for rate limiters.
//!
//! Capacity exhaustion is not an error: [`crate::RateLimiter::try_consume`]
//! reports it as `false`. Only invalid construction parameters land here.

use thiserror::Error;

/// Rejected limiter parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BucketError {
    /// Capacity must be between 1 and [`crate::config::MAX_CAPACITY`].
    #[error("capacity must be between 1 and {max}, got {got}")]
    InvalidCapacity { got: u32, max: u32 },

    /// Refill rate must be finite and at least one nano-token per second.
    #[error("refill rate must be a finite number >= {min} tokens/s, got {got}")]
    InvalidRefillRate { got: f64, min: f64 },

    #[error("unknown rate limit strategy {0:?}, expected \"token-bucket\" or \"governor\"")]
    UnknownStrategy(String),
}
