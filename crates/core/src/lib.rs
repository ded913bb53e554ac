//! # tollgate-core
//!
//! Process-local rate limiting primitives: a lazily refilled token bucket, a
//! `governor`-backed alternative, the strategy-agnostic [`RateLimiter`]
//! capability, and the JSON [`Message`] payload written by the HTTP layer.
//!
//! This crate needs no async runtime, so the limiters can be embedded in
//! any server, not only the axum one in `tollgate-server`.

/// Monotonic time sources: the system clock and a manually driven clock for tests.
pub mod clock;
/// Default limits, demo configuration, and fixed-point scale.
pub mod config;
/// Construction errors for rate limiters.
pub mod error;
/// GCRA limiter backed by the `governor` crate.
pub mod governed;
/// The `RateLimiter` capability consumed by the HTTP middleware.
pub mod limiter;
/// Response payload shared by the endpoint and the rejection writer.
pub mod message;
/// Token bucket with continuous lazy refill and fixed-point accounting.
pub mod token_bucket;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use error::BucketError;
pub use governed::GovernorLimiter;
pub use limiter::{RateLimiter, Strategy};
pub use message::Message;
pub use token_bucket::TokenBucket;
