//! Global configuration constants for tollgate.
//!
//! These are compile-time defaults; runtime configuration is handled via CLI
//! arguments and environment variables in the server's `main.rs`.

/// Default bucket capacity (burst size).
///
/// Matches the demo configuration: four requests may arrive back to back
/// before refill pacing takes over.
pub const DEFAULT_CAPACITY: u32 = 4;

/// Default refill rate in tokens per second.
pub const DEFAULT_REFILL_RATE: f64 = 2.0;

/// Default HTTP server port.
pub const DEFAULT_PORT: u16 = 8080;

/// Fixed-point units per whole token.
///
/// Token counts are stored as integer micro-tokens.
pub const MICRO_TOKENS_PER_TOKEN: u64 = 1_000_000;

/// Refill rates are stored as integer nano-tokens per second, rounded up.
pub const NANO_TOKENS_PER_TOKEN: u64 = 1_000_000_000;

/// Smallest accepted refill rate in tokens per second (one nano-token per second).
pub const MIN_REFILL_RATE: f64 = 1.0 / NANO_TOKENS_PER_TOKEN as f64;

/// Nanoseconds per second, used when converting elapsed clock time to tokens.
pub const NANOS_PER_SEC: u128 = 1_000_000_000;

/// One micro-token in refill units (elapsed nanoseconds times nano-tokens per second).
pub const REFILL_UNITS_PER_MICRO_TOKEN: u128 =
    NANOS_PER_SEC * (NANO_TOKENS_PER_TOKEN / MICRO_TOKENS_PER_TOKEN) as u128;

/// Maximum accepted bucket capacity.
///
/// Keeps `capacity * MICRO_TOKENS_PER_TOKEN` comfortably inside `u64`.
pub const MAX_CAPACITY: u32 = 1_000_000;

/// Message status for a request that reached the endpoint.
pub const STATUS_SUCCESSFUL: &str = "Successful";

/// Message status for a rejected request.
pub const STATUS_FAILED: &str = "Request Failed";

/// Body written when the bucket has no whole token left.
pub const CAPACITY_EXCEEDED_BODY: &str = "The API is at capacity, try again later.";
