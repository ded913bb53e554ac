//! tollgate-server — HTTP server for tollgate.
//!
//! Serves a demo endpoint behind a process-wide token bucket.
//! The limiter itself lives in `tollgate-core`.

/// REST API layer: Axum router, handlers, rate-limit middleware, models, metrics.
pub mod api;
