//! Response data transfer objects for the REST API.

use serde::{Deserialize, Serialize};

pub use tollgate_core::Message;

/// Response body for `GET /health`.
///
/// Reports the construction-time limiter settings, never the live token
/// count: bucket state is only read inside the limiter's own critical section.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub capacity: u32,
    pub refill_rate: f64,
}
