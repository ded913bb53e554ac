//! HTTP request handlers and shared application state.

use crate::api::errors::ApiError;
use crate::api::models::{HealthResponse, Message};
use axum::extract::State;
use axum::Json;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Instant;
use tollgate_core::RateLimiter;

/// Shared application state passed to every handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// The process-wide limiter guarding `/ping`.
    pub limiter: Arc<dyn RateLimiter>,
    /// Burst size the limiter was built with, for `/health`.
    pub capacity: u32,
    /// Refill rate (tokens/s) the limiter was built with, for `/health`.
    pub refill_rate: f64,
    pub prometheus_handle: PrometheusHandle,
    pub start_time: Instant,
}

impl AppState {
    /// Shares `limiter` across handlers; `capacity` and `refill_rate` are
    /// the settings it was built with.
    pub fn new(
        limiter: Arc<dyn RateLimiter>,
        capacity: u32,
        refill_rate: f64,
        prometheus_handle: PrometheusHandle,
    ) -> Self {
        Self {
            limiter,
            capacity,
            refill_rate,
            prometheus_handle,
            start_time: Instant::now(),
        }
    }
}

/// `GET /ping`
pub async fn ping() -> Json<Message> {
    Json(Message::success("pong"))
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        capacity: state.capacity,
        refill_rate: state.refill_rate,
    })
}

/// `GET /metrics`
pub async fn metrics_endpoint(State(state): State<AppState>) -> String {
    state.prometheus_handle.render()
}

/// Fallback for unmatched routes.
pub async fn not_found() -> ApiError {
    ApiError::NotFound("Not found".into())
}
