//! REST API layer built on Axum.
//!
//! Exposes the rate-limited `/ping` endpoint plus unlimited `/health` and
//! `/metrics`, with request ID tracing and request metrics on every route.

/// API error types mapped to HTTP status codes.
pub mod errors;
/// HTTP request handlers and application state.
pub mod handlers;
/// Prometheus metrics recording.
pub mod metrics;
/// Request and response data transfer objects.
pub mod models;
/// Token bucket admission middleware.
pub mod rate_limit;

use axum::extract::{MatchedPath, Request};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use handlers::AppState;
use std::time::Instant;
use tower_http::trace::TraceLayer;
use tracing::Instrument;

async fn request_id_middleware(req: Request, next: Next) -> Response {
    let request_id = uuid::Uuid::new_v4().to_string();
    let span = tracing::info_span!("request", request_id = %request_id);
    async move {
        let mut response = next.run(req).await;
        response.headers_mut().insert(
            axum::http::HeaderName::from_static("x-request-id"),
            axum::http::HeaderValue::from_str(&request_id)
                .expect("UUID v4 is always valid ASCII for header values"),
        );
        response
    }
    .instrument(span)
    .await
}

async fn metrics_middleware(req: Request, next: Next) -> Response {
    let method = req.method().to_string();
    // Label by route template, not raw URI, to keep cardinality bounded.
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let start = Instant::now();
    let response = next.run(req).await;
    metrics::record_request(&method, &path, response.status().as_u16(), start.elapsed());
    response
}

/// Builds the Axum router with all routes and middleware layers.
///
/// Only `/ping` sits behind the limiter; it is attached with `route_layer`
/// so health checks, scrapes and 404s never spend tokens.
///
/// The middleware stack (outermost to innermost):
/// Trace → Request ID → Metrics → (on `/ping` only) Rate limit.
pub fn create_router(state: AppState) -> Router {
    let limited = Router::new()
        .route("/ping", get(handlers::ping))
        .route_layer(middleware::from_fn_with_state(
            state.limiter.clone(),
            rate_limit::rate_limit_middleware,
        ));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics_endpoint))
        .merge(limited)
        .fallback(handlers::not_found)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
