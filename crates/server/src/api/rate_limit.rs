//! Rate limiting middleware.
//!
//! Calls [`RateLimiter::try_consume`] exactly once per request. On success the
//! request is handed to the inner service untouched and its response is
//! returned as is. On failure the inner service is never called and a 429
//! with the capacity-exceeded [`Message`](tollgate_core::Message) is written
//! instead.
//!
//! The middleware is strategy-agnostic: it only sees `Arc<dyn RateLimiter>`.
//! Attach it with `route_layer(middleware::from_fn_with_state(limiter,
//! rate_limit_middleware))` so unmatched paths are not charged.

use crate::api::errors::ApiError;
use crate::api::metrics;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;
use std::time::Duration;
use tollgate_core::RateLimiter;

/// Admit or reject one request against the shared limiter.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<dyn RateLimiter>>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if limiter.try_consume() {
        metrics::record_rate_limit_decision(true);
        return Ok(next.run(req).await);
    }

    metrics::record_rate_limit_decision(false);
    let retry_after = limiter.retry_after();
    tracing::debug!(
        method = %req.method(),
        path = %req.uri().path(),
        retry_after_ms = retry_after.map(millis_saturating),
        "rate limit exceeded"
    );
    Err(ApiError::TooManyRequests { retry_after })
}

fn millis_saturating(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, StatusCode};
    use axum::routing::get;
    use axum::{middleware, Router};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tollgate_core::{ManualClock, TokenBucket};
    use tower::ServiceExt;

    const REJECTION: &str =
        r#"{"status":"Request Failed","body":"The API is at capacity, try again later."}"#;

    /// Router whose handler counts how often it actually ran.
    fn limited_app(limiter: Arc<dyn RateLimiter>) -> (Router, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let app = Router::new()
            .route(
                "/ping",
                get(move || {
                    let counter = Arc::clone(&counter);
                    async move {
                        counter.fetch_add(1, Ordering::SeqCst);
                        ([("x-handler", "ran")], "pong")
                    }
                }),
            )
            .route_layer(middleware::from_fn_with_state(
                limiter,
                rate_limit_middleware,
            ));
        (app, calls)
    }

    fn manual_bucket(capacity: u32, rate: f64) -> (Arc<dyn RateLimiter>, ManualClock) {
        let clock = ManualClock::new();
        let bucket = TokenBucket::with_clock(capacity, rate, Arc::new(clock.clone())).unwrap();
        (Arc::new(bucket), clock)
    }

    async fn get_ping(app: &Router) -> Response {
        app.clone()
            .oneshot(
                axum::http::Request::builder()
                    .uri("/ping")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_allowed_request_passes_through_unchanged() {
        let (limiter, _clock) = manual_bucket(1, 1.0);
        let (app, calls) = limited_app(limiter);

        let resp = get_ping(&app).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["x-handler"], "ran");
        assert!(resp.headers().get(header::RETRY_AFTER).is_none());
        assert_eq!(
            resp.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"pong");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_rejected_request_never_reaches_handler() {
        let (limiter, _clock) = manual_bucket(2, 2.0);
        let (app, calls) = limited_app(limiter);

        let statuses: Vec<StatusCode> = {
            let mut out = Vec::new();
            for _ in 0..5 {
                out.push(get_ping(&app).await.status());
            }
            out
        };
        assert_eq!(
            statuses,
            vec![
                StatusCode::OK,
                StatusCode::OK,
                StatusCode::TOO_MANY_REQUESTS,
                StatusCode::TOO_MANY_REQUESTS,
                StatusCode::TOO_MANY_REQUESTS,
            ]
        );
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_rejection_body_is_stable() {
        let (limiter, clock) = manual_bucket(1, 2.0);
        let (app, _calls) = limited_app(limiter);
        assert_eq!(get_ping(&app).await.status(), StatusCode::OK);

        for _ in 0..3 {
            clock.advance(Duration::from_millis(100));
            let resp = get_ping(&app).await;
            assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
            assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/json");
            assert_eq!(resp.headers()[header::RETRY_AFTER], "1");
            let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
            assert_eq!(&body[..], REJECTION.as_bytes());
        }
    }

    #[tokio::test]
    async fn test_recovers_once_clock_advances() {
        let (limiter, clock) = manual_bucket(4, 2.0);
        let (app, calls) = limited_app(limiter);
        for _ in 0..4 {
            assert_eq!(get_ping(&app).await.status(), StatusCode::OK);
        }
        assert_eq!(get_ping(&app).await.status(), StatusCode::TOO_MANY_REQUESTS);

        clock.advance(Duration::from_millis(600));
        assert_eq!(get_ping(&app).await.status(), StatusCode::OK);
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    struct DenyAll;

    impl RateLimiter for DenyAll {
        fn try_consume(&self) -> bool {
            false
        }
    }

    #[tokio::test]
    async fn test_strategy_without_hint_omits_retry_after() {
        let (app, calls) = limited_app(Arc::new(DenyAll));
        let resp = get_ping(&app).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(resp.headers().get(header::RETRY_AFTER).is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_logged_wait_saturates_for_huge_hints() {
        assert_eq!(millis_saturating(Duration::from_micros(1_500)), 1);
        assert_eq!(millis_saturating(Duration::from_secs(3)), 3_000);
        assert_eq!(millis_saturating(Duration::MAX), u64::MAX);
    }

    struct HugeHint;

    impl RateLimiter for HugeHint {
        fn try_consume(&self) -> bool {
            false
        }

        fn retry_after(&self) -> Option<Duration> {
            Some(Duration::MAX)
        }
    }

    #[tokio::test]
    async fn test_huge_retry_hint_still_rejects_cleanly() {
        let (app, calls) = limited_app(Arc::new(HugeHint));
        let resp = get_ping(&app).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(resp.headers().get(header::RETRY_AFTER).is_some());
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], REJECTION.as_bytes());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
