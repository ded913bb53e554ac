//! API error types mapped to HTTP status codes.
//!
//! Every [`ApiError`] renders a [`Message`] body with status `"Request Failed"`,
//! so clients see one JSON shape whether the request was rate limited or
//! routed nowhere.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::time::Duration;
use tollgate_core::Message;

/// Application-level error type that implements `IntoResponse`.
///
/// - `TooManyRequests` → 429 (with `Retry-After` when a hint is known)
/// - `NotFound` → 404
#[derive(Debug)]
pub enum ApiError {
    /// The limiter refused the request (429). Expected outcome, not a fault.
    TooManyRequests { retry_after: Option<Duration> },
    /// No route matched (404).
    NotFound(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::TooManyRequests { retry_after } => {
                let mut resp = (
                    StatusCode::TOO_MANY_REQUESTS,
                    Json(Message::capacity_exceeded()),
                )
                    .into_response();
                if let Some(wait) = retry_after {
                    resp.headers_mut().insert(
                        header::RETRY_AFTER,
                        HeaderValue::from(retry_after_secs(wait)),
                    );
                }
                resp
            }
            ApiError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, Json(Message::failure(msg))).into_response()
            }
        }
    }
}

/// `Retry-After` carries whole seconds; round up and never advertise 0.
fn retry_after_secs(wait: Duration) -> u64 {
    let secs = wait
        .as_secs()
        .saturating_add(u64::from(wait.subsec_nanos() > 0));
    secs.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_after_rounds_up() {
        assert_eq!(retry_after_secs(Duration::ZERO), 1);
        assert_eq!(retry_after_secs(Duration::from_millis(1)), 1);
        assert_eq!(retry_after_secs(Duration::from_millis(500)), 1);
        assert_eq!(retry_after_secs(Duration::from_secs(2)), 2);
        assert_eq!(retry_after_secs(Duration::from_millis(2001)), 3);
        assert_eq!(retry_after_secs(Duration::MAX), u64::MAX);
    }

    #[test]
    fn test_too_many_requests_response() {
        let resp = ApiError::TooManyRequests {
            retry_after: Some(Duration::from_millis(500)),
        }
        .into_response();
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(resp.headers()[header::RETRY_AFTER], "1");
    }

    #[test]
    fn test_too_many_requests_without_hint_has_no_retry_after() {
        let resp = ApiError::TooManyRequests { retry_after: None }.into_response();
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(resp.headers().get(header::RETRY_AFTER).is_none());
    }

    #[test]
    fn test_not_found_response() {
        let resp = ApiError::NotFound("Not found".into()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
