//! Prometheus metrics recording.

use metrics::{counter, gauge, histogram};
use std::time::Duration;

/// Records HTTP request metrics.
pub fn record_request(method: &str, path: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", path.to_string()),
        ("status", status.to_string()),
    ];
    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());
}

/// Records one limiter decision.
pub fn record_rate_limit_decision(allowed: bool) {
    let outcome = if allowed { "allowed" } else { "rejected" };
    counter!("tollgate_rate_limit_decisions_total", "outcome" => outcome).increment(1);
}

/// Publishes the fixed limiter settings as gauges. Called once at startup.
pub fn record_bucket_settings(capacity: u32, refill_rate: f64) {
    gauge!("tollgate_bucket_capacity").set(f64::from(capacity));
    gauge!("tollgate_bucket_refill_rate").set(refill_rate);
}
