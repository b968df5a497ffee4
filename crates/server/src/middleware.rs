//! Request logging middleware.

use std::time::Instant;

use axum::{body::Body, http::Request, middleware::Next, response::Response};

/// Requests slower than this are logged at WARN.
const SLOW_REQUEST_MS: u128 = 100;

/// Logs method, path, status and duration of every request.
pub async fn log_requests(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    let duration_ms = start.elapsed().as_millis();
    let status = response.status().as_u16();

    if duration_ms > SLOW_REQUEST_MS {
        tracing::warn!(method = %method, path = %path, status, duration_ms, "Slow request");
    } else {
        tracing::debug!(method = %method, path = %path, status, duration_ms, "Request completed");
    }

    response
}
