//! Request audit logging middleware.
//!
//! Logs every request with a request id, method, path, status and latency,
//! and marks responses `Cache-Control: no-store`. Topics and generated text
//! are never logged here.

use std::time::Instant;

use axum::http::{HeaderValue, Request};
use axum::middleware::Next;
use axum::response::Response;

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Log API access and tag the response.
pub async fn log_access(req: Request<axum::body::Body>, next: Next) -> Response {
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let request_id = uuid::Uuid::new_v4().to_string();
    let started = Instant::now();

    let mut response = next.run(req).await;

    let status = response.status().as_u16();
    let elapsed_ms = started.elapsed().as_millis() as u64;
    if response.status().is_server_error() {
        tracing::warn!(%request_id, %method, %path, status, elapsed_ms, "API request failed");
    } else {
        tracing::info!(%request_id, %method, %path, status, elapsed_ms, "API request");
    }

    let headers = response.headers_mut();
    headers.insert("Cache-Control", HeaderValue::from_static("no-store"));
    if let Ok(val) = HeaderValue::from_str(&request_id) {
        headers.insert(REQUEST_ID_HEADER, val);
    }
    response
}
