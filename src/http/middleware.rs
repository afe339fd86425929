//! Request instrumentation middleware.

use std::time::Instant;

use axum::{
    body::Body,
    extract::{MatchedPath, State},
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::observability::Metrics;

/// Record count and latency of every handled request.
pub async fn track_http_metrics(
    State(metrics): State<Metrics>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let start_time = Instant::now();
    let method = request.method().to_string();
    let handler = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| "none".to_string());

    let response = next.run(request).await;

    metrics.record_request(&method, &handler, response.status(), start_time);
    response
}
