//! Request handlers.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::http::server::AppState;
use crate::proxy::InboundRequest;

/// Liveness probe, answered locally.
pub async fn healthz() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Prometheus scrape endpoint. Independent of upstream client state.
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; version=0.0.4; charset=utf-8"),
        )],
        state.metrics.render(),
    )
}

/// Main proxy handler. The body is buffered up to the configured limit.
pub async fn proxy(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let inbound = InboundRequest::new(method, &uri, headers, body);
    state.engine.handle(inbound).await
}
