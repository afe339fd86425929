//! Proxy engine: route, forward, classify, respond.

use std::sync::Arc;

use axum::body::Body;
use axum::response::{IntoResponse, Response};

use crate::error::{ProxyError, ProxyResult};
use crate::observability::{Metrics, Outcome};
use crate::proxy::request::{InboundRequest, OutboundRequest};
use crate::routing::RouteTable;
use crate::security::headers::sanitize;
use crate::upstream::{UpstreamClient, UpstreamResponse};

/// Composes the route table, the shared client and the metrics recorder.
#[derive(Clone)]
pub struct ProxyEngine {
    routes: Arc<RouteTable>,
    upstream: UpstreamClient,
    metrics: Metrics,
}

impl ProxyEngine {
    pub fn new(routes: Arc<RouteTable>, upstream: UpstreamClient, metrics: Metrics) -> Self {
        Self {
            routes,
            upstream,
            metrics,
        }
    }

    /// Proxy one inbound request. Every failure becomes a well-formed response.
    pub async fn handle(&self, inbound: InboundRequest) -> Response {
        match self.forward(inbound).await {
            Ok(response) => response,
            Err(err) => err.into_response(),
        }
    }

    async fn forward(&self, inbound: InboundRequest) -> ProxyResult<Response> {
        let route = self.routes.resolve(&inbound.path);
        let request_id = inbound.request_id().to_string();

        // No upstream identity to attribute a metric to.
        if !route.has_upstream() {
            tracing::warn!(
                request_id = %request_id,
                path = %inbound.path,
                prefix = %route.matcher.as_str(),
                "No upstream configured for route"
            );
            return Err(ProxyError::MissingUpstream {
                prefix: route.matcher.as_str().to_string(),
            });
        }

        let label = route.label;
        let outbound = OutboundRequest::build(inbound, route);

        tracing::debug!(
            request_id = %request_id,
            method = %outbound.method,
            upstream = %label,
            target = %outbound.url,
            "Proxying request"
        );

        let response = match self.upstream.send(outbound).await {
            Ok(response) => response,
            Err(err @ ProxyError::Transport { .. }) => {
                self.metrics.record_proxy_outcome(label.as_str(), Outcome::Failure);
                tracing::error!(
                    request_id = %request_id,
                    upstream = %label,
                    error = %err,
                    "Upstream request failed"
                );
                return Err(err);
            }
            Err(err) => {
                tracing::error!(
                    request_id = %request_id,
                    upstream = %label,
                    error = %err,
                    "Proxy internal fault"
                );
                return Err(err);
            }
        };

        let outcome = Outcome::from_status(response.status);
        self.metrics.record_proxy_outcome(label.as_str(), outcome);

        tracing::debug!(
            request_id = %request_id,
            upstream = %label,
            status = %response.status,
            outcome = outcome.as_str(),
            "Upstream responded"
        );

        Ok(into_inbound_response(response))
    }
}

/// Status and body verbatim, hop-by-hop headers removed.
fn into_inbound_response(upstream: UpstreamResponse) -> Response {
    let mut response = Response::new(Body::from(upstream.body));
    *response.status_mut() = upstream.status;
    *response.headers_mut() = sanitize(&upstream.headers);
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UpstreamsConfig;
    use crate::error::MISSING_UPSTREAM_BODY;
    use crate::upstream::ClientSettings;
    use axum::body::{to_bytes, Bytes};
    use axum::http::{HeaderMap, Method, StatusCode};

    fn engine(locations: &str, legacy: &str) -> (ProxyEngine, Metrics) {
        let routes = Arc::new(RouteTable::from_config(&UpstreamsConfig {
            legacy_base_url: legacy.into(),
            locations_base_url: locations.into(),
            routes: Vec::new(),
        }));
        let metrics = Metrics::new();
        let upstream = UpstreamClient::new(ClientSettings::default());
        upstream.start().unwrap();
        (ProxyEngine::new(routes, upstream, metrics.clone()), metrics)
    }

    fn get(path: &str) -> InboundRequest {
        InboundRequest::new(Method::GET, &path.parse().unwrap(), HeaderMap::new(), Bytes::new())
    }

    #[tokio::test]
    async fn missing_origin_short_circuits_without_metric() {
        let (engine, metrics) = engine("", "http://127.0.0.1:1");
        let response = engine.handle(get("/locations/1")).await;

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], MISSING_UPSTREAM_BODY.as_bytes());
        assert!(!metrics.render().contains("gateway_proxy_requests_total{"));
    }

    #[tokio::test]
    async fn uninitialized_client_is_internal_error() {
        let routes = Arc::new(RouteTable::from_config(&UpstreamsConfig::default()));
        let metrics = Metrics::new();
        let upstream = UpstreamClient::new(ClientSettings::default());
        let engine = ProxyEngine::new(routes, upstream, metrics.clone());

        let response = engine.handle(get("/anything")).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!metrics.render().contains("gateway_proxy_requests_total{"));
    }
}
