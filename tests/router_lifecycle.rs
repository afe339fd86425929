//! In-process tests of the router around the upstream client lifecycle.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use sandbox_gateway::HttpServer;

mod common;

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_probes_answer_before_client_start() {
    let server = HttpServer::new(common::config("http://127.0.0.1:9", "http://127.0.0.1:9"));
    assert!(!server.upstream().is_ready());

    let res = server.router().oneshot(get("/healthz")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = server.router().oneshot(get("/metrics")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&body).contains("http_requests_total"));
}

#[tokio::test]
async fn test_proxy_before_client_start_is_internal_error() {
    let (legacy_addr, hits) = common::start_recording_backend(StatusCode::OK, "ok").await;
    let server = HttpServer::new(common::config(&format!("http://{legacy_addr}"), ""));

    let res = server.router().oneshot(get("/anything")).await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(hits.lock().unwrap().is_empty());
    assert!(!server.metrics().render().contains("gateway_proxy_requests_total{"));
}

#[tokio::test]
async fn test_proxy_after_start_and_shutdown() {
    let (legacy_addr, hits) = common::start_recording_backend(StatusCode::OK, "ok").await;
    let server = HttpServer::new(common::config(&format!("http://{legacy_addr}"), ""));

    server.upstream().start().unwrap();
    let res = server.router().oneshot(get("/anything?page=2")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(hits.lock().unwrap()[0].uri.to_string(), "/anything?page=2");
    assert_eq!(common::proxy_sample(&server.metrics().render(), "legacy", "success"), 1);

    server.upstream().shutdown();
    let res = server.router().oneshot(get("/anything")).await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_custom_route_label() {
    let (legacy_addr, _) = common::start_recording_backend(StatusCode::OK, "legacy").await;
    let (custom_addr, custom_hits) =
        common::start_recording_backend(StatusCode::ACCEPTED, "queued").await;
    let mut config = common::config(&format!("http://{legacy_addr}"), "");
    config.upstreams.routes.push(sandbox_gateway::config::RouteConfig {
        path_prefix: "/notifications".into(),
        base_url: format!("http://{custom_addr}"),
    });
    let server = HttpServer::new(config);
    server.upstream().start().unwrap();

    let req = Request::builder()
        .method("POST")
        .uri("/notifications/send")
        .body(Body::from("hello"))
        .unwrap();
    let res = server.router().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::ACCEPTED);
    assert_eq!(&custom_hits.lock().unwrap()[0].body[..], b"hello");
    assert_eq!(common::proxy_sample(&server.metrics().render(), "custom", "success"), 1);
}
