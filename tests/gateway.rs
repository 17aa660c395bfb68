use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use evco::{
    error::ErrorResponse,
    middleware::REQUEST_ID_HEADER,
    models::{HealthStatus, ServiceKind, ServiceMessage},
    services::UpstreamClient,
    startup::gateway_router,
};
use mockito::Matcher;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

const UUID_PATTERN: &str = "^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$";

fn gateway(upstreams: &[(ServiceKind, String)]) -> Router {
    let upstreams: HashMap<ServiceKind, String> = upstreams.iter().cloned().collect();
    let client = UpstreamClient::new(upstreams, Duration::from_secs(5)).unwrap();
    gateway_router(Arc::new(client))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Option<String>, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();

    let status = response.status();
    let request_id = response
        .headers()
        .get(REQUEST_ID_HEADER)
        .map(|h| h.to_str().unwrap().to_string());
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec();

    (status, request_id, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Port nobody listens on.
async fn dead_upstream() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

#[tokio::test]
async fn gateway_greets_on_root() {
    let (status, request_id, body) = send(gateway(&[]), get("/")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(request_id.is_some());
    let message: ServiceMessage = serde_json::from_slice(&body).unwrap();
    assert_eq!(message.message, "API Gateway running");
}

#[tokio::test]
async fn forwards_to_service_root_with_request_id() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/")
        .match_header(REQUEST_ID_HEADER, Matcher::Regex(UUID_PATTERN.to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message":"Vehicle Service running"}"#)
        .create_async()
        .await;

    let app = gateway(&[(ServiceKind::Vehicle, server.url())]);
    let (status, request_id, body) = send(app, get("/api/vehicle")).await;

    mock.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    assert!(request_id.is_some());
    let message: ServiceMessage = serde_json::from_slice(&body).unwrap();
    assert_eq!(message.message, "Vehicle Service running");
}

#[tokio::test]
async fn forwards_method_path_and_body() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/groups/42/rules")
        .match_header("content-type", "application/json")
        .match_body(r#"{"rule":"no smoking"}"#)
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"created":true}"#)
        .create_async()
        .await;

    let app = gateway(&[(ServiceKind::User, server.url())]);
    let request = Request::builder()
        .method("POST")
        .uri("/api/user/groups/42/rules")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"rule":"no smoking"}"#))
        .unwrap();

    let (status, _, body) = send(app, request).await;

    mock.assert_async().await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, br#"{"created":true}"#.to_vec());
}

#[tokio::test]
async fn upstream_errors_are_relayed_as_is() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/missing")
        .with_status(404)
        .with_body("nope")
        .create_async()
        .await;

    let app = gateway(&[(ServiceKind::Cost, server.url())]);
    let (status, _, body) = send(app, get("/api/cost/missing")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, b"nope".to_vec());
}

#[tokio::test]
async fn unknown_service_is_rejected() {
    let (status, request_id, body) = send(gateway(&[]), get("/api/booking/today")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(error.error_code, "SERVICE_NOT_FOUND");
    assert_eq!(Some(error.request_id), request_id);
}

#[tokio::test]
async fn unconfigured_service_is_rejected() {
    let (status, _, body) = send(gateway(&[]), get("/api/admin")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(error.error_code, "SERVICE_NOT_FOUND");
}

#[tokio::test]
async fn unreachable_upstream_is_bad_gateway() {
    let app = gateway(&[(ServiceKind::Notification, dead_upstream().await)]);
    let (status, _, body) = send(app, get("/api/notification")).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(error.error_code, "UPSTREAM_ERROR");
}

#[tokio::test]
async fn health_reports_each_upstream() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/")
        .with_status(200)
        .with_body(r#"{"message":"Vehicle Service running"}"#)
        .create_async()
        .await;

    let app = gateway(&[
        (ServiceKind::Vehicle, server.url()),
        (ServiceKind::Admin, dead_upstream().await),
    ]);
    let (status, _, body) = send(app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    let health: HealthStatus = serde_json::from_slice(&body).unwrap();
    assert_eq!(health.status, "degraded");
    assert_eq!(health.service, "gateway");

    let upstreams = health.upstreams.expect("upstream map");
    assert_eq!(upstreams.get("vehicle"), Some(&true));
    assert_eq!(upstreams.get("admin"), Some(&false));
}

#[tokio::test]
async fn encoded_segments_reach_upstream_unchanged() {
    let mut server = mockito::Server::new_async().await;
    let exact = server
        .mock("GET", "/files/a%3Fb")
        .with_status(200)
        .with_body("exact")
        .create_async()
        .await;
    let split = server
        .mock("GET", "/files/a")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("split")
        .expect(0)
        .create_async()
        .await;

    let app = gateway(&[(ServiceKind::User, server.url())]);
    let (status, _, body) = send(app, get("/api/user/files/a%3Fb")).await;

    exact.assert_async().await;
    split.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"exact".to_vec());
}

#[tokio::test]
async fn trailing_slash_forwards_to_service_root() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/")
        .with_status(200)
        .with_body(r#"{"message":"User Service running"}"#)
        .create_async()
        .await;

    let app = gateway(&[(ServiceKind::User, server.url())]);
    let (status, _, body) = send(app, get("/api/user/")).await;

    mock.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    let message: ServiceMessage = serde_json::from_slice(&body).unwrap();
    assert_eq!(message.message, "User Service running");
}

#[tokio::test]
async fn paths_outside_api_are_not_found() {
    let (status, _, body) = send(gateway(&[]), get("/bookings")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(error.error_code, "NOT_FOUND");
}

#[tokio::test]
async fn health_without_upstreams_is_unhealthy() {
    let (status, _, body) = send(gateway(&[]), get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    let health: HealthStatus = serde_json::from_slice(&body).unwrap();
    assert_eq!(health.status, "unhealthy");
    assert_eq!(health.upstreams, Some(Default::default()));
}
