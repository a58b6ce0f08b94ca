mod common;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use tower::ServiceExt;

use collection_tracking::api::create_api_router;
use collection_tracking::services::{JwtConfig, JwtService};

use common::{spawn_app, test_config, TestApp};

fn router(app: &TestApp) -> Router {
    create_api_router().with_state(app.state.clone())
}

async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = router(app).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn assert_uniform_rejection(status: StatusCode, body: &serde_json::Value) {
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Authentication failed");
    assert_eq!(body["code"], "AUTHENTICATION_FAILED");
}

#[tokio::test]
async fn test_ws_without_token_is_401() {
    let app = spawn_app().await;
    let (status, body) = send(&app, get("/ws")).await;
    assert_uniform_rejection(status, &body);
}

#[tokio::test]
async fn test_ws_with_bad_query_token_is_401() {
    let app = spawn_app().await;
    let (status, body) = send(&app, get("/ws?token=garbage")).await;
    assert_uniform_rejection(status, &body);
}

#[tokio::test]
async fn test_ws_with_bad_bearer_is_401() {
    let app = spawn_app().await;
    let request = Request::builder()
        .uri("/ws")
        .header(header::AUTHORIZATION, "Bearer garbage")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_uniform_rejection(status, &body);
}

#[tokio::test]
async fn test_ws_with_unknown_user_is_401() {
    let app = spawn_app().await;
    let token = JwtService::new(JwtConfig::from(&test_config()))
        .generate_access_token(uuid::Uuid::new_v4())
        .unwrap();
    let (status, body) = send(&app, get(&format!("/ws?token={}", token))).await;
    assert_uniform_rejection(status, &body);
}

#[tokio::test]
async fn test_ws_valid_credentials_pass_the_handshake() {
    let app = spawn_app().await;
    let token = JwtService::new(JwtConfig::from(&test_config()))
        .generate_access_token(app.hauler.user_id)
        .unwrap();

    // sin cabeceras de upgrade falla después de autenticar, nunca con 401
    let (status, _) = send(&app, get(&format!("/ws?token={}", token))).await;
    assert_ne!(status, StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .uri("/ws")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_ne!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_bearer_header_wins_over_query_token() {
    let app = spawn_app().await;
    let token = JwtService::new(JwtConfig::from(&test_config()))
        .generate_access_token(app.hauler.user_id)
        .unwrap();

    let request = Request::builder()
        .uri(format!("/ws?token={}", token))
        .header(header::AUTHORIZATION, "Bearer garbage")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_uniform_rejection(status, &body);
}

#[tokio::test]
async fn test_health_reports_counters() {
    let app = spawn_app().await;

    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["connections"], 0);
    assert_eq!(body["topics"], 0);
    assert!(body["timestamp"].is_string());

    let client = app.connect(&app.dispatcher_user).await;
    app.state
        .tracking
        .track_route(&client.conn, common::ROUTE_ID)
        .await
        .unwrap();

    let (_, body) = send(&app, get("/health")).await;
    assert_eq!(body["connections"], 1);
    // user:<id> y route:<routeId>
    assert_eq!(body["topics"], 2);
}
