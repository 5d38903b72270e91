//! Routing, gating and rejection paths that finish before any query runs.

use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use axum::response::Response;
use sea_orm::DatabaseConnection;
use tower::ServiceExt as _;

use moviewatch_api::router::build_router;
use moviewatch_api::state::AppState;
use moviewatch_core::middleware::REQUEST_ID_HEADER;
use moviewatch_testing::auth::{MockAuth, TEST_JWT_SECRET};
use moviewatch_testing::body::json_body;

fn app() -> Router {
    build_router(AppState {
        db: DatabaseConnection::Disconnected,
        jwt_secret: TEST_JWT_SECRET.into(),
        token_ttl: Duration::from_secs(900),
    })
}

async fn send(request: Request<Body>) -> Response {
    app().oneshot(request).await.unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn with_auth(method: Method, uri: &str, authorization: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, authorization)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn assert_error(response: Response, status: StatusCode, kind: &str) -> serde_json::Value {
    assert_eq!(response.status(), status);
    let json = json_body(response).await;
    assert_eq!(json["kind"], kind);
    json
}

// ── Public endpoints ─────────────────────────────────────────────────────────

#[tokio::test]
async fn should_report_health() {
    let response = send(get("/health")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, serde_json::json!({"status": "ok"}));
}

#[tokio::test]
async fn should_serve_banner_at_root() {
    let response = send(get("/")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(String::from_utf8_lossy(&bytes).starts_with("moviewatch api"));
}

#[tokio::test]
async fn should_stamp_request_id() {
    let response = send(get("/health")).await;
    assert!(response.headers().contains_key(REQUEST_ID_HEADER));

    let response = send(
        Request::builder()
            .uri("/health")
            .header(REQUEST_ID_HEADER, "req-123")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.headers()[REQUEST_ID_HEADER], "req-123");
}

#[tokio::test]
async fn should_return_json_404_for_unknown_routes() {
    for uri in ["/nope", "/api/nope", "/api/movies/1/extra"] {
        let json = assert_error(send(get(uri)).await, StatusCode::NOT_FOUND, "ROUTE_NOT_FOUND").await;
        assert_eq!(json["message"], "route not found");
    }
}

// ── Authentication gates ─────────────────────────────────────────────────────

#[tokio::test]
async fn should_require_token_on_protected_routes() {
    for (method, uri) in [
        (Method::GET, "/api/users"),
        (Method::GET, "/api/users/1"),
        (Method::POST, "/api/movies"),
        (Method::DELETE, "/api/movies/1"),
        (Method::POST, "/api/reviews"),
        (Method::GET, "/api/watchlists"),
        (Method::DELETE, "/api/watchlists/1/movies/2"),
    ] {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        assert_error(send(request).await, StatusCode::UNAUTHORIZED, "MISSING_TOKEN").await;
    }
}

#[tokio::test]
async fn should_reject_non_bearer_scheme() {
    let response = send(with_auth(Method::GET, "/api/watchlists", "Basic dXNlcjpwYXNz")).await;
    assert_error(response, StatusCode::UNAUTHORIZED, "INVALID_TOKEN").await;
}

#[tokio::test]
async fn should_reject_expired_and_forged_tokens() {
    let expired = format!("Bearer {}", MockAuth::user(1).expired_token());
    let response = send(with_auth(Method::GET, "/api/watchlists", &expired)).await;
    assert_error(response, StatusCode::UNAUTHORIZED, "INVALID_TOKEN").await;

    let response = send(with_auth(Method::DELETE, "/api/movies/1", "Bearer forged.token.value")).await;
    assert_error(response, StatusCode::UNAUTHORIZED, "INVALID_TOKEN").await;
}

#[tokio::test]
async fn should_reject_invalid_token_on_optional_route() {
    let response = send(with_auth(Method::GET, "/api/watchlists/1", "Bearer garbage")).await;
    assert_error(response, StatusCode::UNAUTHORIZED, "INVALID_TOKEN").await;
}

// ── Input validation ─────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_out_of_range_pagination() {
    let response = send(get("/api/movies?page=0")).await;
    let json = assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_FAILED").await;
    assert_eq!(json["errors"][0]["field"], "page");

    let response = send(get("/api/movies?limit=500")).await;
    let json = assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_FAILED").await;
    assert_eq!(json["errors"][0]["field"], "limit");
}

#[tokio::test]
async fn should_reject_non_numeric_ids() {
    let response = send(get("/api/movies/abc")).await;
    assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_FAILED").await;
}

#[tokio::test]
async fn should_report_every_invalid_registration_field() {
    let response = send(post_json(
        "/api/users/register",
        serde_json::json!({"username": "x!", "email": "not-an-email", "password": "123"}),
    ))
    .await;
    let json = assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_FAILED").await;
    let fields: Vec<&str> = json["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"username"));
    assert!(fields.contains(&"email"));
    assert!(fields.contains(&"password"));
}

#[tokio::test]
async fn should_reject_malformed_login_body() {
    let response = send(
        Request::builder()
            .method(Method::POST)
            .uri("/api/users/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap(),
    )
    .await;
    let json = assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_FAILED").await;
    assert_eq!(json["errors"][0]["field"], "body");
}
