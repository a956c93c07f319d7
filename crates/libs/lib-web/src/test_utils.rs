//! Shared helpers for handler tests: an app over an in-memory database and
//! small request/response utilities.

use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use lib_auth::RateLimitPolicy;
use lib_core::{memory_pool, Config};
use serde_json::Value;
use tower::ServiceExt;

use crate::middleware::AUTH_TOKEN_COOKIE;
use crate::server::{create_router, AppState};

pub fn test_config(admin_secret: Option<&str>) -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test-secret-key-must-be-at-least-32-characters-long!".to_string(),
        session_ttl_hours: 168,
        admin_enable_secret: admin_secret.map(str::to_string),
        cookie_secure: false,
        login_limit: RateLimitPolicy::LOGIN,
        register_limit: RateLimitPolicy::REGISTER,
    }
}

pub async fn test_app() -> (Router, AppState) {
    test_app_with_admin_secret(Some("let-me-in")).await
}

pub async fn test_app_with_admin_secret(admin_secret: Option<&str>) -> (Router, AppState) {
    let pool = memory_pool().await.unwrap();
    let state = AppState::new(pool, test_config(admin_secret)).unwrap();
    (create_router(state.clone(), &[]), state)
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub fn json_request(method: &str, uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::COOKIE, format!("{AUTH_TOKEN_COOKIE}={token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::COOKIE, format!("{AUTH_TOKEN_COOKIE}={token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Non-empty session token set by the response, if any.
pub fn session_token(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.strip_prefix(&format!("{AUTH_TOKEN_COOKIE}=")).map(str::to_string))
        .filter_map(|rest| rest.split(';').next().map(str::to_string))
        .find(|token| !token.is_empty())
}

/// Register through the API and return the session token.
pub async fn register_account(app: &Router, email: &str, password: &str) -> String {
    let mut request = json_request(
        "POST",
        "/api/auth/register",
        serde_json::json!({"name": "Test User", "email": email, "password": password}),
        None,
    );
    // Own limiter bucket per account so helpers never trip the register limit
    request
        .headers_mut()
        .insert("x-forwarded-for", format!("register-{email}").parse().unwrap());

    let response = send(app, request).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    session_token(&response).unwrap()
}
