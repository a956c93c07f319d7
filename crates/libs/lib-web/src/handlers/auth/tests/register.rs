//! # Register Tests

use axum::http::StatusCode;
use serde_json::json;

use crate::test_utils::{body_json, json_request, send, session_token, test_app};

#[tokio::test]
async fn test_register_success_sets_cookie() {
    let (app, _state) = test_app().await;

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/auth/register",
            json!({"name": "Ana", "email": " Ana@Example.com ", "password": "hunter22"}),
            None,
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);

    let set_cookie = response
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with("auth_token="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));
    assert!(set_cookie.contains("Path=/"));
    assert!(set_cookie.contains("Max-Age=604800"));
    assert!(!set_cookie.contains("Secure"));

    let body = body_json(response).await;
    assert_eq!(body["user"]["email"], "ana@example.com");
    assert_eq!(body["user"]["name"], "Ana");
    assert!(body.get("token").is_none());
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_validation() {
    let (app, _state) = test_app().await;

    let cases = [
        json!({"name": "", "email": "ana@example.com", "password": "hunter22"}),
        json!({"name": "Ana", "email": "not-an-email", "password": "hunter22"}),
        json!({"name": "Ana", "email": "ana@example.com", "password": "12345"}),
        json!({"email": "ana@example.com"}),
    ];

    for (i, case) in cases.into_iter().enumerate() {
        let ip = format!("198.51.100.{i}");
        let mut request = json_request("POST", "/api/auth/register", case, None);
        request.headers_mut().insert("x-forwarded-for", ip.parse().unwrap());

        let response = send(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "InvalidInput");
    }
}

#[tokio::test]
async fn test_register_duplicate_email_conflict() {
    let (app, _state) = test_app().await;
    let payload = json!({"name": "Ana", "email": "ana@example.com", "password": "hunter22"});

    let first = send(&app, json_request("POST", "/api/auth/register", payload, None)).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let again = json!({"name": "Ana 2", "email": "ANA@example.com ", "password": "other-pass"});
    let second = send(&app, json_request("POST", "/api/auth/register", again, None)).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert!(session_token(&second).is_none());
    assert_eq!(body_json(second).await["code"], "DuplicateEmail");
}

#[tokio::test]
async fn test_register_rate_limited_per_ip() {
    let (app, _state) = test_app().await;

    // Invalid bodies still consume attempts
    for _ in 0..5 {
        let mut request = json_request("POST", "/api/auth/register", json!({}), None);
        request.headers_mut().insert("x-forwarded-for", "203.0.113.7".parse().unwrap());
        assert_eq!(send(&app, request).await.status(), StatusCode::BAD_REQUEST);
    }

    let mut request = json_request("POST", "/api/auth/register", json!({}), None);
    request.headers_mut().insert("x-forwarded-for", "203.0.113.7".parse().unwrap());
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    // A different caller is unaffected
    let mut request = json_request("POST", "/api/auth/register", json!({}), None);
    request.headers_mut().insert("x-forwarded-for", "203.0.113.8".parse().unwrap());
    assert_eq!(send(&app, request).await.status(), StatusCode::BAD_REQUEST);
}
