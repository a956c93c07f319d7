//! # Request/Response Logging Middleware
//!
//! One line per request and one per response, tagged with the request ID.
//! Headers are logged at debug level with credentials redacted. Bodies are
//! never logged: the auth endpoints carry passwords.

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use tracing::{debug, error, info, warn};

use super::mw_req_stamp::RequestStamp;

/// Headers whose values must never reach the logs
const SENSITIVE_HEADERS: &[&str] = &["authorization", "cookie", "set-cookie", "x-admin-secret"];

const REDACTED: &str = "***REDACTED***";

/// Header list safe to log.
pub(crate) fn sanitized_headers(headers: &axum::http::HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            let name_lower = name.as_str().to_ascii_lowercase();
            if SENSITIVE_HEADERS.contains(&name_lower.as_str()) {
                Some((name.to_string(), REDACTED.to_string()))
            } else {
                value.to_str().ok().map(|v| (name.to_string(), v.to_string()))
            }
        })
        .collect()
}

/// Request/response logging middleware.
pub async fn log_requests(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let request_id = req
        .extensions()
        .get::<RequestStamp>()
        .map(|s| s.id.clone())
        .unwrap_or_else(|| "unknown".to_string());

    let client_ip = crate::handlers::auth::client_ip(req.headers());

    info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        client_ip = %client_ip,
        "[REQUEST] {} {}",
        method,
        path
    );
    debug!(
        request_id = %request_id,
        headers = ?sanitized_headers(req.headers()),
        "[REQUEST HEADERS]"
    );

    let response = next.run(req).await;

    let duration = start.elapsed();
    let status = response.status().as_u16();

    if response.status().is_server_error() {
        error!(
            request_id = %request_id,
            status,
            duration_ms = duration.as_millis(),
            "[RESPONSE] {} {} -> {} ({}ms) [SERVER ERROR]",
            method,
            path,
            status,
            duration.as_millis()
        );
    } else if response.status().is_client_error() {
        warn!(
            request_id = %request_id,
            status,
            duration_ms = duration.as_millis(),
            "[RESPONSE] {} {} -> {} ({}ms) [CLIENT ERROR]",
            method,
            path,
            status,
            duration.as_millis()
        );
    } else {
        info!(
            request_id = %request_id,
            status,
            duration_ms = duration.as_millis(),
            "[RESPONSE] {} {} -> {} ({}ms)",
            method,
            path,
            status,
            duration.as_millis()
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue};

    #[test]
    fn test_credentials_are_redacted() {
        let mut headers = HeaderMap::new();
        headers.insert("cookie", HeaderValue::from_static("auth_token=eyJhbGciOi"));
        headers.insert("x-admin-secret", HeaderValue::from_static("let-me-in"));
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let logged = sanitized_headers(&headers);
        let rendered = format!("{:?}", logged);

        assert!(!rendered.contains("eyJhbGciOi"));
        assert!(!rendered.contains("let-me-in"));
        assert!(rendered.contains("application/json"));
    }
}
