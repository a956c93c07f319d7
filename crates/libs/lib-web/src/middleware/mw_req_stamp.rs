//! # Request Stamping Middleware
//!
//! Gives every request an ID and a timestamp, exposed to handlers as a
//! [`RequestStamp`] extension and to clients as the `X-Request-ID` header.
//!
//! An `X-Request-ID` set by a fronting proxy is kept when it looks sane,
//! so log lines can be correlated across hops.

use std::time::SystemTime;

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

const MAX_FORWARDED_ID_LEN: usize = 64;

/// Request metadata for tracing and debugging.
#[derive(Clone, Debug)]
pub struct RequestStamp {
    /// Unique request identifier
    pub id: String,
    /// Time the request entered the service
    pub timestamp: SystemTime,
}

impl RequestStamp {
    fn new(forwarded: Option<&str>) -> Self {
        let id = forwarded
            .filter(|id| is_acceptable_id(id))
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        Self {
            id,
            timestamp: SystemTime::now(),
        }
    }
}

fn is_acceptable_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_FORWARDED_ID_LEN
        && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Request stamping middleware.
pub async fn stamp_req(mut req: Request, next: Next) -> Response {
    let forwarded = req
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok());
    let stamp = RequestStamp::new(forwarded);

    req.extensions_mut().insert(stamp.clone());

    let mut res = next.run(req).await;

    if let Ok(header_value) = HeaderValue::from_str(&stamp.id) {
        res.headers_mut().insert(REQUEST_ID_HEADER, header_value);
    }

    res
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_id_is_uuid() {
        let stamp = RequestStamp::new(None);
        assert!(Uuid::parse_str(&stamp.id).is_ok());
    }

    #[test]
    fn test_forwarded_id_kept_when_sane() {
        assert_eq!(RequestStamp::new(Some("edge-1234_ab")).id, "edge-1234_ab");

        let injected = RequestStamp::new(Some("abc\" OR 1=1"));
        assert_ne!(injected.id, "abc\" OR 1=1");

        let long = "a".repeat(MAX_FORWARDED_ID_LEN + 1);
        assert_ne!(RequestStamp::new(Some(&long)).id, long);
    }
}
