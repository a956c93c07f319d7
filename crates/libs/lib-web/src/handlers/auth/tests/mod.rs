//! # Auth Handler Tests
//!
//! Test suite for the register, login and logout handlers.

mod register;

use axum::http::{HeaderMap, HeaderValue};

use super::client_ip;

#[test]
fn test_client_ip_uses_first_forwarded_entry() {
    let mut headers = HeaderMap::new();
    headers.insert("x-forwarded-for", HeaderValue::from_static(" 203.0.113.9 , 10.0.0.1"));
    assert_eq!(client_ip(&headers), "203.0.113.9");
}

#[test]
fn test_client_ip_unknown_without_header() {
    assert_eq!(client_ip(&HeaderMap::new()), "unknown");

    let mut headers = HeaderMap::new();
    headers.insert("x-forwarded-for", HeaderValue::from_static(""));
    assert_eq!(client_ip(&headers), "unknown");
}
