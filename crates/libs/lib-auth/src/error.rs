//! # Authentication Errors

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The token signing secret is absent or empty. Fatal: auth cannot be served.
    #[error("Signing secret is not configured")]
    MissingSecret,

    /// Session lifetime is not a positive, representable number of hours.
    #[error("Invalid session TTL: {0} hours")]
    InvalidTtl(i64),

    #[error("Failed to hash password: {0}")]
    PwdHash(String),

    #[error("Failed to encode token: {0}")]
    TokenEncode(String),

    /// Token rejected (malformed, bad signature, expired, or bad subject).
    #[error("Invalid token: {0}")]
    TokenInvalid(String),

    #[error("Rate limit store error: {0}")]
    RateLimitStore(String),
}
