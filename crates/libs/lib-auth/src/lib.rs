//! # Authentication Library
//!
//! Password hashing, session token issuance/verification, and attempt rate limiting.

pub mod error;
pub mod pwd;
pub mod rate_limit;
pub mod token;

// Re-export commonly used types
pub use error::{Error, Result};
pub use pwd::{hash_password, prepare_decoy, verify_decoy, verify_password};
pub use rate_limit::{rate_limit_key, MemoryRateLimitStore, RateLimitPolicy, RateLimitStore, RateLimiter};
pub use token::{Claims, TokenIssuer, DEFAULT_SESSION_TTL_HOURS};
