//! # Utilities Library
//!
//! Shared helpers for environment variables, timestamps, and input normalization.

pub mod envs;
pub mod time;
pub mod validation;

// Re-export commonly used functions
pub use envs::{get_env, get_env_or, get_env_parse, get_env_parse_or};
pub use time::format_time;
pub use validation::{normalize_email, validate_email, validate_min_length, validate_not_empty};
