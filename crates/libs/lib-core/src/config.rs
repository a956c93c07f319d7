//! # Application Configuration
//!
//! Configuration loaded from environment variables (optionally via `.env`).
//! Everything is validated on startup so a misconfigured deployment fails
//! before serving its first request.
//!
//! | Variable                 | Default                    |
//! |--------------------------|----------------------------|
//! | `DATABASE_URL`           | `sqlite:data/proposals.db` |
//! | `JWT_SECRET`             | required, >= 32 chars      |
//! | `SESSION_TTL_HOURS`      | `168` (7 days)             |
//! | `ADMIN_ENABLE_SECRET`    | unset (promotion disabled) |
//! | `COOKIE_SECURE`          | `false`                    |
//! | `RATE_LIMIT_WINDOW_SECS` | `60`                       |
//! | `LOGIN_MAX_ATTEMPTS`     | `10`                       |
//! | `REGISTER_MAX_ATTEMPTS`  | `5`                        |
//!
//! The config is built once by the binary and passed down explicitly through
//! the server state.

use std::fmt;
use std::time::Duration;

use lib_auth::{RateLimitPolicy, DEFAULT_SESSION_TTL_HOURS};
use lib_utils::envs::{get_env, get_env_or, get_env_parse_or, Error as EnvError};

use crate::error::{AppError, Result};

/// Application configuration.
#[derive(Clone)]
pub struct Config {
    /// SQLite database connection URL
    pub database_url: String,

    /// Secret key for session token signing and verification
    ///
    /// **Must be at least 32 characters long.**
    pub jwt_secret: String,

    /// Session token validity period in hours (1-720)
    pub session_ttl_hours: i64,

    /// Shared secret gating admin promotion. `None` disables the endpoint.
    pub admin_enable_secret: Option<String>,

    /// Mark the session cookie `Secure` (enable behind HTTPS)
    pub cookie_secure: bool,

    /// Limit for login attempts per caller
    pub login_limit: RateLimitPolicy,

    /// Limit for registration attempts per caller
    pub register_limit: RateLimitPolicy,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let database_url = get_env_or("DATABASE_URL", "sqlite:data/proposals.db");

        let jwt_secret = get_env("JWT_SECRET")?;

        let session_ttl_hours = get_env_parse_or("SESSION_TTL_HOURS", DEFAULT_SESSION_TTL_HOURS)?;

        let admin_enable_secret = match get_env("ADMIN_ENABLE_SECRET") {
            Ok(secret) => Some(secret.trim().to_string()),
            Err(EnvError::MissingEnv(_)) => None,
            Err(e) => return Err(e.into()),
        };

        let cookie_secure = get_env_parse_or("COOKIE_SECURE", false)?;

        let window = Duration::from_secs(get_env_parse_or(
            "RATE_LIMIT_WINDOW_SECS",
            RateLimitPolicy::LOGIN.window.as_secs(),
        )?);
        let login_limit = RateLimitPolicy::new(
            window,
            get_env_parse_or("LOGIN_MAX_ATTEMPTS", RateLimitPolicy::LOGIN.max_attempts)?,
        );
        let register_limit = RateLimitPolicy::new(
            window,
            get_env_parse_or("REGISTER_MAX_ATTEMPTS", RateLimitPolicy::REGISTER.max_attempts)?,
        );

        Ok(Self {
            database_url,
            jwt_secret,
            session_ttl_hours,
            admin_enable_secret,
            cookie_secure,
            login_limit,
            register_limit,
        })
    }

    /// Validate configuration values against security rules.
    pub fn validate(&self) -> Result<()> {
        if self.jwt_secret.len() < 32 {
            return Err(AppError::Config(
                "JWT_SECRET must be at least 32 characters long".to_string(),
            ));
        }

        if self.session_ttl_hours < 1 || self.session_ttl_hours > 720 {
            return Err(AppError::Config(
                "SESSION_TTL_HOURS must be between 1 and 720 (30 days)".to_string(),
            ));
        }

        for (name, policy) in [("login", self.login_limit), ("register", self.register_limit)] {
            if policy.window.is_zero() || policy.max_attempts == 0 {
                return Err(AppError::Config(format!(
                    "{name} rate limit needs a non-zero window and attempt count"
                )));
            }
        }

        Ok(())
    }

    /// Session cookie max-age in seconds (matches the token lifetime).
    pub fn session_max_age_secs(&self) -> i64 {
        self.session_ttl_hours.saturating_mul(3600)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &self.database_url)
            .field("jwt_secret", &"<redacted>")
            .field("session_ttl_hours", &self.session_ttl_hours)
            .field("admin_enable_secret", &self.admin_enable_secret.as_ref().map(|_| "<redacted>"))
            .field("cookie_secure", &self.cookie_secure)
            .field("login_limit", &self.login_limit)
            .field("register_limit", &self.register_limit)
            .finish()
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test-secret-key-must-be-at-least-32-characters-long!".to_string(),
        session_ttl_hours: DEFAULT_SESSION_TTL_HOURS,
        admin_enable_secret: Some("let-me-in".to_string()),
        cookie_secure: false,
        login_limit: RateLimitPolicy::LOGIN,
        register_limit: RateLimitPolicy::REGISTER,
    }
}
