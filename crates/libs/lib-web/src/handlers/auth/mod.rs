//! # Authentication Handlers
//!
//! Register, login and logout. On success the session token is set as the
//! `auth_token` cookie; it never appears in a response body.
//!
//! Both register and login consult the rate limiter before looking at the
//! request body, keyed by operation and caller IP.

use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::{HeaderMap, StatusCode},
};
use lib_auth::RateLimiter;
use lib_core::dto::{AuthResponse, LoginRequest, LogoutResponse, RegisterRequest, UserInfo};
use lib_core::{AppError, Config, Result, SessionService};
use lib_utils::{normalize_email, validate_email, validate_min_length, validate_not_empty};
use tower_cookies::{
    cookie::{time::Duration, SameSite},
    Cookie, Cookies,
};
use tracing::{info, instrument, warn};

use crate::middleware::AUTH_TOKEN_COOKIE;

#[cfg(test)]
mod tests;

/// Minimum password length in characters.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Caller IP for rate limiting: first `X-Forwarded-For` entry, else `"unknown"`.
pub fn client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .unwrap_or("unknown")
        .to_string()
}

/// Session cookie carrying `token`.
pub(crate) fn session_cookie(token: String, config: &Config) -> Cookie<'static> {
    Cookie::build((AUTH_TOKEN_COOKIE, token))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::seconds(config.session_max_age_secs()))
        .secure(config.cookie_secure)
        .build()
}

/// Expired, empty session cookie.
fn cleared_cookie(config: &Config) -> Cookie<'static> {
    Cookie::build((AUTH_TOKEN_COOKIE, ""))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::ZERO)
        .secure(config.cookie_secure)
        .build()
}

/// Register handler - creates an account and opens a session.
///
/// # Validation
///
/// - `name` must not be empty
/// - `email` must be well-formed (it is normalized first)
/// - `password` must be at least [`MIN_PASSWORD_LEN`] characters
///
/// # Returns
///
/// * `201 Created` + [`AuthResponse`] and the session cookie
/// * `400` invalid input, `409` duplicate email, `429` rate limited
#[instrument(skip_all)]
pub async fn register(
    State(sessions): State<Arc<SessionService>>,
    State(limiter): State<RateLimiter>,
    State(config): State<Config>,
    headers: HeaderMap,
    cookies: Cookies,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let ip = client_ip(&headers);
    if !limiter.check("register", &ip, config.register_limit).await {
        return Err(AppError::RateLimited);
    }

    let name = req.name.trim();
    let email = normalize_email(&req.email);
    validate_not_empty(name, "Name")
        .and_then(|_| validate_email(&email))
        .and_then(|_| validate_min_length(&req.password, MIN_PASSWORD_LEN, "Password"))
        .map_err(|msg| {
            warn!("[REGISTER] Rejected input: {}", msg);
            AppError::InvalidInput(msg)
        })?;

    let account = sessions.register(name, &email, &req.password).await?;
    let token = sessions.issue_session(account.id)?;
    cookies.add(session_cookie(token, &config));

    info!("[REGISTER] Account {} registered", account.id);
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: UserInfo::from(&account),
        }),
    ))
}

/// Login handler - verifies credentials and opens a session.
///
/// Unknown email and wrong password produce the same `401` body.
#[instrument(skip_all)]
pub async fn login(
    State(sessions): State<Arc<SessionService>>,
    State(limiter): State<RateLimiter>,
    State(config): State<Config>,
    headers: HeaderMap,
    cookies: Cookies,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let ip = client_ip(&headers);
    if !limiter.check("login", &ip, config.login_limit).await {
        return Err(AppError::RateLimited);
    }

    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::InvalidInput("Email and password are required".to_string()));
    }

    let account = sessions
        .authenticate(&req.email, &req.password)
        .await?
        .ok_or_else(|| {
            warn!("[LOGIN] Failed login from {}", ip);
            AppError::InvalidCredentials
        })?;

    let token = sessions.issue_session(account.id)?;
    cookies.add(session_cookie(token, &config));

    info!("[LOGIN] Account {} logged in", account.id);
    Ok(Json(AuthResponse {
        user: UserInfo::from(&account),
    }))
}

/// Logout handler - clears the session cookie.
///
/// Tokens are stateless, so a copy of the token stays valid until it expires.
pub async fn logout(State(config): State<Config>, cookies: Cookies) -> Json<LogoutResponse> {
    cookies.add(cleared_cookie(&config));
    Json(LogoutResponse { ok: true })
}
