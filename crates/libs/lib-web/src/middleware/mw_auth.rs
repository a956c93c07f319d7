//! # Authentication Middleware
//!
//! Resolves the `auth_token` session cookie into a [`CtxAccount`] request
//! extension, or answers `401 Unauthorized`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let protected = Router::new()
//!     .route("/api/me", get(me))
//!     .route_layer(axum::middleware::from_fn_with_state(state.clone(), require_auth));
//! ```
//!
//! Handlers then extract the caller with `Extension<CtxAccount>`:
//!
//! ```rust,ignore
//! async fn me(Extension(ctx): Extension<CtxAccount>) -> String {
//!     format!("Hello, account {}!", ctx.account_id)
//! }
//! ```
//!
//! The middleware only proves the token is valid. Whether the account still
//! exists is up to the handler.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use lib_core::{AppError, SessionService};
use tower_cookies::Cookies;
use tracing::debug;

/// Name of the session cookie.
pub const AUTH_TOKEN_COOKIE: &str = "auth_token";

/// Authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CtxAccount {
    pub account_id: i64,
}

/// Session authentication middleware.
///
/// - **Valid token**: continues with [`CtxAccount`] in the extensions
/// - **Missing/invalid/expired token**: returns [`AppError::Unauthorized`]
pub async fn require_auth(
    State(sessions): State<Arc<SessionService>>,
    cookies: Cookies,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = cookies.get(AUTH_TOKEN_COOKIE).map(|c| c.value().to_string());

    let account_id = sessions.resolve_session(token.as_deref()).ok_or_else(|| {
        debug!("[AUTH] No valid session for {}", req.uri().path());
        AppError::Unauthorized
    })?;

    debug!("[AUTH] Authenticated account {}", account_id);
    req.extensions_mut().insert(CtxAccount { account_id });

    Ok(next.run(req).await)
}
