//! `POST /api/admin/promote` - self-promotion to `ADMIN` behind a shared secret.
//!
//! The checks and their order live in [`AdminPolicy`]; this handler only
//! pulls the secret header and the session cookie out of the request.

use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::HeaderMap,
};
use lib_core::dto::{PromoteResponse, PromotedUser};
use lib_core::{AdminPolicy, Result, SessionService};
use tower_cookies::Cookies;

use crate::middleware::AUTH_TOKEN_COOKIE;

pub const ADMIN_SECRET_HEADER: &str = "x-admin-secret";

pub async fn promote(
    State(sessions): State<Arc<SessionService>>,
    State(admin): State<Arc<AdminPolicy>>,
    headers: HeaderMap,
    cookies: Cookies,
) -> Result<Json<PromoteResponse>> {
    let secret = headers
        .get(ADMIN_SECRET_HEADER)
        .and_then(|v| v.to_str().ok());
    let token = cookies.get(AUTH_TOKEN_COOKIE).map(|c| c.value().to_string());

    let account = admin.promote(&sessions, secret, token.as_deref()).await?;

    Ok(Json(PromoteResponse {
        message: "Account promoted to ADMIN".to_string(),
        user: PromotedUser {
            id: account.id,
            email: account.email,
            role: account.role,
        },
    }))
}
