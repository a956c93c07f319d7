//! # Authentication Data Transfer Objects
//!
//! Request and response structures for the auth, session and admin endpoints.
//!
//! ## Endpoints Using These DTOs
//!
//! - `POST /api/auth/register` - [`RegisterRequest`] -> [`AuthResponse`]
//! - `POST /api/auth/login` - [`LoginRequest`] -> [`AuthResponse`]
//! - `POST /api/auth/logout` - [`LogoutResponse`]
//! - `GET /api/me` - [`MeResponse`]
//! - `POST /api/admin/promote` - [`PromoteResponse`]
//!
//! The session token never appears in a body; it travels in the
//! `auth_token` cookie only.
//!
//! ```text
//! POST /api/auth/login
//! Content-Type: application/json
//!
//! { "email": "ana@example.com", "password": "hunter22" }
//! ```
//!
//! Response:
//! ```text
//! { "user": { "id": 1, "name": "Ana", "email": "ana@example.com" } }
//! ```

use serde::{Deserialize, Serialize};

use crate::model::store::{Account, Role};

/// Registration request.
///
/// Validated by the handler: `name` non-empty, `email` well-formed,
/// `password` at least 6 characters.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Login request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public account information returned after register/login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<&Account> for UserInfo {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            name: account.name.clone(),
            email: account.email.clone(),
        }
    }
}

/// Response to a successful register or login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LogoutResponse {
    pub ok: bool,
}

/// Account as seen by its owner (includes the role).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MeUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Dashboard statistics for the current account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MeStats {
    pub total_proposals: i64,
    /// RFC 3339 timestamp of the newest proposal, `null` when there are none.
    pub last_proposal_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub user: MeUser,
    pub stats: MeStats,
}

/// Account fields echoed after promotion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PromotedUser {
    pub id: i64,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PromoteResponse {
    pub message: String,
    pub user: PromotedUser,
}

/// Standard error response body.
///
/// ```text
/// { "message": "Invalid email or password", "code": "InvalidCredentials" }
/// ```
///
/// Clients only rely on `message`; `code` is an optional machine-readable hint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub code: String,
}
