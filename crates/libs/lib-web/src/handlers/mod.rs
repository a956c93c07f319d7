//! # HTTP Request Handlers
//!
//! Axum handlers organized by feature. Business rules live in `lib-core`;
//! handlers extract, validate, delegate, and shape the response.
//!
//! ## Handler Modules
//!
//! - **[`auth`]**: `POST /api/auth/register`, `/login`, `/logout`
//! - **[`me`]**: `GET /api/me`
//! - **[`company`]**: `GET`/`POST /api/company`
//! - **[`proposals`]**: `GET`/`POST /api/proposals`, `GET /api/proposals/{id}`
//! - **[`admin`]**: `POST /api/admin/promote`
//!
//! ## Authentication
//!
//! Protected handlers take `Extension<CtxAccount>`, inserted by
//! [`require_auth`](crate::middleware::require_auth). Register, login,
//! logout, promote and `/health` are public routes.
//!
//! ## Error Handling
//!
//! Handlers return [`lib_core::Result`]; [`lib_core::AppError`] renders as
//! `{"message": ..., "code": ...}` with the matching status.

pub mod admin;
pub mod auth;
pub mod company;
pub mod me;
pub mod proposals;
