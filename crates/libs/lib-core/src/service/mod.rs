//! # Services
//!
//! Business operations on top of the store: the session façade and the
//! admin promotion policy.

pub mod admin;
pub mod session;

pub use admin::AdminPolicy;
pub use session::SessionService;
