//! # Core Library
//!
//! Configuration, errors, DTOs, the SQLite store, and the session services.

pub mod config;
pub mod dto;
pub mod error;
pub mod model;
pub mod service;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
pub use model::store::{create_pool, init_schema, memory_pool, DbPool};
pub use service::{AdminPolicy, SessionService};
