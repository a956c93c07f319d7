//! # Data Transfer Objects (DTOs)
//!
//! This module contains all data structures used for communication between
//! the frontend and backend via the REST API.
//!
//! ## Wire Format
//!
//! All DTOs use **camelCase** field names in JSON (`clientName`, `logoUrl`,
//! `totalProposals`), matching the browser client.
//! Request bodies default missing fields so validation can report them as
//! empty instead of failing deserialization.

pub mod auth;
pub mod company;
pub mod proposal;

pub use auth::*;
pub use company::*;
pub use proposal::*;
