//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations through
//! the ports.

pub mod auth;
pub mod profile;
pub mod subscription;
