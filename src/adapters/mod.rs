//! Adapters - implementations of ports for external systems.
//!
//! This layer contains the concrete implementations that connect the
//! application core to the outside world:
//!
//! - `auth` - Argon2 password hashing
//! - `http` - REST API built on axum
//! - `postgres` - sqlx-backed repositories
//! - `stripe` - Stripe payment provider client

pub mod auth;
pub mod http;
pub mod postgres;
pub mod stripe;
