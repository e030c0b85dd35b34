//! Axum router configuration for authentication endpoints.
//!
//! This module defines the route structure for auth-related API endpoints
//! and wires them to their corresponding handlers.

use axum::{routing::post, Router};

use super::handlers::{login, logout, refresh, register, AuthAppState};

/// Create the auth API router.
///
/// # Routes
///
/// ## Public Endpoints
/// - `POST /register` - Create a new account
/// - `POST /login` - Exchange credentials for a token pair
/// - `POST /refresh` - Mint a fresh access token from a refresh token
///
/// ## Authenticated Endpoints
/// - `POST /logout` - Revoke the presented access token
pub fn auth_routes() -> Router<AuthAppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/logout", post(logout))
}
