//! HTTP adapter for authentication endpoints.
//!
//! Exposes the auth flows via REST API:
//! - `POST /api/auth/register` - Create a new account
//! - `POST /api/auth/login` - Exchange credentials for a token pair
//! - `POST /api/auth/refresh` - Mint a fresh access token
//! - `POST /api/auth/logout` - Revoke the presented access token

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::ErrorResponse;
pub use handlers::AuthAppState;
pub use routes::auth_routes;
