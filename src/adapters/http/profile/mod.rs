//! HTTP adapter for profile endpoints.
//!
//! Exposes user records via REST API:
//! - `GET /api/profile` - The caller's own record
//! - `GET /api/profile/:id` - Any user's record (admin)

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::ProfileAppState;
pub use routes::profile_routes;
