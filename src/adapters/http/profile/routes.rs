//! Axum router configuration for profile endpoints.

use axum::{routing::get, Router};

use super::handlers::{get_my_profile, get_profile_by_id, ProfileAppState};

/// Create the profile API router.
///
/// # Routes
///
/// ## Authenticated Endpoints
/// - `GET /` - The caller's own record
///
/// ## Admin Endpoints
/// - `GET /:id` - Any user's record by id
pub fn profile_routes() -> Router<ProfileAppState> {
    Router::new()
        .route("/", get(get_my_profile))
        .route("/:id", get(get_profile_by_id))
}
