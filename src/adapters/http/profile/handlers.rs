//! HTTP handlers for profile endpoints.
//!
//! The own-profile view needs only an authenticated caller; viewing an
//! arbitrary user by id is an admin surface.

use std::sync::Arc;

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::adapters::http::auth::ErrorResponse;
use crate::adapters::http::middleware::{RequireAdmin, RequireAuth};
use crate::application::handlers::profile::{GetProfileHandler, ProfileFlowError};
use crate::domain::foundation::UserId;
use crate::ports::UserRepository;

use super::dto::ProfileResponse;

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state for the profile endpoints.
#[derive(Clone)]
pub struct ProfileAppState {
    pub users: Arc<dyn UserRepository>,
}

impl ProfileAppState {
    pub fn get_profile_handler(&self) -> GetProfileHandler {
        GetProfileHandler::new(self.users.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/profile - The caller's own record
pub async fn get_my_profile(
    State(state): State<ProfileAppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ProfileApiError> {
    let handler = state.get_profile_handler();
    let record = handler.handle(&user.id).await?;

    Ok(Json(ProfileResponse::from(record)))
}

/// GET /api/profile/:id - Any user's record (admin)
pub async fn get_profile_by_id(
    State(state): State<ProfileAppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ProfileApiError> {
    let handler = state.get_profile_handler();
    let record = handler.handle(&UserId::from_uuid(user_id)).await?;

    Ok(Json(ProfileResponse::from(record)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts profile flow errors to HTTP responses.
pub struct ProfileApiError(ProfileFlowError);

impl From<ProfileFlowError> for ProfileApiError {
    fn from(err: ProfileFlowError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ProfileApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, code, message) = match &self.0 {
            ProfileFlowError::NotFound => (
                StatusCode::NOT_FOUND,
                "USER_NOT_FOUND",
                "User not found".to_string(),
            ),
            ProfileFlowError::Storage(msg) => {
                tracing::error!("Profile storage failure: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = ErrorResponse::new(code, message);
        (status, Json(body)).into_response()
    }
}
