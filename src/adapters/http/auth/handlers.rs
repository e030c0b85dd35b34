//! HTTP handlers for authentication endpoints.
//!
//! These handlers connect Axum routes to application layer command handlers.
//! Every credential failure maps to the same opaque 401 body, matching the
//! middleware, so the boundary never reveals which check failed.

use std::sync::Arc;

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::auth::{
    AuthFlowError, LoginCommand, LoginHandler, LogoutCommand, LogoutHandler, RefreshCommand,
    RefreshHandler, RegisterCommand, RegisterHandler,
};
use crate::application::token::TokenService;
use crate::adapters::http::middleware::RequireAuth;
use crate::ports::{PasswordHasher, UserRepository};

use super::dto::{
    ErrorResponse, LoginRequest, RefreshRequest, RefreshResponse, RegisterRequest,
    RegisterResponse, TokenPairResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all auth dependencies.
///
/// This struct is cloned for each request and contains Arc-wrapped dependencies
/// for efficient sharing across handlers.
#[derive(Clone)]
pub struct AuthAppState {
    pub users: Arc<dyn UserRepository>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub tokens: Arc<TokenService>,
}

impl AuthAppState {
    /// Create handlers on demand from the shared state.
    pub fn register_handler(&self) -> RegisterHandler {
        RegisterHandler::new(self.users.clone(), self.hasher.clone())
    }

    pub fn login_handler(&self) -> LoginHandler {
        LoginHandler::new(self.users.clone(), self.hasher.clone(), self.tokens.clone())
    }

    pub fn refresh_handler(&self) -> RefreshHandler {
        RefreshHandler::new(self.tokens.clone())
    }

    pub fn logout_handler(&self) -> LogoutHandler {
        LogoutHandler::new(self.tokens.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/auth/register - Create a new account
pub async fn register(
    State(state): State<AuthAppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AuthApiError> {
    let handler = state.register_handler();
    let result = handler
        .handle(RegisterCommand {
            email: request.email,
            password: request.password,
            role: None,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(RegisterResponse::from(result))))
}

/// POST /api/auth/login - Exchange credentials for a token pair
pub async fn login(
    State(state): State<AuthAppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, AuthApiError> {
    let handler = state.login_handler();
    let result = handler
        .handle(LoginCommand {
            email: request.email,
            password: request.password,
        })
        .await?;

    Ok(Json(TokenPairResponse::from(result)))
}

/// POST /api/auth/refresh - Mint a fresh access token
pub async fn refresh(
    State(state): State<AuthAppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<impl IntoResponse, AuthApiError> {
    let handler = state.refresh_handler();
    let result = handler
        .handle(RefreshCommand {
            refresh_token: request.refresh_token,
        })
        .await?;

    Ok(Json(RefreshResponse {
        access_token: result.access_token,
        token_type: "Bearer",
    }))
}

/// POST /api/auth/logout - Revoke the presented access token
///
/// The raw bearer token is read back out of the Authorization header so the
/// exact string the client holds lands in the revocation set.
pub async fn logout(
    State(state): State<AuthAppState>,
    RequireAuth(user): RequireAuth,
    headers: axum::http::HeaderMap,
) -> Result<impl IntoResponse, AuthApiError> {
    let access_token = headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or(AuthApiError(AuthFlowError::Unauthenticated))?;

    let handler = state.logout_handler();
    handler
        .handle(LogoutCommand {
            user_id: user.id,
            access_token: access_token.to_string(),
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts auth flow errors to HTTP responses.
pub struct AuthApiError(AuthFlowError);

impl From<AuthFlowError> for AuthApiError {
    fn from(err: AuthFlowError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AuthApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, code, message) = match &self.0 {
            // One body for every credential failure, identical to the
            // middleware's rejection.
            AuthFlowError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHENTICATED",
                "Authentication required".to_string(),
            ),
            AuthFlowError::EmailTaken => (
                StatusCode::CONFLICT,
                "EMAIL_TAKEN",
                "Email is already registered".to_string(),
            ),
            AuthFlowError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_FAILED", msg.clone())
            }
            AuthFlowError::Storage(msg) => {
                tracing::error!("Auth storage failure: {}", msg);
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
