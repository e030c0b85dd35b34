//! HTTP DTOs (Data Transfer Objects) for authentication endpoints.
//!
//! These types define the JSON request/response structure for the auth API.
//! They serve as the boundary between HTTP and the application layer.

use serde::{Deserialize, Serialize};

use crate::application::{LoginResult, RegisterResult};
use crate::domain::foundation::Role;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to register a new account.
///
/// The role is never accepted from the wire; every registration creates a
/// regular user.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

/// Request to log in with email and password.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request to mint a fresh access token from a refresh token.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Response for a successful registration.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterResponse {
    pub id: String,
    pub email: String,
    pub role: Role,
}

impl From<RegisterResult> for RegisterResponse {
    fn from(result: RegisterResult) -> Self {
        Self {
            id: result.user_id.to_string(),
            email: result.email,
            role: result.role,
        }
    }
}

/// Response carrying a freshly issued token pair.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPairResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
}

impl From<LoginResult> for TokenPairResponse {
    fn from(result: LoginResult) -> Self {
        Self {
            access_token: result.tokens.access_token,
            refresh_token: result.tokens.refresh_token,
            token_type: "Bearer",
        }
    }
}

/// Response for a successful refresh.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

// ════════════════════════════════════════════════════════════════════════════════
// Error DTO (shared across HTTP modules)
// ════════════════════════════════════════════════════════════════════════════════

/// Standard error response body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: code.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_request_deserializes() {
        let json = r#"{"email":"alice@example.com","password":"hunter2hunter2"}"#;
        let req: RegisterRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.email, "alice@example.com");
        assert_eq!(req.password, "hunter2hunter2");
    }

    #[test]
    fn register_request_ignores_role_field() {
        // A client trying to smuggle a role in still deserializes; the
        // field simply does not exist on the request type.
        let json = r#"{"email":"a@b.c","password":"pw","role":"ADMIN"}"#;
        let req: RegisterRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.email, "a@b.c");
    }

    #[test]
    fn token_pair_response_serializes_bearer_type() {
        let response = TokenPairResponse {
            access_token: "at".to_string(),
            refresh_token: "rt".to_string(),
            token_type: "Bearer",
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["token_type"], "Bearer");
        assert_eq!(json["access_token"], "at");
    }

    #[test]
    fn error_response_shape() {
        let err = ErrorResponse::new("EMAIL_TAKEN", "Email is already registered");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "EMAIL_TAKEN");
        assert_eq!(json["error"], "Email is already registered");
    }
}
