//! Authentication types for the domain layer.
//!
//! These types represent an authenticated caller extracted from a verified
//! access token. They carry only the claims the rest of the system uses.

use serde::{Deserialize, Serialize};

use super::UserId;

/// Role assigned to a user account. Immutable after registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }
}

/// Authenticated user extracted from a verified access token.
///
/// This is a domain type. The HTTP middleware populates it after token
/// verification and injects it into request extensions.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// The unique user identifier from the token's subject claim.
    pub id: UserId,

    /// User's email address from the token claims.
    pub email: String,

    /// Role from the token claims.
    pub role: Role,
}

impl AuthenticatedUser {
    pub fn new(id: UserId, email: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            email: email.into(),
            role,
        }
    }

    /// Returns true if this user may access admin-only surfaces.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_role_grants_admin_access() {
        let user = AuthenticatedUser::new(UserId::new(), "a@example.com", Role::Admin);
        assert!(user.is_admin());
    }

    #[test]
    fn user_role_does_not_grant_admin_access() {
        let user = AuthenticatedUser::new(UserId::new(), "u@example.com", Role::User);
        assert!(!user.is_admin());
    }

    #[test]
    fn role_serializes_screaming_snake() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"USER\"");
    }
}
