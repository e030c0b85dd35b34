//! HTTP DTOs for profile endpoints.

use serde::Serialize;

use crate::domain::user::User;

/// A user record as exposed over the API.
///
/// Deliberately narrow: the password hash and the live refresh-token
/// value never cross the HTTP boundary.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub id: String,
    pub email: String,
    /// Account creation time (ISO 8601).
    pub created_at: String,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}
