//! User identity records.
//!
//! A user row owns the password hash, the role, and the single live
//! refresh-token value. The refresh-token field is mutated on login and
//! cleared on logout; storing a new value supersedes the old one, which is
//! the one-active-session policy.

use chrono::{DateTime, Utc};

use crate::domain::foundation::{Role, UserId};

/// User identity record.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub password_hash: String,
    pub role: Role,

    /// Current refresh-token value, if a session is live.
    ///
    /// Exactly one live value per user. A refresh token whose value no
    /// longer matches this field has been superseded and must be rejected.
    pub refresh_token: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user record at registration time.
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            email: email.into(),
            password_hash: password_hash.into(),
            role,
            refresh_token: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns true if the presented refresh-token value matches the
    /// stored live value.
    pub fn refresh_token_matches(&self, presented: &str) -> bool {
        self.refresh_token.as_deref() == Some(presented)
    }
}
