//! User repository port.
//!
//! The credential store: user rows are written only through this trait,
//! and only the token lifecycle manager and the auth handlers request
//! those writes.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::user::User;

/// Repository port for user identity records.
///
/// Implementations must ensure:
/// - Unique email constraint (surfaced as `ErrorCode::EmailTaken`)
/// - Atomic single-row updates for the refresh-token field
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a newly registered user.
    ///
    /// # Errors
    ///
    /// - `EmailTaken` if the email is already registered
    /// - `DatabaseError` on persistence failure
    async fn create(&self, user: &User) -> Result<(), DomainError>;

    /// Find a user by id. Returns `None` if not found.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Find a user by email. Returns `None` if not found.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Store a new refresh-token value on the user row, replacing any
    /// prior value. The single-row UPDATE is the atomicity boundary.
    async fn store_refresh_token(&self, id: &UserId, token: &str) -> Result<(), DomainError>;

    /// Clear the stored refresh-token value (logout).
    async fn clear_refresh_token(&self, id: &UserId) -> Result<(), DomainError>;
}
