//! Revocation set port.
//!
//! Append-only store of logged-out access tokens, looked up by the exact
//! token string. A token once present stays revoked for its remaining
//! natural lifetime; a periodic sweep removes entries whose token has
//! long since expired on its own.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::foundation::DomainError;

/// Repository port for the revocation set.
#[async_trait]
pub trait RevokedTokenRepository: Send + Sync {
    /// Add a token to the revocation set. Inserting a token that is
    /// already present is a no-op, not an error.
    async fn revoke(&self, token: &str) -> Result<(), DomainError>;

    /// Returns true if the exact token string has been revoked.
    async fn is_revoked(&self, token: &str) -> Result<bool, DomainError>;

    /// Remove entries revoked before the cutoff, returning how many were
    /// dropped. A token revoked that long ago has passed its natural
    /// expiry and fails verification on `exp` alone, so removing the row
    /// never unrevokes anything live.
    async fn delete_revoked_before(&self, cutoff: DateTime<Utc>) -> Result<u64, DomainError>;
}
