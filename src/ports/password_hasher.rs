//! Password hashing port.
//!
//! The hashing algorithm is an infrastructure choice behind this trait;
//! the auth handlers only ever see opaque hash strings.

use thiserror::Error;

/// Errors from the hashing backend.
#[derive(Debug, Clone, Error)]
pub enum HashError {
    #[error("Password hashing failed: {0}")]
    Hash(String),

    #[error("Stored password hash is malformed: {0}")]
    MalformedHash(String),
}

/// Port for password hashing and verification.
///
/// Hashing is CPU-bound, not async; implementations meant for request
/// paths should keep parameters bounded.
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password for storage.
    fn hash(&self, password: &str) -> Result<String, HashError>;

    /// Verify a plaintext password against a stored hash.
    ///
    /// Returns `Ok(false)` on mismatch; `Err` only for malformed hashes
    /// or backend failure.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, HashError>;
}
