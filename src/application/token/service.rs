//! Token lifecycle manager.
//!
//! Issues, verifies, refreshes, and revokes the signed bearer credentials
//! that gate every protected operation. Access tokens carry identity and
//! role for one hour; refresh tokens carry only the subject for seven
//! days. Both are HS256-signed with the process-wide secret.
//!
//! Revocation is checked before signature verification so a logged-out
//! token is rejected even while its signature and expiry are still valid.

use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::domain::foundation::{DomainError, Role, UserId};
use crate::domain::user::User;
use crate::ports::{RevokedTokenRepository, UserRepository};

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject: the user id.
    pub sub: UserId,
    pub email: String,
    pub role: Role,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
}

/// Claims carried by a refresh token. Deliberately minimal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: UserId,
    pub exp: i64,
}

/// An issued access/refresh token pair.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Token lifecycle failures.
///
/// These never cause partial state: either the whole operation succeeds
/// or no persisted field changes.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The literal token string is in the revocation set.
    #[error("Token has been revoked")]
    Revoked,

    /// Bad signature, expired, malformed, or a superseded refresh value.
    #[error("Token is invalid")]
    Invalid,

    /// Unknown subject on refresh.
    #[error("User not found")]
    NotFound,

    /// Persistence failure; surfaced to the caller, never swallowed.
    #[error("Token storage failure: {0}")]
    Storage(String),
}

impl From<DomainError> for TokenError {
    fn from(err: DomainError) -> Self {
        TokenError::Storage(err.to_string())
    }
}

/// Issues, verifies, refreshes, and revokes signed token pairs.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
    users: Arc<dyn UserRepository>,
    revoked_tokens: Arc<dyn RevokedTokenRepository>,
}

impl TokenService {
    /// Creates a service signing with `secret`.
    ///
    /// TTLs come from configuration; the defaults are 1 hour (access) and
    /// 7 days (refresh).
    pub fn new(
        secret: &SecretString,
        access_ttl_secs: i64,
        refresh_ttl_secs: i64,
        users: Arc<dyn UserRepository>,
        revoked_tokens: Arc<dyn RevokedTokenRepository>,
    ) -> Self {
        let key_bytes = secret.expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(key_bytes),
            decoding_key: DecodingKey::from_secret(key_bytes),
            access_ttl: Duration::seconds(access_ttl_secs),
            refresh_ttl: Duration::seconds(refresh_ttl_secs),
            users,
            revoked_tokens,
        }
    }

    /// Issue a fresh access/refresh pair for a user.
    ///
    /// The refresh token's value is persisted onto the user row,
    /// replacing any prior value: older refresh tokens become unusable
    /// even before they expire (one active session per user).
    pub async fn issue(&self, user: &User) -> Result<TokenPair, TokenError> {
        let now = Utc::now();

        let access_claims = AccessClaims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role,
            exp: (now + self.access_ttl).timestamp(),
        };
        let refresh_claims = RefreshClaims {
            sub: user.id,
            exp: (now + self.refresh_ttl).timestamp(),
        };

        let access_token = encode(&Header::default(), &access_claims, &self.encoding_key)
            .map_err(|e| TokenError::Storage(format!("token encoding failed: {}", e)))?;
        let refresh_token = encode(&Header::default(), &refresh_claims, &self.encoding_key)
            .map_err(|e| TokenError::Storage(format!("token encoding failed: {}", e)))?;

        self.users
            .store_refresh_token(&user.id, &refresh_token)
            .await?;

        debug!(user_id = %user.id, "issued token pair");
        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Verify an access token and return its claims.
    ///
    /// The revocation check runs first so a logged-out token fails with
    /// `Revoked` regardless of its remaining natural lifetime.
    pub async fn verify(&self, token: &str) -> Result<AccessClaims, TokenError> {
        if self.revoked_tokens.is_revoked(token).await? {
            return Err(TokenError::Revoked);
        }

        let data = decode::<AccessClaims>(token, &self.decoding_key, &Validation::default())
            .map_err(|_| TokenError::Invalid)?;

        Ok(data.claims)
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// Fails with `Invalid` unless the presented value equals the user's
    /// stored refresh-token value; a superseded token is rejected even if
    /// its own signature and expiry still check out. The refresh token is
    /// not rotated on this call.
    pub async fn refresh(&self, refresh_token: &str) -> Result<String, TokenError> {
        let data =
            decode::<RefreshClaims>(refresh_token, &self.decoding_key, &Validation::default())
                .map_err(|_| TokenError::Invalid)?;

        let user = self
            .users
            .find_by_id(&data.claims.sub)
            .await?
            .ok_or(TokenError::NotFound)?;

        if !user.refresh_token_matches(refresh_token) {
            debug!(user_id = %user.id, "refresh token does not match stored value");
            return Err(TokenError::Invalid);
        }

        let access_claims = AccessClaims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role,
            exp: (Utc::now() + self.access_ttl).timestamp(),
        };
        encode(&Header::default(), &access_claims, &self.encoding_key)
            .map_err(|e| TokenError::Storage(format!("token encoding failed: {}", e)))
    }

    /// Full logout: revoke the presented access token and clear the
    /// stored refresh-token value.
    ///
    /// The revocation insert runs first. A failure between the two steps
    /// can only leave the system over-revoked, never with a usable
    /// credential that should be dead.
    pub async fn revoke(&self, user_id: &UserId, access_token: &str) -> Result<(), TokenError> {
        self.revoked_tokens.revoke(access_token).await?;
        self.users.clear_refresh_token(user_id).await?;
        debug!(user_id = %user_id, "session revoked");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    // ══════════════════════════════════════════════════════════════
    // Test Infrastructure
    // ══════════════════════════════════════════════════════════════

    struct InMemoryUsers {
        users: Mutex<HashMap<UserId, User>>,
        fail_writes: bool,
    }

    impl InMemoryUsers {
        fn new() -> Self {
            Self {
                users: Mutex::new(HashMap::new()),
                fail_writes: false,
            }
        }

        fn with_user(user: User) -> Self {
            let repo = Self::new();
            repo.users.lock().unwrap().insert(user.id, user);
            repo
        }

        fn failing_writes(user: User) -> Self {
            let repo = Self::with_user(user);
            Self {
                fail_writes: true,
                ..repo
            }
        }

        fn get(&self, id: &UserId) -> Option<User> {
            self.users.lock().unwrap().get(id).cloned()
        }
    }

    #[async_trait]
    impl UserRepository for InMemoryUsers {
        async fn create(&self, user: &User) -> Result<(), DomainError> {
            self.users.lock().unwrap().insert(user.id, user.clone());
            Ok(())
        }

        async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
            Ok(self.users.lock().unwrap().get(id).cloned())
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .values()
                .find(|u| u.email == email)
                .cloned())
        }

        async fn store_refresh_token(&self, id: &UserId, token: &str) -> Result<(), DomainError> {
            if self.fail_writes {
                return Err(DomainError::database("simulated write failure"));
            }
            let mut users = self.users.lock().unwrap();
            let user = users
                .get_mut(id)
                .ok_or_else(|| DomainError::database("no such user"))?;
            user.refresh_token = Some(token.to_string());
            Ok(())
        }

        async fn clear_refresh_token(&self, id: &UserId) -> Result<(), DomainError> {
            if self.fail_writes {
                return Err(DomainError::database("simulated write failure"));
            }
            let mut users = self.users.lock().unwrap();
            let user = users
                .get_mut(id)
                .ok_or_else(|| DomainError::database("no such user"))?;
            user.refresh_token = None;
            Ok(())
        }
    }

    struct InMemoryRevoked {
        tokens: Mutex<HashMap<String, chrono::DateTime<chrono::Utc>>>,
    }

    impl InMemoryRevoked {
        fn new() -> Self {
            Self {
                tokens: Mutex::new(HashMap::new()),
            }
        }
    }

    #[async_trait]
    impl RevokedTokenRepository for InMemoryRevoked {
        async fn revoke(&self, token: &str) -> Result<(), DomainError> {
            self.tokens
                .lock()
                .unwrap()
                .insert(token.to_string(), chrono::Utc::now());
            Ok(())
        }

        async fn is_revoked(&self, token: &str) -> Result<bool, DomainError> {
            Ok(self.tokens.lock().unwrap().contains_key(token))
        }

        async fn delete_revoked_before(
            &self,
            cutoff: chrono::DateTime<chrono::Utc>,
        ) -> Result<u64, DomainError> {
            let mut tokens = self.tokens.lock().unwrap();
            let before = tokens.len();
            tokens.retain(|_, revoked_at| *revoked_at >= cutoff);
            Ok((before - tokens.len()) as u64)
        }
    }

    const TEST_SECRET: &str = "test-signing-secret-not-for-production";

    fn test_user() -> User {
        User::new("alice@example.com", "argon2-hash", Role::User)
    }

    fn service_with(users: Arc<InMemoryUsers>) -> TokenService {
        TokenService::new(
            &SecretString::new(TEST_SECRET.to_string()),
            3600,
            7 * 24 * 3600,
            users,
            Arc::new(InMemoryRevoked::new()),
        )
    }

    // ══════════════════════════════════════════════════════════════
    // Issue / Verify
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn issued_access_token_verifies_to_original_claims() {
        let user = test_user();
        let users = Arc::new(InMemoryUsers::with_user(user.clone()));
        let service = service_with(users);

        let pair = service.issue(&user).await.unwrap();
        let claims = service.verify(&pair.access_token).await.unwrap();

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.role, Role::User);
    }

    #[tokio::test]
    async fn issue_persists_refresh_token_on_user_row() {
        let user = test_user();
        let users = Arc::new(InMemoryUsers::with_user(user.clone()));
        let service = service_with(users.clone());

        let pair = service.issue(&user).await.unwrap();

        let stored = users.get(&user.id).unwrap();
        assert_eq!(stored.refresh_token.as_deref(), Some(pair.refresh_token.as_str()));
    }

    #[tokio::test]
    async fn second_issue_supersedes_prior_refresh_token() {
        let user = test_user();
        let users = Arc::new(InMemoryUsers::with_user(user.clone()));
        let service = service_with(users.clone());

        let first = service.issue(&user).await.unwrap();
        // Claims embed an expiry timestamp; a later pair differs.
        tokio::time::sleep(std::time::Duration::from_millis(1100)).await;
        let second = service.issue(&user).await.unwrap();

        assert_ne!(first.refresh_token, second.refresh_token);
        let result = service.refresh(&first.refresh_token).await;
        assert!(matches!(result, Err(TokenError::Invalid)));
        assert!(service.refresh(&second.refresh_token).await.is_ok());
    }

    #[tokio::test]
    async fn verify_rejects_malformed_token() {
        let users = Arc::new(InMemoryUsers::new());
        let service = service_with(users);

        let result = service.verify("garbage.token.value").await;

        assert!(matches!(result, Err(TokenError::Invalid)));
    }

    #[tokio::test]
    async fn verify_rejects_token_signed_with_other_secret() {
        let user = test_user();
        let users = Arc::new(InMemoryUsers::with_user(user.clone()));
        let foreign = TokenService::new(
            &SecretString::new("a-different-secret".to_string()),
            3600,
            7 * 24 * 3600,
            users.clone(),
            Arc::new(InMemoryRevoked::new()),
        );
        let service = service_with(users);

        let pair = foreign.issue(&user).await.unwrap();
        let result = service.verify(&pair.access_token).await;

        assert!(matches!(result, Err(TokenError::Invalid)));
    }

    #[tokio::test]
    async fn verify_rejects_expired_token() {
        let user = test_user();
        let users = Arc::new(InMemoryUsers::with_user(user.clone()));
        // Negative TTL: born expired, well past validation leeway.
        let service = TokenService::new(
            &SecretString::new(TEST_SECRET.to_string()),
            -3600,
            7 * 24 * 3600,
            users,
            Arc::new(InMemoryRevoked::new()),
        );

        let pair = service.issue(&user).await.unwrap();
        let result = service.verify(&pair.access_token).await;

        assert!(matches!(result, Err(TokenError::Invalid)));
    }

    // ══════════════════════════════════════════════════════════════
    // Revocation
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn revoked_token_is_rejected_before_natural_expiry() {
        let user = test_user();
        let users = Arc::new(InMemoryUsers::with_user(user.clone()));
        let service = service_with(users);

        let pair = service.issue(&user).await.unwrap();
        service.revoke(&user.id, &pair.access_token).await.unwrap();

        // Signature and expiry are still fine; revocation wins.
        let result = service.verify(&pair.access_token).await;
        assert!(matches!(result, Err(TokenError::Revoked)));
    }

    #[tokio::test]
    async fn revoke_clears_stored_refresh_token() {
        let user = test_user();
        let users = Arc::new(InMemoryUsers::with_user(user.clone()));
        let service = service_with(users.clone());

        let pair = service.issue(&user).await.unwrap();
        service.revoke(&user.id, &pair.access_token).await.unwrap();

        assert!(users.get(&user.id).unwrap().refresh_token.is_none());
        let result = service.refresh(&pair.refresh_token).await;
        assert!(matches!(result, Err(TokenError::Invalid)));
    }

    // ══════════════════════════════════════════════════════════════
    // Refresh
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn refresh_issues_verifiable_access_token() {
        let user = test_user();
        let users = Arc::new(InMemoryUsers::with_user(user.clone()));
        let service = service_with(users);

        let pair = service.issue(&user).await.unwrap();
        let access = service.refresh(&pair.refresh_token).await.unwrap();

        let claims = service.verify(&access).await.unwrap();
        assert_eq!(claims.sub, user.id);
    }

    #[tokio::test]
    async fn refresh_with_superseded_value_fails_invalid() {
        let user = test_user();
        let users = Arc::new(InMemoryUsers::with_user(user.clone()));
        let service = service_with(users.clone());

        let pair = service.issue(&user).await.unwrap();
        // Simulate a rotation that already replaced the stored value.
        users
            .store_refresh_token(&user.id, "some-newer-value")
            .await
            .unwrap();

        let result = service.refresh(&pair.refresh_token).await;

        assert!(matches!(result, Err(TokenError::Invalid)));
    }

    #[tokio::test]
    async fn refresh_for_unknown_subject_fails_not_found() {
        let user = test_user();
        let seeded = Arc::new(InMemoryUsers::with_user(user.clone()));
        let service = service_with(seeded);
        let pair = service.issue(&user).await.unwrap();

        // Same secret, empty store: subject no longer exists.
        let empty = Arc::new(InMemoryUsers::new());
        let service_without_user = TokenService::new(
            &SecretString::new(TEST_SECRET.to_string()),
            3600,
            7 * 24 * 3600,
            empty,
            Arc::new(InMemoryRevoked::new()),
        );

        let result = service_without_user.refresh(&pair.refresh_token).await;

        assert!(matches!(result, Err(TokenError::NotFound)));
    }

    #[tokio::test]
    async fn refresh_rejects_access_token_presented_as_refresh() {
        // An access token decodes with extra claims but is not the stored
        // refresh value, so the comparison rejects it.
        let user = test_user();
        let users = Arc::new(InMemoryUsers::with_user(user.clone()));
        let service = service_with(users);

        let pair = service.issue(&user).await.unwrap();
        let result = service.refresh(&pair.access_token).await;

        assert!(matches!(result, Err(TokenError::Invalid)));
    }

    // ══════════════════════════════════════════════════════════════
    // Storage failures surface
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn issue_surfaces_persistence_failure() {
        let user = test_user();
        let users = Arc::new(InMemoryUsers::failing_writes(user.clone()));
        let service = service_with(users);

        let result = service.issue(&user).await;

        assert!(matches!(result, Err(TokenError::Storage(_))));
    }
}
