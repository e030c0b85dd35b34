//! PostgreSQL implementation of RevokedTokenRepository.
//!
//! The token string itself is the primary key; `ON CONFLICT DO NOTHING`
//! makes repeat revocation a no-op.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::DomainError;
use crate::ports::RevokedTokenRepository;

/// PostgreSQL implementation of the revocation set.
pub struct PostgresRevokedTokenRepository {
    pool: PgPool,
}

impl PostgresRevokedTokenRepository {
    /// Creates a new PostgresRevokedTokenRepository with the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RevokedTokenRepository for PostgresRevokedTokenRepository {
    async fn revoke(&self, token: &str) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO revoked_tokens (token, revoked_at)
            VALUES ($1, NOW())
            ON CONFLICT (token) DO NOTHING
            "#,
        )
        .bind(token)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to revoke token: {}", e)))?;

        Ok(())
    }

    async fn is_revoked(&self, token: &str) -> Result<bool, DomainError> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM revoked_tokens WHERE token = $1)")
                .bind(token)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::database(format!("Failed to check revocation: {}", e))
                })?;

        Ok(exists)
    }

    async fn delete_revoked_before(
        &self,
        cutoff: chrono::DateTime<chrono::Utc>,
    ) -> Result<u64, DomainError> {
        // The revoked_at index keeps this a range scan
        let result = sqlx::query("DELETE FROM revoked_tokens WHERE revoked_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::database(format!("Failed to sweep revoked tokens: {}", e))
            })?;

        Ok(result.rows_affected())
    }
}
