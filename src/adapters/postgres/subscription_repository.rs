//! PostgreSQL implementation of SubscriptionRepository.
//!
//! The conditional-write primitives push their guards into SQL so they
//! hold under concurrent webhook deliveries: insert-if-absent rides the
//! unique index on provider_subscription_id, and status transitions put
//! the allowed source statuses in the UPDATE's WHERE clause.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, SubscriptionId, UserId};
use crate::domain::subscription::{Plan, Subscription, SubscriptionStatus};
use crate::ports::{SaveOutcome, SubscriptionRepository, TransitionOutcome};

/// PostgreSQL implementation of the SubscriptionRepository port.
pub struct PostgresSubscriptionRepository {
    pool: PgPool,
}

impl PostgresSubscriptionRepository {
    /// Creates a new PostgresSubscriptionRepository with the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a subscription.
#[derive(Debug, sqlx::FromRow)]
struct SubscriptionRow {
    id: Uuid,
    user_id: Uuid,
    provider_subscription_id: String,
    status: String,
    plan: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<SubscriptionRow> for Subscription {
    type Error = DomainError;

    fn try_from(row: SubscriptionRow) -> Result<Self, Self::Error> {
        Ok(Subscription {
            id: SubscriptionId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            provider_subscription_id: row.provider_subscription_id,
            status: parse_status(&row.status)?,
            plan: Plan::parse(&row.plan)
                .map_err(|e| DomainError::new(ErrorCode::DatabaseError, e.to_string()))?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn parse_status(s: &str) -> Result<SubscriptionStatus, DomainError> {
    match s {
        "active" => Ok(SubscriptionStatus::Active),
        "past_due" => Ok(SubscriptionStatus::PastDue),
        "canceled" => Ok(SubscriptionStatus::Canceled),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid status value: {}", s),
        )),
    }
}

/// Source statuses from which `target` may be reached.
///
/// Derived from the status state machine; must stay in sync with
/// `SubscriptionStatus::can_transition_to`.
fn allowed_sources(target: SubscriptionStatus) -> &'static [&'static str] {
    match target {
        SubscriptionStatus::Active => &[],
        SubscriptionStatus::PastDue => &["active", "past_due"],
        SubscriptionStatus::Canceled => &["active", "past_due", "canceled"],
    }
}

const SELECT_SUBSCRIPTION: &str = r#"
    SELECT id, user_id, provider_subscription_id, status, plan, created_at, updated_at
    FROM subscriptions
"#;

#[async_trait]
impl SubscriptionRepository for PostgresSubscriptionRepository {
    async fn create_if_absent(
        &self,
        subscription: &Subscription,
    ) -> Result<SaveOutcome, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO subscriptions (
                id, user_id, provider_subscription_id, status, plan, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (provider_subscription_id) DO NOTHING
            "#,
        )
        .bind(subscription.id.as_uuid())
        .bind(subscription.user_id.as_uuid())
        .bind(&subscription.provider_subscription_id)
        .bind(subscription.status.as_str())
        .bind(subscription.plan.as_str())
        .bind(subscription.created_at)
        .bind(subscription.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to create subscription: {}", e)))?;

        if result.rows_affected() == 1 {
            Ok(SaveOutcome::Inserted)
        } else {
            Ok(SaveOutcome::AlreadyExists)
        }
    }

    async fn transition(
        &self,
        provider_subscription_id: &str,
        target: SubscriptionStatus,
    ) -> Result<TransitionOutcome, DomainError> {
        let sources: Vec<String> = allowed_sources(target)
            .iter()
            .map(|s| s.to_string())
            .collect();

        let result = sqlx::query(
            r#"
            UPDATE subscriptions
            SET status = $2, updated_at = NOW()
            WHERE provider_subscription_id = $1 AND status = ANY($3)
            "#,
        )
        .bind(provider_subscription_id)
        .bind(target.as_str())
        .bind(&sources)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to transition status: {}", e)))?;

        if result.rows_affected() == 1 {
            return Ok(TransitionOutcome::Applied);
        }

        // Zero rows: either guard refused or the row does not exist.
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM subscriptions WHERE provider_subscription_id = $1)",
        )
        .bind(provider_subscription_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to check subscription: {}", e)))?;

        if exists {
            Ok(TransitionOutcome::Refused)
        } else {
            Ok(TransitionOutcome::NotFound)
        }
    }

    async fn find_by_provider_id(
        &self,
        provider_subscription_id: &str,
    ) -> Result<Option<Subscription>, DomainError> {
        let row: Option<SubscriptionRow> = sqlx::query_as(&format!(
            "{} WHERE provider_subscription_id = $1",
            SELECT_SUBSCRIPTION
        ))
        .bind(provider_subscription_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to find subscription: {}", e)))?;

        row.map(Subscription::try_from).transpose()
    }

    async fn find_active_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Subscription>, DomainError> {
        let row: Option<SubscriptionRow> = sqlx::query_as(&format!(
            "{} WHERE user_id = $1 AND status = 'active' ORDER BY created_at DESC LIMIT 1",
            SELECT_SUBSCRIPTION
        ))
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to find subscription: {}", e)))?;

        row.map(Subscription::try_from).transpose()
    }

    async fn find_latest_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Subscription>, DomainError> {
        let row: Option<SubscriptionRow> = sqlx::query_as(&format!(
            "{} WHERE user_id = $1 ORDER BY created_at DESC LIMIT 1",
            SELECT_SUBSCRIPTION
        ))
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to find subscription: {}", e)))?;

        row.map(Subscription::try_from).transpose()
    }

    async fn list_active(&self) -> Result<Vec<Subscription>, DomainError> {
        let rows: Vec<SubscriptionRow> = sqlx::query_as(&format!(
            "{} WHERE status = 'active' ORDER BY created_at DESC",
            SELECT_SUBSCRIPTION
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to list subscriptions: {}", e)))?;

        rows.into_iter().map(Subscription::try_from).collect()
    }
}
