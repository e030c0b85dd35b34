//! Subscription record.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::foundation::{SubscriptionId, UserId};

use super::{Plan, SubscriptionStatus};

/// One row per provider subscription.
///
/// Keyed by the provider's subscription identifier for reconciliation;
/// the local id exists only for row identity. Never hard-deleted.
#[derive(Debug, Clone, Serialize)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub user_id: UserId,

    /// Provider-assigned subscription id. Unique; the reconciliation key
    /// for every incoming webhook event.
    pub provider_subscription_id: String,

    pub status: SubscriptionStatus,
    pub plan: Plan,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    /// Creates the row a completed checkout produces: a fresh Active
    /// subscription owned by the checkout's user.
    pub fn from_checkout(
        user_id: UserId,
        provider_subscription_id: impl Into<String>,
        plan: Plan,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: SubscriptionId::new(),
            user_id,
            provider_subscription_id: provider_subscription_id.into(),
            status: SubscriptionStatus::Active,
            plan,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == SubscriptionStatus::Active
    }
}
