//! Subscription repository port.
//!
//! Webhook deliveries for the same provider subscription may arrive
//! concurrently, including duplicates, so the write operations are
//! conditional primitives rather than read-then-write: creation is
//! insert-if-absent and status changes carry their transition guard into
//! the store.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::subscription::{Subscription, SubscriptionStatus};

/// Outcome of an insert-if-absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Row was created.
    Inserted,
    /// A row with this provider subscription id already exists
    /// (duplicate delivery); nothing was written.
    AlreadyExists,
}

/// Outcome of a guarded status transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// Status was updated.
    Applied,
    /// Row exists but the state machine refused the transition
    /// (e.g. a canceled subscription stays canceled).
    Refused,
    /// No row with this provider subscription id.
    NotFound,
}

/// Repository port for subscription records.
///
/// The reconciliation key is always the provider's subscription id; the
/// local row id never identifies a subscription to the outside world.
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Insert the row if no subscription with its provider id exists.
    ///
    /// Safe under concurrent duplicate deliveries: exactly one caller
    /// observes `Inserted`.
    async fn create_if_absent(&self, subscription: &Subscription)
        -> Result<SaveOutcome, DomainError>;

    /// Apply a status transition keyed by provider subscription id.
    ///
    /// The transition guard (which source statuses may reach `target`)
    /// must be evaluated atomically with the update.
    async fn transition(
        &self,
        provider_subscription_id: &str,
        target: SubscriptionStatus,
    ) -> Result<TransitionOutcome, DomainError>;

    /// Find a subscription by its provider id. Returns `None` if not found.
    async fn find_by_provider_id(
        &self,
        provider_subscription_id: &str,
    ) -> Result<Option<Subscription>, DomainError>;

    /// The user's current Active subscription, if any. At most one exists.
    async fn find_active_by_user(&self, user_id: &UserId)
        -> Result<Option<Subscription>, DomainError>;

    /// The user's most recent subscription in any status.
    async fn find_latest_by_user(&self, user_id: &UserId)
        -> Result<Option<Subscription>, DomainError>;

    /// All Active subscriptions (privileged query surface).
    async fn list_active(&self) -> Result<Vec<Subscription>, DomainError>;
}
