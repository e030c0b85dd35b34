//! Subscription command and query handlers.
//!
//! Webhook-driven writes go through the repository's conditional
//! primitives, so duplicate and out-of-order deliveries resolve to no-ops
//! instead of corrupting status.

mod cancel_subscription;
mod create_checkout;
mod get_subscription;
mod handle_payment_webhook;
mod list_active_subscriptions;

pub use cancel_subscription::{CancelSubscriptionCommand, CancelSubscriptionHandler};
pub use create_checkout::{CreateCheckoutCommand, CreateCheckoutHandler};
pub use get_subscription::GetSubscriptionHandler;
pub use handle_payment_webhook::{PaymentWebhookProcessor, WebhookOutcome};
pub use list_active_subscriptions::ListActiveSubscriptionsHandler;

use thiserror::Error;

use crate::domain::foundation::DomainError;
use crate::ports::PaymentError;

/// Errors surfaced by the subscription command handlers.
#[derive(Debug, Error)]
pub enum SubscriptionFlowError {
    /// The caller has no subscription matching the request.
    #[error("No matching subscription")]
    NotFound,

    /// The caller already has an active subscription.
    #[error("An active subscription already exists")]
    AlreadyActive,

    /// The payment provider call failed; no local state was changed.
    #[error(transparent)]
    Payment(#[from] PaymentError),

    /// Persistence failure.
    #[error("Storage failure: {0}")]
    Storage(String),
}

impl From<DomainError> for SubscriptionFlowError {
    fn from(err: DomainError) -> Self {
        SubscriptionFlowError::Storage(err.to_string())
    }
}
