//! Payment provider port.
//!
//! Thin contract with the external payment gateway: opening a hosted
//! checkout session and scheduling end-of-period cancellation. Both calls
//! must carry a bounded timeout and surface a retryable error on timeout
//! rather than hanging the request.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::UserId;
use crate::domain::subscription::Plan;

/// Hosted checkout session opened at the provider.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    /// Provider session id.
    pub id: String,
    /// URL the customer is redirected to.
    pub url: String,
}

/// Errors from the payment gateway.
#[derive(Debug, Clone, Error)]
pub enum PaymentError {
    /// The provider rejected the request.
    #[error("Payment provider rejected the request ({status}): {message}")]
    Upstream { status: u16, message: String },

    /// The request did not complete within the bounded timeout.
    #[error("Payment provider call timed out")]
    Timeout,

    /// Transport-level failure (connect, TLS, DNS).
    #[error("Payment provider unreachable: {0}")]
    Transport(String),

    /// Response arrived but could not be interpreted.
    #[error("Unexpected payment provider response: {0}")]
    InvalidResponse(String),

    /// Local misconfiguration (e.g. no price id for the requested plan).
    #[error("Payment provider misconfigured: {0}")]
    Config(String),
}

impl PaymentError {
    /// Returns true if retrying the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            PaymentError::Timeout | PaymentError::Transport(_) => true,
            PaymentError::Upstream { status, .. } => *status >= 500,
            PaymentError::InvalidResponse(_) | PaymentError::Config(_) => false,
        }
    }
}

/// Port for the external payment gateway.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Open a hosted checkout session for a subscription purchase.
    ///
    /// The session carries `user_id` and `plan` as metadata so the
    /// completed-checkout webhook can tie the provider subscription back
    /// to a local user.
    async fn create_checkout_session(
        &self,
        user_id: &UserId,
        email: &str,
        plan: Plan,
    ) -> Result<CheckoutSession, PaymentError>;

    /// Ask the provider to cancel the subscription at the end of the
    /// current billing period. The response id is not persisted; the
    /// local status transition is authoritative for this system's view.
    async fn cancel_at_period_end(
        &self,
        provider_subscription_id: &str,
    ) -> Result<(), PaymentError>;
}
