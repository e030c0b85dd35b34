//! HTTP DTOs (Data Transfer Objects) for subscription endpoints.
//!
//! These types define the JSON request/response structure for the
//! subscription API. They serve as the boundary between HTTP and the
//! application layer.

use serde::{Deserialize, Serialize};

use crate::domain::subscription::{Plan, Subscription, SubscriptionStatus};
use crate::ports::CheckoutSession;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to open a hosted checkout session.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCheckoutRequest {
    /// The plan to subscribe to.
    pub plan: Plan,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Response carrying the hosted checkout redirect.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutResponse {
    /// Provider session id.
    pub session_id: String,
    /// URL the client should redirect the customer to.
    pub checkout_url: String,
}

impl From<CheckoutSession> for CheckoutResponse {
    fn from(session: CheckoutSession) -> Self {
        Self {
            session_id: session.id,
            checkout_url: session.url,
        }
    }
}

/// A subscription as exposed over the API.
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionResponse {
    pub id: String,
    pub plan: Plan,
    pub status: SubscriptionStatus,
    /// Creation time (ISO 8601).
    pub created_at: String,
    /// Last status change (ISO 8601).
    pub updated_at: String,
}

impl From<Subscription> for SubscriptionResponse {
    fn from(sub: Subscription) -> Self {
        Self {
            id: sub.id.to_string(),
            plan: sub.plan,
            status: sub.status,
            created_at: sub.created_at.to_rfc3339(),
            updated_at: sub.updated_at.to_rfc3339(),
        }
    }
}

/// Admin listing of live subscriptions.
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionListResponse {
    pub subscriptions: Vec<SubscriptionResponse>,
    pub count: usize,
}

/// Acknowledgement body returned to the webhook sender.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookAckResponse {
    pub received: bool,
}
