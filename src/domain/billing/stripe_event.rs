//! Stripe webhook event types.
//!
//! Only the fields our processing needs are captured; everything else in
//! Stripe's event schema is ignored by serde.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::WebhookError;

/// Stripe webhook event envelope (simplified).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEvent {
    /// Unique identifier for the event (evt_xxx format).
    pub id: String,

    /// Type of event (e.g., "checkout.session.completed").
    #[serde(rename = "type")]
    pub event_type: String,

    /// Time at which the event was created (Unix timestamp).
    pub created: i64,

    /// Object containing event-specific data.
    pub data: StripeEventData,

    /// Whether this is a live mode event (vs test mode).
    #[serde(default)]
    pub livemode: bool,
}

/// Container for event-specific data.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEventData {
    /// The object that triggered the event (polymorphic based on event type).
    pub object: serde_json::Value,
}

impl StripeEvent {
    /// Parse the event type into a known enum variant.
    pub fn parsed_type(&self) -> StripeEventType {
        StripeEventType::parse(&self.event_type)
    }

    /// Attempts to deserialize the data object as the specified type.
    pub fn deserialize_object<T: serde::de::DeserializeOwned>(&self) -> Result<T, WebhookError> {
        serde_json::from_value(self.data.object.clone())
            .map_err(|e| WebhookError::ParseError(e.to_string()))
    }
}

/// Stripe event types this system reacts to.
///
/// Anything else maps to `Unknown` and is acknowledged without any state
/// change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StripeEventType {
    /// Checkout completed; creates the local subscription row.
    CheckoutSessionCompleted,
    /// Invoice payment failed; subscription falls past due.
    InvoicePaymentFailed,
    /// Provider-initiated subscription deletion; subscription is canceled.
    CustomerSubscriptionDeleted,
    /// Unrecognized event type.
    Unknown,
}

impl StripeEventType {
    pub fn parse(s: &str) -> Self {
        match s {
            "checkout.session.completed" => Self::CheckoutSessionCompleted,
            "invoice.payment_failed" => Self::InvoicePaymentFailed,
            "customer.subscription.deleted" => Self::CustomerSubscriptionDeleted,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CheckoutSessionCompleted => "checkout.session.completed",
            Self::InvoicePaymentFailed => "invoice.payment_failed",
            Self::CustomerSubscriptionDeleted => "customer.subscription.deleted",
            Self::Unknown => "unknown",
        }
    }
}

/// `data.object` of a `checkout.session.completed` event.
///
/// The checkout session is created with `metadata.user_id` and
/// `metadata.plan`, which tie the provider subscription back to a local
/// user.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeCheckoutSession {
    pub id: String,

    /// Provider subscription id created by this checkout.
    pub subscription: Option<String>,

    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl StripeCheckoutSession {
    pub fn user_id(&self) -> Option<&str> {
        self.metadata.get("user_id").map(String::as_str)
    }

    pub fn plan(&self) -> Option<&str> {
        self.metadata.get("plan").map(String::as_str)
    }
}

/// `data.object` of an `invoice.payment_failed` event.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeInvoice {
    pub id: String,

    /// Provider subscription this invoice bills.
    pub subscription: Option<String>,
}

/// `data.object` of a `customer.subscription.deleted` event.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeSubscriptionObject {
    /// Provider subscription id.
    pub id: String,

    #[serde(default)]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_checkout_completed_event() {
        let json = r#"{
            "id": "evt_1234567890",
            "type": "checkout.session.completed",
            "created": 1704067200,
            "data": {
                "object": {
                    "id": "cs_test_abc",
                    "subscription": "sub_test_123",
                    "metadata": {
                        "user_id": "7e2c9d8a-43f1-4a5b-9b7e-2f1d3c4b5a69",
                        "plan": "premium"
                    }
                }
            },
            "livemode": false
        }"#;

        let event: StripeEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.parsed_type(), StripeEventType::CheckoutSessionCompleted);

        let session: StripeCheckoutSession = event.deserialize_object().unwrap();
        assert_eq!(session.subscription.as_deref(), Some("sub_test_123"));
        assert_eq!(session.plan(), Some("premium"));
        assert_eq!(
            session.user_id(),
            Some("7e2c9d8a-43f1-4a5b-9b7e-2f1d3c4b5a69")
        );
    }

    #[test]
    fn deserialize_invoice_payment_failed_event() {
        let json = r#"{
            "id": "evt_invoice_fail",
            "type": "invoice.payment_failed",
            "created": 1704067200,
            "data": {
                "object": {
                    "id": "in_test_123",
                    "subscription": "sub_test_456"
                }
            },
            "livemode": false
        }"#;

        let event: StripeEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.parsed_type(), StripeEventType::InvoicePaymentFailed);

        let invoice: StripeInvoice = event.deserialize_object().unwrap();
        assert_eq!(invoice.subscription.as_deref(), Some("sub_test_456"));
    }

    #[test]
    fn deserialize_subscription_deleted_event() {
        let json = r#"{
            "id": "evt_sub_del",
            "type": "customer.subscription.deleted",
            "created": 1704067200,
            "data": {
                "object": {
                    "id": "sub_test_789",
                    "status": "canceled"
                }
            },
            "livemode": true
        }"#;

        let event: StripeEvent = serde_json::from_str(json).unwrap();
        assert_eq!(
            event.parsed_type(),
            StripeEventType::CustomerSubscriptionDeleted
        );

        let sub: StripeSubscriptionObject = event.deserialize_object().unwrap();
        assert_eq!(sub.id, "sub_test_789");
    }

    #[test]
    fn unrecognized_event_type_maps_to_unknown() {
        assert_eq!(
            StripeEventType::parse("customer.subscription.paused"),
            StripeEventType::Unknown
        );
    }

    #[test]
    fn event_type_strings_roundtrip() {
        for event_type in [
            StripeEventType::CheckoutSessionCompleted,
            StripeEventType::InvoicePaymentFailed,
            StripeEventType::CustomerSubscriptionDeleted,
        ] {
            assert_eq!(StripeEventType::parse(event_type.as_str()), event_type);
        }
    }

    #[test]
    fn checkout_session_without_metadata_yields_none() {
        let session: StripeCheckoutSession = serde_json::from_str(
            r#"{"id": "cs_bare", "subscription": null}"#,
        )
        .unwrap();
        assert!(session.user_id().is_none());
        assert!(session.plan().is_none());
        assert!(session.subscription.is_none());
    }
}
