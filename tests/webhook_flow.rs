//! End-to-end webhook processing over an in-memory subscription store.
//!
//! Payloads are signed with the real HMAC scheme and run through the full
//! processor, so signature checking, parsing, and the guarded state
//! transitions are all exercised together.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use secrecy::SecretString;

use subgate::application::{PaymentWebhookProcessor, WebhookOutcome};
use subgate::domain::billing::{sign_test_payload, WebhookError};
use subgate::domain::foundation::{DomainError, StateMachine, UserId};
use subgate::domain::subscription::{Subscription, SubscriptionStatus};
use subgate::ports::{SaveOutcome, SubscriptionRepository, TransitionOutcome};

const SECRET: &str = "whsec_integration_test";

// ════════════════════════════════════════════════════════════════════════════════
// In-Memory Subscription Store
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Default)]
struct InMemorySubscriptions {
    rows: Mutex<Vec<Subscription>>,
}

impl InMemorySubscriptions {
    fn status_of(&self, provider_id: &str) -> Option<SubscriptionStatus> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.provider_subscription_id == provider_id)
            .map(|s| s.status)
    }

    fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl SubscriptionRepository for InMemorySubscriptions {
    async fn create_if_absent(
        &self,
        subscription: &Subscription,
    ) -> Result<SaveOutcome, DomainError> {
        let mut rows = self.rows.lock().unwrap();
        if rows
            .iter()
            .any(|s| s.provider_subscription_id == subscription.provider_subscription_id)
        {
            return Ok(SaveOutcome::AlreadyExists);
        }
        rows.push(subscription.clone());
        Ok(SaveOutcome::Inserted)
    }

    async fn transition(
        &self,
        provider_subscription_id: &str,
        target: SubscriptionStatus,
    ) -> Result<TransitionOutcome, DomainError> {
        let mut rows = self.rows.lock().unwrap();
        match rows
            .iter_mut()
            .find(|s| s.provider_subscription_id == provider_subscription_id)
        {
            Some(row) if row.status.can_transition_to(&target) => {
                row.status = target;
                Ok(TransitionOutcome::Applied)
            }
            Some(_) => Ok(TransitionOutcome::Refused),
            None => Ok(TransitionOutcome::NotFound),
        }
    }

    async fn find_by_provider_id(
        &self,
        provider_subscription_id: &str,
    ) -> Result<Option<Subscription>, DomainError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.provider_subscription_id == provider_subscription_id)
            .cloned())
    }

    async fn find_active_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Subscription>, DomainError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|s| &s.user_id == user_id && s.status == SubscriptionStatus::Active)
            .cloned())
    }

    async fn find_latest_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Subscription>, DomainError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|s| &s.user_id == user_id)
            .max_by_key(|s| s.created_at)
            .cloned())
    }

    async fn list_active(&self) -> Result<Vec<Subscription>, DomainError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.status == SubscriptionStatus::Active)
            .cloned()
            .collect())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Fixture
// ════════════════════════════════════════════════════════════════════════════════

fn processor() -> (Arc<InMemorySubscriptions>, PaymentWebhookProcessor) {
    let store = Arc::new(InMemorySubscriptions::default());
    let secret = SecretString::new(SECRET.to_string());
    let proc = PaymentWebhookProcessor::new(&secret, store.clone());
    (store, proc)
}

fn signed(payload: &str) -> (Vec<u8>, String) {
    let timestamp = chrono::Utc::now().timestamp();
    let header = sign_test_payload(SECRET, timestamp, payload.as_bytes());
    (payload.as_bytes().to_vec(), header)
}

fn checkout_completed(subscription_id: &str, user_id: &UserId, plan: &str) -> String {
    format!(
        r#"{{
            "id": "evt_checkout",
            "type": "checkout.session.completed",
            "created": 1704067200,
            "data": {{
                "object": {{
                    "id": "cs_test",
                    "subscription": "{subscription_id}",
                    "metadata": {{ "user_id": "{user_id}", "plan": "{plan}" }}
                }}
            }},
            "livemode": false
        }}"#
    )
}

fn payment_failed(subscription_id: &str) -> String {
    format!(
        r#"{{
            "id": "evt_invoice",
            "type": "invoice.payment_failed",
            "created": 1704067200,
            "data": {{
                "object": {{ "id": "in_test", "subscription": "{subscription_id}" }}
            }},
            "livemode": false
        }}"#
    )
}

fn subscription_deleted(subscription_id: &str) -> String {
    format!(
        r#"{{
            "id": "evt_deleted",
            "type": "customer.subscription.deleted",
            "created": 1704067200,
            "data": {{
                "object": {{ "id": "{subscription_id}", "status": "canceled" }}
            }},
            "livemode": false
        }}"#
    )
}

// ════════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn checkout_creates_subscription_and_redelivery_is_a_noop() {
    let (store, proc) = processor();
    let user_id = UserId::new();
    let payload = checkout_completed("sub_1", &user_id, "premium");

    let (body, header) = signed(&payload);
    let first = proc.process(&body, &header).await.unwrap();
    assert_eq!(first, WebhookOutcome::Created);
    assert_eq!(store.status_of("sub_1"), Some(SubscriptionStatus::Active));

    // At-least-once delivery: the same event arrives again.
    let (body, header) = signed(&payload);
    let second = proc.process(&body, &header).await.unwrap();
    assert_eq!(second, WebhookOutcome::Duplicate);
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn payment_failure_then_deletion_walks_the_lifecycle() {
    let (store, proc) = processor();
    let user_id = UserId::new();

    let (body, header) = signed(&checkout_completed("sub_1", &user_id, "basic"));
    proc.process(&body, &header).await.unwrap();

    let (body, header) = signed(&payment_failed("sub_1"));
    let failed = proc.process(&body, &header).await.unwrap();
    assert_eq!(failed, WebhookOutcome::StatusChanged);
    assert_eq!(store.status_of("sub_1"), Some(SubscriptionStatus::PastDue));

    let (body, header) = signed(&subscription_deleted("sub_1"));
    let deleted = proc.process(&body, &header).await.unwrap();
    assert_eq!(deleted, WebhookOutcome::StatusChanged);
    assert_eq!(store.status_of("sub_1"), Some(SubscriptionStatus::Canceled));
}

#[tokio::test]
async fn canceled_subscription_is_never_resurrected() {
    let (store, proc) = processor();
    let user_id = UserId::new();

    let (body, header) = signed(&checkout_completed("sub_1", &user_id, "basic"));
    proc.process(&body, &header).await.unwrap();
    let (body, header) = signed(&subscription_deleted("sub_1"));
    proc.process(&body, &header).await.unwrap();

    // A stale payment-failed event arrives after the deletion.
    let (body, header) = signed(&payment_failed("sub_1"));
    let stale = proc.process(&body, &header).await.unwrap();
    assert_eq!(stale, WebhookOutcome::Refused);
    assert_eq!(store.status_of("sub_1"), Some(SubscriptionStatus::Canceled));
}

#[tokio::test]
async fn tampered_payload_is_rejected_before_any_state_change() {
    let (store, proc) = processor();
    let user_id = UserId::new();
    let payload = checkout_completed("sub_1", &user_id, "premium");

    let (mut body, header) = signed(&payload);
    // Flip one byte after signing.
    let last = body.len() - 1;
    body[last] ^= 0x01;

    let result = proc.process(&body, &header).await;
    assert!(matches!(result, Err(WebhookError::InvalidSignature)));
    assert_eq!(store.len(), 0);
}

#[tokio::test]
async fn replayed_signature_outside_the_window_is_rejected() {
    let (store, proc) = processor();
    let user_id = UserId::new();
    let payload = checkout_completed("sub_1", &user_id, "premium");

    let stale_timestamp = chrono::Utc::now().timestamp() - 600;
    let header = sign_test_payload(SECRET, stale_timestamp, payload.as_bytes());

    let result = proc.process(payload.as_bytes(), &header).await;
    assert!(matches!(result, Err(WebhookError::TimestampOutOfRange)));
    assert_eq!(store.len(), 0);
}

#[tokio::test]
async fn event_for_unknown_subscription_does_not_match() {
    let (_store, proc) = processor();

    let (body, header) = signed(&payment_failed("sub_missing"));
    let outcome = proc.process(&body, &header).await.unwrap();
    assert_eq!(outcome, WebhookOutcome::NoMatch);
}

#[tokio::test]
async fn unrecognized_event_type_is_acknowledged_and_ignored() {
    let (store, proc) = processor();

    let payload = r#"{
        "id": "evt_other",
        "type": "customer.updated",
        "created": 1704067200,
        "data": { "object": { "id": "cus_1" } },
        "livemode": false
    }"#;

    let (body, header) = signed(payload);
    let outcome = proc.process(&body, &header).await.unwrap();
    assert_eq!(outcome, WebhookOutcome::Ignored);
    assert_eq!(store.len(), 0);
}
