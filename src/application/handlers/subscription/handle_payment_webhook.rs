//! Payment webhook processor.
//!
//! Entry point for provider webhook deliveries: authenticate the raw
//! payload, then apply the event through the repository's conditional
//! primitives. Delivery is at-least-once, so every apply path must be
//! idempotent; duplicates and out-of-order arrivals resolve to no-ops.

use std::str::FromStr;
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tracing::{info, warn};

use crate::domain::billing::{
    StripeCheckoutSession, StripeEvent, StripeEventType, StripeInvoice, StripeSubscriptionObject,
    WebhookError, WebhookVerifier,
};
use crate::domain::foundation::{DomainError, UserId};
use crate::domain::subscription::{Plan, Subscription, SubscriptionStatus};
use crate::ports::{SaveOutcome, SubscriptionRepository, TransitionOutcome};

/// What applying a verified event did to local state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// Completed checkout created a new subscription row.
    Created,
    /// Status transition was applied.
    StatusChanged,
    /// Duplicate delivery; the row already existed or already held the
    /// target status's effect. Nothing was written.
    Duplicate,
    /// Transition refused by the state machine (e.g. an event for a
    /// canceled subscription). Nothing was written.
    Refused,
    /// Event references a provider subscription we have no row for.
    NoMatch,
    /// Event type this system does not react to.
    Ignored,
}

impl From<DomainError> for WebhookError {
    fn from(err: DomainError) -> Self {
        WebhookError::Storage(err.to_string())
    }
}

/// Verifies and applies provider webhook deliveries.
pub struct PaymentWebhookProcessor {
    verifier: WebhookVerifier,
    subscriptions: Arc<dyn SubscriptionRepository>,
}

impl PaymentWebhookProcessor {
    pub fn new(
        webhook_secret: &SecretString,
        subscriptions: Arc<dyn SubscriptionRepository>,
    ) -> Self {
        Self {
            verifier: WebhookVerifier::new(webhook_secret.expose_secret().clone()),
            subscriptions,
        }
    }

    /// Authenticates the delivery and applies it.
    ///
    /// The signature is checked over `payload` exactly as received; the
    /// body is parsed only after the signature holds.
    pub async fn process(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<WebhookOutcome, WebhookError> {
        let event = self.verifier.verify_and_parse(payload, signature_header)?;
        self.apply(&event).await
    }

    /// Applies an already-verified event.
    pub async fn apply(&self, event: &StripeEvent) -> Result<WebhookOutcome, WebhookError> {
        let outcome = match event.parsed_type() {
            StripeEventType::CheckoutSessionCompleted => self.apply_checkout(event).await?,
            StripeEventType::InvoicePaymentFailed => {
                self.apply_transition(event, SubscriptionStatus::PastDue)
                    .await?
            }
            StripeEventType::CustomerSubscriptionDeleted => {
                self.apply_transition(event, SubscriptionStatus::Canceled)
                    .await?
            }
            StripeEventType::Unknown => {
                info!(
                    event_id = %event.id,
                    event_type = %event.event_type,
                    "ignoring unhandled webhook event type"
                );
                WebhookOutcome::Ignored
            }
        };

        info!(
            event_id = %event.id,
            event_type = %event.event_type,
            outcome = ?outcome,
            "webhook event applied"
        );
        Ok(outcome)
    }

    /// `checkout.session.completed`: create the subscription row.
    ///
    /// The provider subscription id is the uniqueness key, so a redelivered
    /// checkout event finds the existing row and writes nothing.
    async fn apply_checkout(&self, event: &StripeEvent) -> Result<WebhookOutcome, WebhookError> {
        let session: StripeCheckoutSession = event.deserialize_object()?;

        let provider_subscription_id = session
            .subscription
            .as_deref()
            .ok_or(WebhookError::MissingField("subscription"))?;
        let user_id_raw = session
            .user_id()
            .ok_or(WebhookError::MissingField("metadata.user_id"))?;
        let user_id = UserId::from_str(user_id_raw)
            .map_err(|_| WebhookError::ParseError(format!("invalid user_id '{}'", user_id_raw)))?;
        let plan_raw = session
            .plan()
            .ok_or(WebhookError::MissingField("metadata.plan"))?;
        let plan =
            Plan::parse(plan_raw).map_err(|e| WebhookError::ParseError(e.to_string()))?;

        let subscription = Subscription::from_checkout(user_id, provider_subscription_id, plan);
        match self.subscriptions.create_if_absent(&subscription).await? {
            SaveOutcome::Inserted => Ok(WebhookOutcome::Created),
            SaveOutcome::AlreadyExists => {
                info!(
                    provider_subscription_id,
                    "duplicate checkout delivery, subscription already exists"
                );
                Ok(WebhookOutcome::Duplicate)
            }
        }
    }

    async fn apply_transition(
        &self,
        event: &StripeEvent,
        target: SubscriptionStatus,
    ) -> Result<WebhookOutcome, WebhookError> {
        let provider_subscription_id = match event.parsed_type() {
            StripeEventType::InvoicePaymentFailed => {
                let invoice: StripeInvoice = event.deserialize_object()?;
                invoice
                    .subscription
                    .ok_or(WebhookError::MissingField("subscription"))?
            }
            _ => {
                let object: StripeSubscriptionObject = event.deserialize_object()?;
                object.id
            }
        };

        match self
            .subscriptions
            .transition(&provider_subscription_id, target)
            .await?
        {
            TransitionOutcome::Applied => Ok(WebhookOutcome::StatusChanged),
            TransitionOutcome::Refused => {
                warn!(
                    provider_subscription_id = %provider_subscription_id,
                    target = target.as_str(),
                    "transition refused, subscription status unchanged"
                );
                Ok(WebhookOutcome::Refused)
            }
            TransitionOutcome::NotFound => {
                warn!(
                    provider_subscription_id = %provider_subscription_id,
                    target = target.as_str(),
                    "webhook event references unknown subscription"
                );
                Ok(WebhookOutcome::NoMatch)
            }
        }
    }
}
