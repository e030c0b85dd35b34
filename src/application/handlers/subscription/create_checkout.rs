//! CreateCheckoutHandler - Opens a hosted checkout session.
//!
//! No local row is written here. The subscription appears only when the
//! provider confirms payment via the completed-checkout webhook.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::UserId;
use crate::domain::subscription::Plan;
use crate::ports::{CheckoutSession, PaymentProvider, SubscriptionRepository};

use super::SubscriptionFlowError;

#[derive(Debug, Clone)]
pub struct CreateCheckoutCommand {
    pub user_id: UserId,
    pub email: String,
    pub plan: Plan,
}

pub struct CreateCheckoutHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
    provider: Arc<dyn PaymentProvider>,
}

impl CreateCheckoutHandler {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        provider: Arc<dyn PaymentProvider>,
    ) -> Self {
        Self {
            subscriptions,
            provider,
        }
    }

    /// Opens a checkout session for the caller.
    ///
    /// A user with a live active subscription cannot open a second one;
    /// the webhook would otherwise create overlapping rows.
    pub async fn handle(
        &self,
        cmd: CreateCheckoutCommand,
    ) -> Result<CheckoutSession, SubscriptionFlowError> {
        if self
            .subscriptions
            .find_active_by_user(&cmd.user_id)
            .await?
            .is_some()
        {
            return Err(SubscriptionFlowError::AlreadyActive);
        }

        let session = self
            .provider
            .create_checkout_session(&cmd.user_id, &cmd.email, cmd.plan)
            .await?;

        info!(
            user_id = %cmd.user_id,
            plan = %cmd.plan,
            session_id = %session.id,
            "checkout session created"
        );
        Ok(session)
    }
}
