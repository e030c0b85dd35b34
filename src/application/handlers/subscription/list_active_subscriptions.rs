//! ListActiveSubscriptionsHandler - Privileged query over all active rows.
//!
//! Admin-only at the HTTP boundary; the handler itself carries no role
//! check, authorization happens in the routing layer.

use std::sync::Arc;

use crate::domain::subscription::Subscription;
use crate::ports::SubscriptionRepository;

use super::SubscriptionFlowError;

pub struct ListActiveSubscriptionsHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
}

impl ListActiveSubscriptionsHandler {
    pub fn new(subscriptions: Arc<dyn SubscriptionRepository>) -> Self {
        Self { subscriptions }
    }

    pub async fn handle(&self) -> Result<Vec<Subscription>, SubscriptionFlowError> {
        Ok(self.subscriptions.list_active().await?)
    }
}
