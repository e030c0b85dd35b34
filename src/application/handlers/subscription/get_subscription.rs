//! GetSubscriptionHandler - The caller's own subscription view.

use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::subscription::Subscription;
use crate::ports::SubscriptionRepository;

use super::SubscriptionFlowError;

pub struct GetSubscriptionHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
}

impl GetSubscriptionHandler {
    pub fn new(subscriptions: Arc<dyn SubscriptionRepository>) -> Self {
        Self { subscriptions }
    }

    /// The caller's most recent subscription in any status, if one exists.
    pub async fn handle(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Subscription>, SubscriptionFlowError> {
        Ok(self.subscriptions.find_latest_by_user(user_id).await?)
    }
}
