//! CancelSubscriptionHandler - User-initiated cancellation.
//!
//! Ordering matters: the provider is told to cancel before the local row
//! changes. If the provider call fails, local state is untouched and the
//! caller can retry; billing never silently continues after we report
//! success.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::UserId;
use crate::domain::subscription::{Subscription, SubscriptionStatus};
use crate::ports::{PaymentProvider, SubscriptionRepository, TransitionOutcome};

use super::SubscriptionFlowError;

#[derive(Debug, Clone)]
pub struct CancelSubscriptionCommand {
    pub user_id: UserId,
}

pub struct CancelSubscriptionHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
    provider: Arc<dyn PaymentProvider>,
}

impl CancelSubscriptionHandler {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        provider: Arc<dyn PaymentProvider>,
    ) -> Self {
        Self {
            subscriptions,
            provider,
        }
    }

    /// Cancels the caller's active subscription.
    ///
    /// With no active subscription the provider is never called. The
    /// local transition runs after the provider accepts; a concurrent
    /// provider-initiated deletion landing first leaves the row canceled,
    /// which is the outcome the caller asked for.
    pub async fn handle(
        &self,
        cmd: CancelSubscriptionCommand,
    ) -> Result<Subscription, SubscriptionFlowError> {
        let subscription = self
            .subscriptions
            .find_active_by_user(&cmd.user_id)
            .await?
            .ok_or(SubscriptionFlowError::NotFound)?;

        self.provider
            .cancel_at_period_end(&subscription.provider_subscription_id)
            .await?;

        match self
            .subscriptions
            .transition(
                &subscription.provider_subscription_id,
                SubscriptionStatus::Canceled,
            )
            .await?
        {
            TransitionOutcome::Applied | TransitionOutcome::Refused => {}
            TransitionOutcome::NotFound => return Err(SubscriptionFlowError::NotFound),
        }

        info!(
            user_id = %cmd.user_id,
            provider_subscription_id = %subscription.provider_subscription_id,
            "subscription canceled by user"
        );

        self.subscriptions
            .find_by_provider_id(&subscription.provider_subscription_id)
            .await?
            .ok_or(SubscriptionFlowError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::subscription::testing::InMemorySubscriptions;
    use crate::domain::subscription::Plan;
    use crate::ports::{CheckoutSession, PaymentError};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct MockProvider {
        cancel_calls: AtomicU32,
        fail: bool,
    }

    impl MockProvider {
        fn new() -> Self {
            Self {
                cancel_calls: AtomicU32::new(0),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                cancel_calls: AtomicU32::new(0),
                fail: true,
            }
        }
    }

    #[async_trait]
    impl PaymentProvider for MockProvider {
        async fn create_checkout_session(
            &self,
            _user_id: &UserId,
            _email: &str,
            _plan: Plan,
        ) -> Result<CheckoutSession, PaymentError> {
            unimplemented!("not used by cancellation tests")
        }

        async fn cancel_at_period_end(
            &self,
            _provider_subscription_id: &str,
        ) -> Result<(), PaymentError> {
            self.cancel_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(PaymentError::Timeout)
            } else {
                Ok(())
            }
        }
    }

    #[tokio::test]
    async fn cancel_transitions_active_subscription_to_canceled() {
        let user_id = UserId::new();
        let subs = Arc::new(InMemorySubscriptions::with_rows(vec![
            Subscription::from_checkout(user_id, "sub_cancel", Plan::Premium),
        ]));
        let provider = Arc::new(MockProvider::new());
        let handler = CancelSubscriptionHandler::new(subs.clone(), provider.clone());

        let canceled = handler
            .handle(CancelSubscriptionCommand { user_id })
            .await
            .unwrap();

        assert_eq!(canceled.status, SubscriptionStatus::Canceled);
        assert_eq!(
            subs.status_of("sub_cancel"),
            Some(SubscriptionStatus::Canceled)
        );
        assert_eq!(provider.cancel_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn cancel_without_active_subscription_never_calls_provider() {
        let subs = Arc::new(InMemorySubscriptions::new());
        let provider = Arc::new(MockProvider::new());
        let handler = CancelSubscriptionHandler::new(subs, provider.clone());

        let result = handler
            .handle(CancelSubscriptionCommand {
                user_id: UserId::new(),
            })
            .await;

        assert!(matches!(result, Err(SubscriptionFlowError::NotFound)));
        assert_eq!(provider.cancel_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn provider_failure_leaves_local_state_unchanged() {
        let user_id = UserId::new();
        let subs = Arc::new(InMemorySubscriptions::with_rows(vec![
            Subscription::from_checkout(user_id, "sub_keep", Plan::Basic),
        ]));
        let provider = Arc::new(MockProvider::failing());
        let handler = CancelSubscriptionHandler::new(subs.clone(), provider);

        let result = handler.handle(CancelSubscriptionCommand { user_id }).await;

        assert!(matches!(result, Err(SubscriptionFlowError::Payment(_))));
        assert_eq!(subs.status_of("sub_keep"), Some(SubscriptionStatus::Active));
    }
}
