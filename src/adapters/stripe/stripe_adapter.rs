//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` port over Stripe's form-encoded REST
//! API. Every call carries a bounded timeout; a hung provider surfaces as
//! a retryable `Timeout` instead of stalling the request path.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::error;

use crate::config::PaymentConfig;
use crate::domain::foundation::UserId;
use crate::domain::subscription::Plan;
use crate::ports::{CheckoutSession, PaymentError, PaymentProvider};

/// Per-request deadline for Stripe API calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    api_key: SecretString,

    /// Base URL for the Stripe API.
    api_base_url: String,

    /// Price id per plan.
    basic_price_id: Option<String>,
    premium_price_id: Option<String>,

    /// Redirect targets for hosted checkout.
    success_url: String,
    cancel_url: String,
}

impl StripeConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            api_base_url: "https://api.stripe.com".to_string(),
            basic_price_id: None,
            premium_price_id: None,
            success_url: "http://localhost:5173/billing/success".to_string(),
            cancel_url: "http://localhost:5173/billing/cancel".to_string(),
        }
    }

    /// Build from the application's payment section.
    pub fn from_payment_config(config: &PaymentConfig) -> Self {
        Self {
            api_key: config.stripe_api_key.clone(),
            api_base_url: "https://api.stripe.com".to_string(),
            basic_price_id: config.stripe_basic_price_id.clone(),
            premium_price_id: config.stripe_premium_price_id.clone(),
            success_url: config.checkout_success_url.clone(),
            cancel_url: config.checkout_cancel_url.clone(),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_price_ids(
        mut self,
        basic: impl Into<String>,
        premium: impl Into<String>,
    ) -> Self {
        self.basic_price_id = Some(basic.into());
        self.premium_price_id = Some(premium.into());
        self
    }
}

/// Stripe implementation of the PaymentProvider port.
pub struct StripePaymentAdapter {
    config: StripeConfig,
    http_client: reqwest::Client,
}

/// Subset of Stripe's checkout session response we read.
#[derive(Debug, Deserialize)]
struct StripeCheckoutSessionResponse {
    id: String,
    url: Option<String>,
}

impl StripePaymentAdapter {
    /// Create a new Stripe adapter with the given configuration.
    pub fn new(config: StripeConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            config,
            http_client,
        }
    }

    fn price_id(&self, plan: Plan) -> Result<&str, PaymentError> {
        let price_id = match plan {
            Plan::Basic => self.config.basic_price_id.as_deref(),
            Plan::Premium => self.config.premium_price_id.as_deref(),
        };
        price_id.ok_or_else(|| {
            PaymentError::Config(format!("no Stripe price id configured for plan '{}'", plan))
        })
    }
}

fn map_transport_error(e: reqwest::Error) -> PaymentError {
    if e.is_timeout() {
        PaymentError::Timeout
    } else {
        PaymentError::Transport(e.to_string())
    }
}

#[async_trait]
impl PaymentProvider for StripePaymentAdapter {
    async fn create_checkout_session(
        &self,
        user_id: &UserId,
        email: &str,
        plan: Plan,
    ) -> Result<CheckoutSession, PaymentError> {
        let url = format!("{}/v1/checkout/sessions", self.config.api_base_url);
        let price_id = self.price_id(plan)?;

        // metadata ties the provider subscription back to the local user
        // when the completed-checkout webhook arrives.
        let params = vec![
            ("mode", "subscription".to_string()),
            ("customer_email", email.to_string()),
            ("line_items[0][price]", price_id.to_string()),
            ("line_items[0][quantity]", "1".to_string()),
            ("success_url", self.config.success_url.clone()),
            ("cancel_url", self.config.cancel_url.clone()),
            ("metadata[user_id]", user_id.to_string()),
            ("metadata[plan]", plan.to_string()),
        ];

        let response = self
            .http_client
            .post(&url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .form(&params)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!(status = %status, error = %error_text, "Stripe checkout session failed");
            return Err(PaymentError::Upstream {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let session: StripeCheckoutSessionResponse = response
            .json()
            .await
            .map_err(|e| PaymentError::InvalidResponse(e.to_string()))?;

        let checkout_url = session
            .url
            .unwrap_or_else(|| format!("https://checkout.stripe.com/c/pay/{}", session.id));

        Ok(CheckoutSession {
            id: session.id,
            url: checkout_url,
        })
    }

    async fn cancel_at_period_end(
        &self,
        provider_subscription_id: &str,
    ) -> Result<(), PaymentError> {
        let url = format!(
            "{}/v1/subscriptions/{}",
            self.config.api_base_url, provider_subscription_id
        );

        let response = self
            .http_client
            .post(&url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .form(&[("cancel_at_period_end", "true")])
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!(
                status = %status,
                provider_subscription_id,
                error = %error_text,
                "Stripe cancellation failed"
            );
            return Err(PaymentError::Upstream {
                status: status.as_u16(),
                message: error_text,
            });
        }

        Ok(())
    }
}
