//! Payment configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Payment configuration (Stripe)
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Stripe API key
    pub stripe_api_key: SecretString,

    /// Stripe webhook signing secret
    pub stripe_webhook_secret: SecretString,

    /// Stripe price ID for the basic plan
    pub stripe_basic_price_id: Option<String>,

    /// Stripe price ID for the premium plan
    pub stripe_premium_price_id: Option<String>,

    /// URL the customer lands on after a successful checkout
    #[serde(default = "default_success_url")]
    pub checkout_success_url: String,

    /// URL the customer lands on after abandoning checkout
    #[serde(default = "default_cancel_url")]
    pub checkout_cancel_url: String,
}

fn default_success_url() -> String {
    "http://localhost:5173/billing/success".to_string()
}

fn default_cancel_url() -> String {
    "http://localhost:5173/billing/cancel".to_string()
}

impl PaymentConfig {
    /// Check if using Stripe test mode
    pub fn is_test_mode(&self) -> bool {
        self.stripe_api_key.expose_secret().starts_with("sk_test_")
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.stripe_api_key.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_API_KEY"));
        }
        if self.stripe_webhook_secret.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_WEBHOOK_SECRET"));
        }

        // Key prefixes catch a publishable key pasted into the secret slot.
        if !self.stripe_api_key.expose_secret().starts_with("sk_") {
            return Err(ValidationError::InvalidStripeKey);
        }
        if !self
            .stripe_webhook_secret
            .expose_secret()
            .starts_with("whsec_")
        {
            return Err(ValidationError::InvalidStripeWebhookSecret);
        }

        Ok(())
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            stripe_api_key: SecretString::new(String::new()),
            stripe_webhook_secret: SecretString::new(String::new()),
            stripe_basic_price_id: None,
            stripe_premium_price_id: None,
            checkout_success_url: default_success_url(),
            checkout_cancel_url: default_cancel_url(),
        }
    }
}
