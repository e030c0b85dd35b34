//! Billing domain: Stripe event envelope and webhook authenticity.

mod errors;
mod stripe_event;
mod webhook_verifier;

pub use errors::WebhookError;
pub use stripe_event::{
    StripeCheckoutSession, StripeEvent, StripeEventData, StripeEventType, StripeInvoice,
    StripeSubscriptionObject,
};
pub use webhook_verifier::{hex_encode, sign_test_payload, SignatureHeader, WebhookVerifier};
