//! HTTP adapter for subscription endpoints.
//!
//! Exposes the subscription domain via REST API:
//! - `GET /api/subscriptions/me` - Get the caller's latest subscription
//! - `DELETE /api/subscriptions/cancel` - Cancel the caller's active subscription
//! - `GET /api/subscriptions/active` - List all live subscriptions (admin)
//! - `POST /api/stripe/checkout` - Open a hosted checkout session
//! - `POST /api/stripe/webhook` - Handle payment webhooks (signature verified)

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::SubscriptionAppState;
pub use routes::{stripe_routes, subscription_router, subscription_routes};
