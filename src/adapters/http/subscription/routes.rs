//! Axum router configuration for subscription endpoints.
//!
//! This module defines the route structure for subscription-related API
//! endpoints and wires them to their corresponding handlers.

use axum::{
    routing::{delete, get, post},
    Router,
};

use super::handlers::{
    cancel_subscription, create_checkout, get_my_subscription, handle_stripe_webhook,
    list_active_subscriptions, SubscriptionAppState,
};

/// Create the subscription API router.
///
/// # Routes
///
/// ## User Endpoints (require authentication)
/// - `GET /me` - Get the caller's latest subscription
/// - `DELETE /cancel` - Cancel the caller's active subscription
///
/// ## Admin Endpoints (require admin role)
/// - `GET /active` - List all live subscriptions
pub fn subscription_routes() -> Router<SubscriptionAppState> {
    Router::new()
        // User endpoints
        .route("/me", get(get_my_subscription))
        .route("/cancel", delete(cancel_subscription))
        // Admin endpoints
        .route("/active", get(list_active_subscriptions))
}

/// Create the Stripe-facing router.
///
/// Checkout is authenticated; the webhook endpoint carries no user
/// authentication and is verified via signature instead.
///
/// # Routes
/// - `POST /checkout` - Open a hosted checkout session
/// - `POST /webhook` - Handle payment provider webhooks
pub fn stripe_routes() -> Router<SubscriptionAppState> {
    Router::new()
        .route("/checkout", post(create_checkout))
        .route("/webhook", post(handle_stripe_webhook))
}

/// Create the complete subscription module router.
///
/// Combines user/admin routes and Stripe routes into a single router
/// suitable for mounting under `/api`.
pub fn subscription_router() -> Router<SubscriptionAppState> {
    Router::new()
        .nest("/subscriptions", subscription_routes())
        .nest("/stripe", stripe_routes())
}
