//! HTTP handlers for subscription endpoints.
//!
//! These handlers connect Axum routes to application layer command handlers.
//! The webhook handler is the one place where failures after signature
//! verification do not become error responses: the provider retries on
//! non-2xx, redelivery is the recovery path for a failed write, and a
//! malformed body would be redelivered byte-identical, so both cases are
//! acknowledged and logged.

use std::sync::Arc;

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::auth::ErrorResponse;
use crate::adapters::http::middleware::{RequireAdmin, RequireAuth};
use crate::application::handlers::subscription::{
    CancelSubscriptionCommand, CancelSubscriptionHandler, CreateCheckoutCommand,
    CreateCheckoutHandler, GetSubscriptionHandler, ListActiveSubscriptionsHandler,
    PaymentWebhookProcessor, SubscriptionFlowError, WebhookOutcome,
};
use crate::domain::billing::WebhookError;
use crate::ports::{PaymentProvider, SubscriptionRepository};

use super::dto::{
    CheckoutResponse, CreateCheckoutRequest, SubscriptionListResponse, SubscriptionResponse,
    WebhookAckResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all subscription dependencies.
///
/// This struct is cloned for each request and contains Arc-wrapped dependencies
/// for efficient sharing across handlers.
#[derive(Clone)]
pub struct SubscriptionAppState {
    pub subscriptions: Arc<dyn SubscriptionRepository>,
    pub payment_provider: Arc<dyn PaymentProvider>,
    pub webhook_processor: Arc<PaymentWebhookProcessor>,
}

impl SubscriptionAppState {
    /// Create handlers on demand from the shared state.
    pub fn create_checkout_handler(&self) -> CreateCheckoutHandler {
        CreateCheckoutHandler::new(self.subscriptions.clone(), self.payment_provider.clone())
    }

    pub fn get_subscription_handler(&self) -> GetSubscriptionHandler {
        GetSubscriptionHandler::new(self.subscriptions.clone())
    }

    pub fn list_active_handler(&self) -> ListActiveSubscriptionsHandler {
        ListActiveSubscriptionsHandler::new(self.subscriptions.clone())
    }

    pub fn cancel_handler(&self) -> CancelSubscriptionHandler {
        CancelSubscriptionHandler::new(self.subscriptions.clone(), self.payment_provider.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/stripe/checkout - Open a hosted checkout session
pub async fn create_checkout(
    State(state): State<SubscriptionAppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<CreateCheckoutRequest>,
) -> Result<impl IntoResponse, SubscriptionApiError> {
    let handler = state.create_checkout_handler();
    let session = handler
        .handle(CreateCheckoutCommand {
            user_id: user.id,
            email: user.email,
            plan: request.plan,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(CheckoutResponse::from(session))))
}

/// GET /api/subscriptions/me - Get the caller's latest subscription
pub async fn get_my_subscription(
    State(state): State<SubscriptionAppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, SubscriptionApiError> {
    let handler = state.get_subscription_handler();
    let subscription = handler
        .handle(&user.id)
        .await?
        .ok_or(SubscriptionFlowError::NotFound)?;

    Ok(Json(SubscriptionResponse::from(subscription)))
}

/// GET /api/subscriptions/active - List all live subscriptions (admin)
pub async fn list_active_subscriptions(
    State(state): State<SubscriptionAppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<impl IntoResponse, SubscriptionApiError> {
    let handler = state.list_active_handler();
    let subscriptions = handler.handle().await?;

    let items: Vec<SubscriptionResponse> = subscriptions
        .into_iter()
        .map(SubscriptionResponse::from)
        .collect();
    let count = items.len();

    Ok(Json(SubscriptionListResponse {
        subscriptions: items,
        count,
    }))
}

/// DELETE /api/subscriptions/cancel - Cancel the caller's active subscription
pub async fn cancel_subscription(
    State(state): State<SubscriptionAppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, SubscriptionApiError> {
    let handler = state.cancel_handler();
    let subscription = handler
        .handle(CancelSubscriptionCommand { user_id: user.id })
        .await?;

    Ok(Json(SubscriptionResponse::from(subscription)))
}

/// POST /api/stripe/webhook - Handle payment provider webhook events
///
/// The body is taken as raw bytes so the signature check runs over the
/// payload exactly as it arrived on the wire.
pub async fn handle_stripe_webhook(
    State(state): State<SubscriptionAppState>,
    headers: axum::http::HeaderMap,
    body: axum::body::Bytes,
) -> axum::response::Response {
    let signature = match headers.get("Stripe-Signature").and_then(|v| v.to_str().ok()) {
        Some(sig) => sig,
        None => {
            let body = ErrorResponse::new("MISSING_SIGNATURE", "Missing Stripe-Signature header");
            return (StatusCode::BAD_REQUEST, Json(body)).into_response();
        }
    };

    match state.webhook_processor.process(&body, signature).await {
        Ok(outcome) => {
            match outcome {
                WebhookOutcome::Created | WebhookOutcome::StatusChanged => {
                    tracing::info!(?outcome, "Webhook event applied");
                }
                WebhookOutcome::Duplicate | WebhookOutcome::Ignored => {
                    tracing::debug!(?outcome, "Webhook event had no effect");
                }
                WebhookOutcome::Refused | WebhookOutcome::NoMatch => {
                    tracing::warn!(?outcome, "Webhook event could not be reconciled");
                }
            }
            (StatusCode::OK, Json(WebhookAckResponse { received: true })).into_response()
        }
        Err(
            err @ (WebhookError::InvalidSignature
            | WebhookError::TimestampOutOfRange
            | WebhookError::InvalidTimestamp),
        ) => {
            tracing::warn!("Webhook rejected: {}", err);
            let body = ErrorResponse::new("INVALID_WEBHOOK_SIGNATURE", err.to_string());
            (StatusCode::BAD_REQUEST, Json(body)).into_response()
        }
        Err(err @ (WebhookError::ParseError(_) | WebhookError::MissingField(_))) => {
            // The signature already proved the payload authentic, and a
            // redelivery would carry the same bytes. Ack so the provider
            // stops retrying an event we can never use.
            tracing::warn!("Webhook body unusable, acknowledging: {}", err);
            (StatusCode::OK, Json(WebhookAckResponse { received: true })).into_response()
        }
        Err(WebhookError::Storage(msg)) => {
            // Acknowledged anyway. The event was authentic; the provider's
            // redelivery will retry the write.
            tracing::error!("Webhook apply failed, acknowledging for redelivery: {}", msg);
            (StatusCode::OK, Json(WebhookAckResponse { received: true })).into_response()
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts subscription flow errors to HTTP responses.
pub struct SubscriptionApiError(SubscriptionFlowError);

impl From<SubscriptionFlowError> for SubscriptionApiError {
    fn from(err: SubscriptionFlowError) -> Self {
        Self(err)
    }
}

impl IntoResponse for SubscriptionApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, code, message) = match &self.0 {
            SubscriptionFlowError::NotFound => (
                StatusCode::NOT_FOUND,
                "SUBSCRIPTION_NOT_FOUND",
                "No subscription found".to_string(),
            ),
            SubscriptionFlowError::AlreadyActive => (
                StatusCode::CONFLICT,
                "SUBSCRIPTION_ACTIVE",
                "An active subscription already exists".to_string(),
            ),
            SubscriptionFlowError::Payment(err) => {
                tracing::error!("Payment provider failure: {}", err);
                let status = if err.is_retryable() {
                    StatusCode::SERVICE_UNAVAILABLE
                } else {
                    StatusCode::BAD_GATEWAY
                };
                (status, "PAYMENT_PROVIDER_ERROR", "Payment provider unavailable".to_string())
            }
            SubscriptionFlowError::Storage(msg) => {
                tracing::error!("Subscription storage failure: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = ErrorResponse::new(code, message);
        (status, Json(body)).into_response()
    }
}
