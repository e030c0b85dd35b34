//! Webhook processing errors.

use thiserror::Error;

/// Errors raised while authenticating and applying a webhook delivery.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WebhookError {
    /// Signature did not match the configured secret. Checked over the
    /// exact raw payload bytes, before any parsing.
    #[error("Webhook signature verification failed")]
    InvalidSignature,

    /// Event timestamp is older than the replay window.
    #[error("Webhook timestamp outside acceptable range")]
    TimestampOutOfRange,

    /// Event timestamp is too far in the future.
    #[error("Webhook timestamp is in the future")]
    InvalidTimestamp,

    /// Header or payload could not be parsed.
    #[error("Webhook parse error: {0}")]
    ParseError(String),

    /// Event is well-formed but carries no field we can reconcile on.
    #[error("Webhook event missing required field: {0}")]
    MissingField(&'static str),

    /// Persistence failure while applying the event. Logged and swallowed
    /// at the HTTP boundary; provider redelivery is the retry path.
    #[error("Storage failure while applying webhook: {0}")]
    Storage(String),
}
