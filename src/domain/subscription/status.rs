//! Subscription status state machine.
//!
//! Status only ever moves forward through the billing lifecycle. Absence
//! of a row is the implicit initial state; rows are created exclusively by
//! a completed checkout. Every transition is idempotent under at-least-once
//! webhook delivery: re-applying an event either hits the self-transition
//! or is refused.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

/// Subscription billing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// Paid up, access granted.
    Active,

    /// Most recent invoice payment failed; provider is retrying.
    PastDue,

    /// Ended, either provider-initiated or by user request.
    /// Terminal: a canceled subscription never becomes active again.
    Canceled,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::PastDue => "past_due",
            SubscriptionStatus::Canceled => "canceled",
        }
    }
}

impl StateMachine for SubscriptionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SubscriptionStatus::*;
        matches!(
            (self, target),
            // From ACTIVE
            (Active, PastDue)
                | (Active, Canceled)
            // From PAST_DUE
                | (PastDue, PastDue) // duplicate payment-failed delivery
                | (PastDue, Canceled)
            // From CANCELED
                | (Canceled, Canceled) // duplicate deletion delivery
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SubscriptionStatus::*;
        match self {
            Active => vec![PastDue, Canceled],
            PastDue => vec![PastDue, Canceled],
            Canceled => vec![Canceled],
        }
    }
}
