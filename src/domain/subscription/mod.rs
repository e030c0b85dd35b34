//! Subscription domain: record, plan, and status state machine.

mod plan;
mod status;
#[allow(clippy::module_inception)]
mod subscription;

pub use plan::Plan;
pub use status::SubscriptionStatus;
pub use subscription::Subscription;
