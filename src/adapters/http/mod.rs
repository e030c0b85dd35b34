//! HTTP adapters - REST API implementations.
//!
//! Each domain module has its own HTTP adapter for endpoint exposure.

pub mod auth;
pub mod middleware;
pub mod profile;
pub mod subscription;

// Re-export key types for convenience
pub use auth::auth_routes;
pub use auth::AuthAppState;
pub use profile::profile_routes;
pub use profile::ProfileAppState;
pub use subscription::subscription_router;
pub use subscription::SubscriptionAppState;
