//! PostgreSQL adapters.
//!
//! sqlx-backed implementations of the repository ports.

mod revoked_token_repository;
mod subscription_repository;
mod user_repository;

pub use revoked_token_repository::PostgresRevokedTokenRepository;
pub use subscription_repository::PostgresSubscriptionRepository;
pub use user_repository::PostgresUserRepository;
