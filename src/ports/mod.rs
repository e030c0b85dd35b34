//! Ports: async traits at the seams between the core and its
//! collaborators. Adapters implement them; the application layer depends
//! only on these interfaces.

mod password_hasher;
mod payment_provider;
mod revoked_token_repository;
mod subscription_repository;
mod user_repository;

pub use password_hasher::{HashError, PasswordHasher};
pub use payment_provider::{CheckoutSession, PaymentError, PaymentProvider};
pub use revoked_token_repository::RevokedTokenRepository;
pub use subscription_repository::{SaveOutcome, SubscriptionRepository, TransitionOutcome};
pub use user_repository::UserRepository;
