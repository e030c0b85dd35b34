//! Application layer - Commands, Queries, and Handlers.
//!
//! Orchestrates domain operations and coordinates between ports. Write
//! paths go through command handlers; reads through query handlers.

pub mod handlers;
pub mod token;

pub use handlers::auth::{
    AuthFlowError,
    LoginCommand, LoginHandler, LoginResult,
    LogoutCommand, LogoutHandler,
    RefreshCommand, RefreshHandler, RefreshResult,
    RegisterCommand, RegisterHandler, RegisterResult,
};
pub use handlers::profile::{GetProfileHandler, ProfileFlowError};
pub use handlers::subscription::{
    CancelSubscriptionCommand, CancelSubscriptionHandler,
    CreateCheckoutCommand, CreateCheckoutHandler,
    GetSubscriptionHandler,
    ListActiveSubscriptionsHandler,
    PaymentWebhookProcessor,
    SubscriptionFlowError,
    WebhookOutcome,
};
pub use token::{TokenError, TokenPair, TokenService};
