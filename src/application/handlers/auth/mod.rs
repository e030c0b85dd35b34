//! Auth command handlers: register, login, refresh, logout.

mod login;
mod logout;
mod refresh;
mod register;

pub use login::{LoginCommand, LoginHandler, LoginResult};
pub use logout::{LogoutCommand, LogoutHandler};
pub use refresh::{RefreshCommand, RefreshHandler, RefreshResult};
pub use register::{RegisterCommand, RegisterHandler, RegisterResult};

use thiserror::Error;

use crate::application::token::TokenError;
use crate::domain::foundation::{DomainError, ErrorCode};

/// Failures of the auth flows.
///
/// `Unauthenticated` deliberately covers every credential failure
/// (unknown email, wrong password, bad or revoked token) so the boundary
/// can emit one opaque response regardless of root cause.
#[derive(Debug, Error)]
pub enum AuthFlowError {
    #[error("Authentication failed")]
    Unauthenticated,

    #[error("Email is already registered")]
    EmailTaken,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Storage failure: {0}")]
    Storage(String),
}

impl From<DomainError> for AuthFlowError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::EmailTaken => AuthFlowError::EmailTaken,
            ErrorCode::ValidationFailed | ErrorCode::InvalidFormat => {
                AuthFlowError::Validation(err.message)
            }
            _ => AuthFlowError::Storage(err.to_string()),
        }
    }
}

impl From<TokenError> for AuthFlowError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Storage(msg) => AuthFlowError::Storage(msg),
            // Revoked, invalid, and unknown-subject all collapse into the
            // opaque variant.
            _ => AuthFlowError::Unauthenticated,
        }
    }
}
