//! Profile query handlers.

mod get_profile;

pub use get_profile::GetProfileHandler;

use thiserror::Error;

use crate::domain::foundation::DomainError;

/// Failures of the profile flows.
#[derive(Debug, Error)]
pub enum ProfileFlowError {
    #[error("User not found")]
    NotFound,

    #[error("Storage failure: {0}")]
    Storage(String),
}

impl From<DomainError> for ProfileFlowError {
    fn from(err: DomainError) -> Self {
        ProfileFlowError::Storage(err.to_string())
    }
}
