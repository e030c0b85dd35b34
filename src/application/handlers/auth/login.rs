//! LoginHandler - Command handler for password login.

use std::sync::Arc;

use tracing::{debug, info};

use crate::application::token::{TokenPair, TokenService};
use crate::domain::foundation::{Role, UserId};
use crate::ports::{PasswordHasher, UserRepository};

use super::AuthFlowError;

/// Command to log a user in.
#[derive(Debug, Clone)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub user_id: UserId,
    pub role: Role,
    pub tokens: TokenPair,
}

/// Handler for password login.
///
/// Unknown email and wrong password both fail with the same opaque
/// `Unauthenticated` error. Nothing in the result distinguishes which
/// check failed.
pub struct LoginHandler {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<TokenService>,
}

impl LoginHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    pub async fn handle(&self, cmd: LoginCommand) -> Result<LoginResult, AuthFlowError> {
        let user = match self.users.find_by_email(&cmd.email).await? {
            Some(user) => user,
            None => {
                debug!("login attempt for unknown email");
                return Err(AuthFlowError::Unauthenticated);
            }
        };

        let matches = self
            .hasher
            .verify(&cmd.password, &user.password_hash)
            .map_err(|e| AuthFlowError::Storage(e.to_string()))?;
        if !matches {
            debug!(user_id = %user.id, "login attempt with wrong password");
            return Err(AuthFlowError::Unauthenticated);
        }

        let tokens = self.tokens.issue(&user).await?;

        info!(user_id = %user.id, "login succeeded");
        Ok(LoginResult {
            user_id: user.id,
            role: user.role,
            tokens,
        })
    }
}
