//! LogoutHandler - Command handler for session revocation.

use std::sync::Arc;

use crate::application::token::TokenService;
use crate::domain::foundation::UserId;

use super::AuthFlowError;

/// Command to log a user out: revoke the presented access token and
/// invalidate any outstanding refresh token.
#[derive(Debug, Clone)]
pub struct LogoutCommand {
    pub user_id: UserId,
    pub access_token: String,
}

/// Handler for logout.
pub struct LogoutHandler {
    tokens: Arc<TokenService>,
}

impl LogoutHandler {
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }

    pub async fn handle(&self, cmd: LogoutCommand) -> Result<(), AuthFlowError> {
        self.tokens.revoke(&cmd.user_id, &cmd.access_token).await?;
        Ok(())
    }
}
