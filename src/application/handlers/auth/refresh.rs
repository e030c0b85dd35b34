//! RefreshHandler - Command handler for access-token refresh.

use std::sync::Arc;

use crate::application::token::TokenService;

use super::AuthFlowError;

/// Command to exchange a refresh token for a new access token.
#[derive(Debug, Clone)]
pub struct RefreshCommand {
    pub refresh_token: String,
}

/// Result of a successful refresh. The refresh token is not rotated.
#[derive(Debug, Clone)]
pub struct RefreshResult {
    pub access_token: String,
}

/// Handler for refresh-token exchange.
pub struct RefreshHandler {
    tokens: Arc<TokenService>,
}

impl RefreshHandler {
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }

    pub async fn handle(&self, cmd: RefreshCommand) -> Result<RefreshResult, AuthFlowError> {
        let access_token = self.tokens.refresh(&cmd.refresh_token).await?;
        Ok(RefreshResult { access_token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::auth::testing::InMemoryUsers;
    use crate::application::token::TokenService;
    use crate::domain::foundation::{DomainError, Role};
    use crate::domain::user::User;
    use crate::ports::RevokedTokenRepository;
    use async_trait::async_trait;
    use secrecy::SecretString;

    struct NoRevocations;

    #[async_trait]
    impl RevokedTokenRepository for NoRevocations {
        async fn revoke(&self, _token: &str) -> Result<(), DomainError> {
            Ok(())
        }

        async fn is_revoked(&self, _token: &str) -> Result<bool, DomainError> {
            Ok(false)
        }

        async fn delete_revoked_before(
            &self,
            _cutoff: chrono::DateTime<chrono::Utc>,
        ) -> Result<u64, DomainError> {
            Ok(0)
        }
    }

    #[tokio::test]
    async fn refresh_yields_new_access_token() {
        let user = User::new("alice@example.com", "hash", Role::User);
        let users = Arc::new(InMemoryUsers::with_user(user.clone()));
        let tokens = Arc::new(TokenService::new(
            &SecretString::new("refresh-test-secret".to_string()),
            3600,
            7 * 24 * 3600,
            users,
            Arc::new(NoRevocations),
        ));
        let pair = tokens.issue(&user).await.unwrap();
        let handler = RefreshHandler::new(tokens.clone());

        let result = handler
            .handle(RefreshCommand {
                refresh_token: pair.refresh_token,
            })
            .await
            .unwrap();

        let claims = tokens.verify(&result.access_token).await.unwrap();
        assert_eq!(claims.sub, user.id);
    }

    #[tokio::test]
    async fn garbage_refresh_token_maps_to_unauthenticated() {
        let users = Arc::new(InMemoryUsers::new());
        let tokens = Arc::new(TokenService::new(
            &SecretString::new("refresh-test-secret".to_string()),
            3600,
            7 * 24 * 3600,
            users,
            Arc::new(NoRevocations),
        ));
        let handler = RefreshHandler::new(tokens);

        let result = handler
            .handle(RefreshCommand {
                refresh_token: "not.a.token".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AuthFlowError::Unauthenticated)));
    }
}
