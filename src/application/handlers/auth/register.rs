//! RegisterHandler - Command handler for user registration.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{Role, UserId};
use crate::domain::user::User;
use crate::ports::{PasswordHasher, UserRepository};

use super::AuthFlowError;

/// Command to register a new user.
#[derive(Debug, Clone)]
pub struct RegisterCommand {
    pub email: String,
    pub password: String,
    /// Defaults to `Role::User` when absent.
    pub role: Option<Role>,
}

/// Result of successful registration. The password hash stays internal.
#[derive(Debug, Clone)]
pub struct RegisterResult {
    pub user_id: UserId,
    pub email: String,
    pub role: Role,
}

/// Handler for registering users.
pub struct RegisterHandler {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl RegisterHandler {
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { users, hasher }
    }

    pub async fn handle(&self, cmd: RegisterCommand) -> Result<RegisterResult, AuthFlowError> {
        if cmd.email.trim().is_empty() || !cmd.email.contains('@') {
            return Err(AuthFlowError::Validation(
                "email must be a valid address".to_string(),
            ));
        }
        if cmd.password.is_empty() {
            return Err(AuthFlowError::Validation(
                "password must not be empty".to_string(),
            ));
        }

        let password_hash = self
            .hasher
            .hash(&cmd.password)
            .map_err(|e| AuthFlowError::Storage(e.to_string()))?;

        let user = User::new(cmd.email, password_hash, cmd.role.unwrap_or(Role::User));
        self.users.create(&user).await?;

        info!(user_id = %user.id, "user registered");
        Ok(RegisterResult {
            user_id: user.id,
            email: user.email,
            role: user.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::auth::testing::{InMemoryUsers, PlainHasher};

    #[tokio::test]
    async fn register_creates_user_with_hashed_password() {
        let users = Arc::new(InMemoryUsers::new());
        let handler = RegisterHandler::new(users.clone(), Arc::new(PlainHasher));

        let result = handler
            .handle(RegisterCommand {
                email: "alice@example.com".to_string(),
                password: "pw123".to_string(),
                role: None,
            })
            .await
            .unwrap();

        assert_eq!(result.role, Role::User);
        let stored = users.by_email("alice@example.com").unwrap();
        assert_ne!(stored.password_hash, "pw123");
        assert_eq!(stored.password_hash, PlainHasher::hash_of("pw123"));
    }

    #[tokio::test]
    async fn register_defaults_role_to_user() {
        let handler =
            RegisterHandler::new(Arc::new(InMemoryUsers::new()), Arc::new(PlainHasher));

        let result = handler
            .handle(RegisterCommand {
                email: "bob@example.com".to_string(),
                password: "secret".to_string(),
                role: None,
            })
            .await
            .unwrap();

        assert_eq!(result.role, Role::User);
    }

    #[tokio::test]
    async fn register_honors_explicit_admin_role() {
        let handler =
            RegisterHandler::new(Arc::new(InMemoryUsers::new()), Arc::new(PlainHasher));

        let result = handler
            .handle(RegisterCommand {
                email: "root@example.com".to_string(),
                password: "secret".to_string(),
                role: Some(Role::Admin),
            })
            .await
            .unwrap();

        assert_eq!(result.role, Role::Admin);
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email() {
        let users = Arc::new(InMemoryUsers::new());
        let handler = RegisterHandler::new(users, Arc::new(PlainHasher));
        let cmd = RegisterCommand {
            email: "alice@example.com".to_string(),
            password: "pw123".to_string(),
            role: None,
        };

        handler.handle(cmd.clone()).await.unwrap();
        let result = handler.handle(cmd).await;

        assert!(matches!(result, Err(AuthFlowError::EmailTaken)));
    }

    #[tokio::test]
    async fn register_rejects_malformed_email() {
        let handler =
            RegisterHandler::new(Arc::new(InMemoryUsers::new()), Arc::new(PlainHasher));

        let result = handler
            .handle(RegisterCommand {
                email: "not-an-email".to_string(),
                password: "pw".to_string(),
                role: None,
            })
            .await;

        assert!(matches!(result, Err(AuthFlowError::Validation(_))));
    }

    #[tokio::test]
    async fn register_rejects_empty_password() {
        let handler =
            RegisterHandler::new(Arc::new(InMemoryUsers::new()), Arc::new(PlainHasher));

        let result = handler
            .handle(RegisterCommand {
                email: "alice@example.com".to_string(),
                password: String::new(),
                role: None,
            })
            .await;

        assert!(matches!(result, Err(AuthFlowError::Validation(_))));
    }
}
