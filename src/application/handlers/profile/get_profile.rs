//! GetProfileHandler - Look up a user record for display.

use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::user::User;
use crate::ports::UserRepository;

use super::ProfileFlowError;

/// Handler for profile lookups.
///
/// Serves both the caller's own profile and the admin view of any user;
/// which id is allowed is decided at the HTTP boundary, not here.
pub struct GetProfileHandler {
    users: Arc<dyn UserRepository>,
}

impl GetProfileHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn handle(&self, user_id: &UserId) -> Result<User, ProfileFlowError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(ProfileFlowError::NotFound)
    }
}
