//! Profile editing.

use std::sync::Arc;

use crate::domain::{User, Viewer};
use crate::error::DomainError;
use crate::ports::{Clock, UserRepository};

/// Fields a user may change on their own profile.
#[derive(Debug, Clone)]
pub struct ProfileChanges {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Clone)]
pub struct ProfileService {
    users: Arc<dyn UserRepository>,
    clock: Arc<dyn Clock>,
}

impl ProfileService {
    pub fn new(users: Arc<dyn UserRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { users, clock }
    }

    /// Update the signed-in user's own profile.
    pub async fn update(&self, viewer: &Viewer, changes: ProfileChanges) -> Result<User, DomainError> {
        let user_id = viewer.user_id().ok_or(DomainError::Unauthorized)?;
        let mut user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("user"))?;

        if !User::is_valid_username(&changes.username) {
            return Err(DomainError::Validation("invalid username".to_string()));
        }
        if !User::is_valid_email(&changes.email) {
            return Err(DomainError::Validation("invalid email address".to_string()));
        }
        if changes.username != user.username {
            if let Some(other) = self.users.find_by_username(&changes.username).await? {
                if other.id != user.id {
                    return Err(DomainError::Duplicate("username already taken".to_string()));
                }
            }
        }

        user.username = changes.username;
        user.email = changes.email;
        user.first_name = changes.first_name;
        user.last_name = changes.last_name;
        user.updated_at = self.clock.now();

        let saved = self.users.update(user).await?;
        tracing::info!(user_id = %saved.id, "Profile updated");
        Ok(saved)
    }
}
