use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity - an author and commenter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    /// Staff users administer categories, locations and the blocklist.
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with generated ID and timestamps.
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            first_name: String::new(),
            last_name: String::new(),
            password_hash,
            is_staff: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Usernames: 1-150 characters of letters, digits and `@ . + - _`.
    pub fn is_valid_username(username: &str) -> bool {
        let len = username.chars().count();
        (1..=150).contains(&len)
            && username
                .chars()
                .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    }

    pub fn is_valid_email(email: &str) -> bool {
        email.is_empty() || email.split_once('@').is_some_and(|(local, domain)| {
            !local.is_empty() && !domain.is_empty()
        })
    }
}
