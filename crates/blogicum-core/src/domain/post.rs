use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Maximum length of post, category and location titles.
pub const TITLE_MAX_LEN: usize = 256;

/// Post entity - a dated blog entry owned by its author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    /// Scheduled publish time. Future values defer publication.
    pub pub_date: DateTime<Utc>,
    pub author_id: Uuid,
    pub location_id: Option<Uuid>,
    pub category_id: Uuid,
    pub image: Option<String>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Create a new published post.
    pub fn new(
        author_id: Uuid,
        category_id: Uuid,
        title: String,
        text: String,
        pub_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            text,
            pub_date,
            author_id,
            location_id: None,
            category_id,
            image: None,
            is_published: true,
            created_at: Utc::now(),
        }
    }

    /// Title bounds and a non-blank body.
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_title("title", &self.title)?;
        if self.text.trim().is_empty() {
            return Err(DomainError::Validation("text must not be empty".to_string()));
        }
        Ok(())
    }
}

pub(crate) fn validate_title(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::Validation(format!("{field} must not be empty")));
    }
    if value.chars().count() > TITLE_MAX_LEN {
        return Err(DomainError::Validation(format!(
            "{field} must be at most {TITLE_MAX_LEN} characters"
        )));
    }
    Ok(())
}

/// Author columns joined onto a listed post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorRef {
    pub id: Uuid,
    pub username: String,
}

/// Category columns joined onto a listed post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub is_published: bool,
}

/// Location columns joined onto a listed post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRef {
    pub id: Uuid,
    pub name: String,
    pub is_published: bool,
}

/// A post with its relations fetched eagerly and its comment count
/// aggregated in the same query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostSummary {
    pub post: Post,
    pub author: AuthorRef,
    pub category: CategoryRef,
    pub location: Option<LocationRef>,
    pub comment_count: u64,
}

impl PostSummary {
    /// Effective visibility of this post for `viewer` at `now`.
    ///
    /// Published, category published and scheduled time reached; the author
    /// bypasses all three.
    pub fn is_visible_to(&self, viewer: &super::Viewer, now: DateTime<Utc>) -> bool {
        if viewer.is(self.post.author_id) {
            return true;
        }
        self.post.is_published && self.category.is_published && self.post.pub_date <= now
    }
}
