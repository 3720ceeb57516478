use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::post::validate_title;
use crate::error::DomainError;

/// Category entity - groups posts and gates their public visibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Unique URL identifier.
    pub slug: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(title: String, description: String, slug: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            description,
            slug,
            is_published: true,
            created_at: Utc::now(),
        }
    }

    /// Slugs may contain latin letters, digits, hyphen and underscore.
    pub fn is_valid_slug(slug: &str) -> bool {
        !slug.is_empty()
            && slug
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        validate_title("title", &self.title)?;
        if !Self::is_valid_slug(&self.slug) {
            return Err(DomainError::Validation(
                "slug may only contain latin letters, digits, hyphen and underscore".to_string(),
            ));
        }
        Ok(())
    }
}
