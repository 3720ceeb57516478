//! Post query description handed to repositories.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default number of posts per listing page.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Limit/offset window over an ordered listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub limit: u64,
    pub offset: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

/// Publication-state constraint applied to a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// No publication constraint.
    Any,
    /// `is_published` and `pub_date <= at`.
    PublishedAt(DateTime<Utc>),
    /// As `PublishedAt`, and the category is published too.
    PublicAt(DateTime<Utc>),
}

/// Filter for post listings.
///
/// Results are always ordered by `pub_date` then `id`, both descending, carry the
/// author, category and location, and the comment count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostFilter {
    pub category_id: Option<Uuid>,
    pub author_id: Option<Uuid>,
    pub visibility: Visibility,
    pub page: Option<PageRequest>,
}

impl PostFilter {
    /// Everything an anonymous reader can see at `now`.
    pub fn public(now: DateTime<Utc>) -> Self {
        Self {
            category_id: None,
            author_id: None,
            visibility: Visibility::PublicAt(now),
            page: None,
        }
    }

    /// Published posts of a category already known to be published.
    pub fn category(category_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            category_id: Some(category_id),
            author_id: None,
            visibility: Visibility::PublishedAt(now),
            page: None,
        }
    }

    /// All posts of an author, whatever their state.
    pub fn author(author_id: Uuid) -> Self {
        Self {
            category_id: None,
            author_id: Some(author_id),
            visibility: Visibility::Any,
            page: None,
        }
    }

    pub fn by_author(mut self, author_id: Uuid) -> Self {
        self.author_id = Some(author_id);
        self
    }

    pub fn paginate(mut self, page: Option<PageRequest>) -> Self {
        self.page = page;
        self
    }
}
