//! Post write flows.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Post, Viewer};
use crate::error::DomainError;
use crate::ports::{CategoryRepository, Clock, LocationRepository, PostRepository};

use super::content_filter::ContentFilter;
use super::ownership::ensure_owner;

/// Author-editable fields of a post.
#[derive(Debug, Clone)]
pub struct PostDraft {
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub category_id: Uuid,
    pub location_id: Option<Uuid>,
    pub image: Option<String>,
    pub is_published: bool,
}

impl PostDraft {
    fn into_post(self, author_id: Uuid, created_at: DateTime<Utc>) -> Post {
        Post {
            id: Uuid::new_v4(),
            title: self.title,
            text: self.text,
            pub_date: self.pub_date,
            author_id,
            location_id: self.location_id,
            category_id: self.category_id,
            image: self.image,
            is_published: self.is_published,
            created_at,
        }
    }

    fn apply_to(self, post: &mut Post) {
        post.title = self.title;
        post.text = self.text;
        post.pub_date = self.pub_date;
        post.category_id = self.category_id;
        post.location_id = self.location_id;
        post.image = self.image;
        post.is_published = self.is_published;
    }
}

#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    categories: Arc<dyn CategoryRepository>,
    locations: Arc<dyn LocationRepository>,
    filter: ContentFilter,
    clock: Arc<dyn Clock>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        categories: Arc<dyn CategoryRepository>,
        locations: Arc<dyn LocationRepository>,
        filter: ContentFilter,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            posts,
            categories,
            locations,
            filter,
            clock,
        }
    }

    /// Publish a new post authored by `viewer`.
    pub async fn create(&self, viewer: &Viewer, draft: PostDraft) -> Result<Post, DomainError> {
        let author_id = viewer.user_id().ok_or(DomainError::Unauthorized)?;

        let post = draft.into_post(author_id, self.clock.now());
        self.check(&post).await?;
        let saved = self.posts.insert(post).await?;

        tracing::info!(post_id = %saved.id, author_id = %author_id, "Post created");
        Ok(saved)
    }

    /// Replace the editable fields of a post owned by `viewer`.
    pub async fn update(&self, id: Uuid, viewer: &Viewer, draft: PostDraft) -> Result<Post, DomainError> {
        let mut post = self.find_editable(id, viewer).await?;

        draft.apply_to(&mut post);
        self.check(&post).await?;
        let saved = self.posts.update(post).await?;

        tracing::info!(post_id = %saved.id, "Post updated");
        Ok(saved)
    }

    /// Delete a post owned by `viewer` along with its comments.
    pub async fn delete(&self, id: Uuid, viewer: &Viewer) -> Result<(), DomainError> {
        self.find_editable(id, viewer).await?;

        self.posts.delete(id).await?;
        tracing::info!(post_id = %id, "Post deleted");
        Ok(())
    }

    /// The post, if `viewer` may see it and wrote it.
    ///
    /// A post hidden from `viewer` is `NotFound` like a missing one; only a
    /// visible post can answer `PermissionDenied`.
    async fn find_editable(&self, id: Uuid, viewer: &Viewer) -> Result<Post, DomainError> {
        let now = self.clock.now();
        let summary = self
            .posts
            .find_summary(id)
            .await?
            .filter(|summary| summary.is_visible_to(viewer, now))
            .ok_or_else(|| DomainError::not_found("post"))?;

        ensure_owner(&summary.post, viewer)?;
        Ok(summary.post)
    }

    /// Field rules, references, then the content filter. Nothing is written
    /// unless all pass.
    async fn check(&self, post: &Post) -> Result<(), DomainError> {
        post.validate()?;

        if self.categories.find_by_id(post.category_id).await?.is_none() {
            return Err(DomainError::Validation("unknown category".to_string()));
        }
        if let Some(location_id) = post.location_id {
            if self.locations.find_by_id(location_id).await?.is_none() {
                return Err(DomainError::Validation("unknown location".to_string()));
            }
        }

        self.filter.validate(&post.text).await
    }
}
