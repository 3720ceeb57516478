//! Comment write flows.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Comment, Viewer};
use crate::error::DomainError;
use crate::ports::{Clock, CommentRepository};

use super::content_filter::ContentFilter;
use super::ownership::ensure_owner;
use super::visibility::PostQueryService;

#[derive(Clone)]
pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
    queries: PostQueryService,
    filter: ContentFilter,
    clock: Arc<dyn Clock>,
}

impl CommentService {
    pub fn new(
        comments: Arc<dyn CommentRepository>,
        queries: PostQueryService,
        filter: ContentFilter,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            comments,
            queries,
            filter,
            clock,
        }
    }

    /// Comment on a post the viewer can see.
    pub async fn create(&self, post_id: Uuid, viewer: &Viewer, text: String) -> Result<Comment, DomainError> {
        let author_id = viewer.user_id().ok_or(DomainError::Unauthorized)?;
        self.queries.get_visible_post(post_id, viewer).await?;

        validate_text(&text)?;
        self.filter.validate(&text).await?;

        let mut comment = Comment::new(post_id, author_id, text);
        comment.created_at = self.clock.now();
        let saved = self.comments.insert(comment).await?;

        tracing::info!(comment_id = %saved.id, post_id = %post_id, "Comment created");
        Ok(saved)
    }

    pub async fn update(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        viewer: &Viewer,
        text: String,
    ) -> Result<Comment, DomainError> {
        let mut comment = self.find_on_post(post_id, comment_id, viewer).await?;
        ensure_owner(&comment, viewer)?;

        validate_text(&text)?;
        self.filter.validate(&text).await?;

        comment.text = text;
        let saved = self.comments.update(comment).await?;
        tracing::info!(comment_id = %saved.id, "Comment updated");
        Ok(saved)
    }

    pub async fn delete(&self, post_id: Uuid, comment_id: Uuid, viewer: &Viewer) -> Result<(), DomainError> {
        let comment = self.find_on_post(post_id, comment_id, viewer).await?;
        ensure_owner(&comment, viewer)?;

        self.comments.delete(comment.id).await?;
        tracing::info!(comment_id = %comment_id, "Comment deleted");
        Ok(())
    }

    /// A comment of a post `viewer` can see. Comments under hidden posts are
    /// `NotFound` like missing ones.
    async fn find_on_post(&self, post_id: Uuid, comment_id: Uuid, viewer: &Viewer) -> Result<Comment, DomainError> {
        self.queries.get_visible_post(post_id, viewer).await?;

        self.comments
            .find_by_id(comment_id)
            .await?
            .filter(|c| c.post_id == post_id)
            .ok_or_else(|| DomainError::not_found("comment"))
    }
}

fn validate_text(text: &str) -> Result<(), DomainError> {
    if text.trim().is_empty() {
        return Err(DomainError::Validation("comment must not be empty".to_string()));
    }
    Ok(())
}
