//! Visibility query engine - who may see which posts, and when.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::domain::{Category, CommentView, PostSummary, User, Viewer};
use crate::error::DomainError;
use crate::ports::{
    CategoryRepository, Clock, CommentRepository, PageRequest, PostFilter, PostRepository,
    UserRepository,
};

/// Posts of a published category.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryPosts {
    pub category: Category,
    pub posts: Vec<PostSummary>,
}

/// A user's profile page.
#[derive(Debug, Clone)]
pub struct Profile {
    pub user: User,
    pub posts: Vec<PostSummary>,
}

/// A post with its comments, oldest first.
#[derive(Debug, Clone)]
pub struct PostDetail {
    pub summary: PostSummary,
    pub comments: Vec<CommentView>,
}

/// Read side for posts.
///
/// Every listing is a single repository query with author, category and
/// location joined and the comment count aggregated.
#[derive(Clone)]
pub struct PostQueryService {
    posts: Arc<dyn PostRepository>,
    categories: Arc<dyn CategoryRepository>,
    users: Arc<dyn UserRepository>,
    comments: Arc<dyn CommentRepository>,
    clock: Arc<dyn Clock>,
}

impl PostQueryService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        categories: Arc<dyn CategoryRepository>,
        users: Arc<dyn UserRepository>,
        comments: Arc<dyn CommentRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            posts,
            categories,
            users,
            comments,
            clock,
        }
    }

    /// Posts an anonymous reader can see, newest first.
    pub async fn list_public(&self, page: Option<PageRequest>) -> Result<Vec<PostSummary>, DomainError> {
        let filter = PostFilter::public(self.clock.now()).paginate(page);
        Ok(self.posts.list(&filter).await?)
    }

    /// Published posts of the category `slug`.
    ///
    /// A missing or unpublished category is `NotFound` before any post is read.
    pub async fn list_by_category(
        &self,
        slug: &str,
        page: Option<PageRequest>,
    ) -> Result<CategoryPosts, DomainError> {
        let category = self
            .categories
            .find_by_slug(slug)
            .await?
            .filter(|c| c.is_published)
            .ok_or_else(|| DomainError::not_found("category"))?;

        let filter = PostFilter::category(category.id, self.clock.now()).paginate(page);
        let posts = self.posts.list(&filter).await?;

        Ok(CategoryPosts { category, posts })
    }

    /// Every post of `author_id`, drafts and scheduled posts included.
    pub async fn list_by_author(
        &self,
        author_id: Uuid,
        page: Option<PageRequest>,
    ) -> Result<Vec<PostSummary>, DomainError> {
        let filter = PostFilter::author(author_id).paginate(page);
        Ok(self.posts.list(&filter).await?)
    }

    /// Profile of `username` as seen by `viewer`.
    ///
    /// The owner sees all of their posts; everyone else sees only the posts
    /// that are publicly visible.
    pub async fn list_profile(
        &self,
        username: &str,
        viewer: &Viewer,
        page: Option<PageRequest>,
    ) -> Result<Profile, DomainError> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("user"))?;

        let posts = if viewer.is(user.id) {
            self.list_by_author(user.id, page).await?
        } else {
            let filter = PostFilter::public(self.clock.now())
                .by_author(user.id)
                .paginate(page);
            self.posts.list(&filter).await?
        };

        Ok(Profile { user, posts })
    }

    /// A single post, if `viewer` may see it.
    pub async fn get_visible_post(&self, id: Uuid, viewer: &Viewer) -> Result<PostSummary, DomainError> {
        let now = self.clock.now();
        match self.posts.find_summary(id).await? {
            Some(summary) if summary.is_visible_to(viewer, now) => Ok(summary),
            Some(_) => {
                tracing::debug!(post_id = %id, "Post hidden from viewer");
                Err(DomainError::not_found("post"))
            }
            None => Err(DomainError::not_found("post")),
        }
    }

    /// A visible post and its comments, checked against a single reading of
    /// the clock.
    pub async fn get_post_detail(&self, id: Uuid, viewer: &Viewer) -> Result<PostDetail, DomainError> {
        let summary = self.get_visible_post(id, viewer).await?;
        let comments = self.comments.list_for_post(id).await?;
        Ok(PostDetail { summary, comments })
    }

    /// Comments of a post the viewer may see, oldest first.
    pub async fn comments_for(&self, post_id: Uuid, viewer: &Viewer) -> Result<Vec<CommentView>, DomainError> {
        self.get_visible_post(post_id, viewer).await?;
        Ok(self.comments.list_for_post(post_id).await?)
    }
}
