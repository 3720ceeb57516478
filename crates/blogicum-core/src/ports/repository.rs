use async_trait::async_trait;
use uuid::Uuid;

use super::query::PostFilter;
use crate::domain::{
    Category, Comment, CommentView, ForbiddenWord, Location, Post, PostSummary, User,
};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Filtered, ordered listing in a single round trip.
    async fn list(&self, filter: &PostFilter) -> Result<Vec<PostSummary>, RepoError>;

    /// One post with its relations and comment count, whatever its state.
    async fn find_summary(&self, id: Uuid) -> Result<Option<PostSummary>, RepoError>;
}

#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, Uuid> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError>;

    async fn list_all(&self) -> Result<Vec<Category>, RepoError>;
}

#[async_trait]
pub trait LocationRepository: BaseRepository<Location, Uuid> {
    async fn list_all(&self) -> Result<Vec<Location>, RepoError>;
}

#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// Comments of a post, oldest first, with author names.
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<CommentView>, RepoError>;
}

/// Administrator-maintained blocklist.
#[async_trait]
pub trait ForbiddenWordRepository: BaseRepository<ForbiddenWord, Uuid> {
    async fn list_all(&self) -> Result<Vec<ForbiddenWord>, RepoError>;
}
