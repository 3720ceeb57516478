//! Application state - shared across all handlers.

use std::sync::Arc;

use blogicum_core::ports::{
    CategoryRepository, Clock, CommentRepository, ForbiddenWordRepository, LocationRepository,
    PageRequest, PostRepository, UserRepository,
};
use blogicum_core::services::{
    AdminService, CommentService, ContentFilter, PostQueryService, PostService, ProfileService,
};
use blogicum_infra::{InMemoryStore, SystemClock};
use blogicum_shared::dto::ListQuery;

use crate::config::{AppConfig, MAX_OFFSET, MAX_PAGE_SIZE};

#[cfg(feature = "postgres")]
use blogicum_infra::database::{
    self, DatabaseConfig, PostgresCategoryRepository, PostgresCommentRepository,
    PostgresForbiddenWordRepository, PostgresLocationRepository, PostgresPostRepository,
    PostgresUserRepository,
};

/// One implementation of every repository port.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub locations: Arc<dyn LocationRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub words: Arc<dyn ForbiddenWordRepository>,
}

impl Repositories {
    /// All ports backed by one process-local store.
    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            users: store.clone(),
            posts: store.clone(),
            categories: store.clone(),
            locations: store.clone(),
            comments: store.clone(),
            words: store,
        }
    }

    #[cfg(feature = "postgres")]
    async fn connect(config: Option<&DatabaseConfig>) -> Self {
        let Some(config) = config else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Self::in_memory();
        };

        match database::connect(config).await {
            Ok(db) => Self {
                users: Arc::new(PostgresUserRepository::new(db.clone())),
                posts: Arc::new(PostgresPostRepository::new(db.clone())),
                categories: Arc::new(PostgresCategoryRepository::new(db.clone())),
                locations: Arc::new(PostgresLocationRepository::new(db.clone())),
                comments: Arc::new(PostgresCommentRepository::new(db.clone())),
                words: Arc::new(PostgresForbiddenWordRepository::new(db)),
            },
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                Self::in_memory()
            }
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub queries: PostQueryService,
    pub posts: PostService,
    pub comments: CommentService,
    pub profiles: ProfileService,
    pub admin: AdminService,
    pub posts_per_page: u64,
    pub staff_usernames: Vec<String>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        #[cfg(feature = "postgres")]
        let repos = Repositories::connect(config.database.as_ref()).await;

        #[cfg(not(feature = "postgres"))]
        let repos = {
            tracing::info!("Running without postgres feature - using in-memory repositories");
            Repositories::in_memory()
        };

        let state = Self::build(repos, Arc::new(SystemClock), config);
        tracing::info!("Application state initialized");
        state
    }

    /// Wire the services over `repos`.
    pub fn build(repos: Repositories, clock: Arc<dyn Clock>, config: &AppConfig) -> Self {
        let filter = ContentFilter::new(repos.words.clone());
        let queries = PostQueryService::new(
            repos.posts.clone(),
            repos.categories.clone(),
            repos.users.clone(),
            repos.comments.clone(),
            clock.clone(),
        );

        Self {
            posts: PostService::new(
                repos.posts.clone(),
                repos.categories.clone(),
                repos.locations.clone(),
                filter.clone(),
                clock.clone(),
            ),
            comments: CommentService::new(
                repos.comments.clone(),
                queries.clone(),
                filter,
                clock.clone(),
            ),
            profiles: ProfileService::new(repos.users.clone(), clock),
            admin: AdminService::new(repos.words, repos.categories, repos.locations),
            users: repos.users,
            queries,
            posts_per_page: config.posts_per_page,
            staff_usernames: config.staff_usernames.clone(),
        }
    }

    /// Listing window for a request, falling back to the configured size.
    pub fn page(&self, query: ListQuery) -> PageRequest {
        PageRequest {
            limit: query
                .limit
                .unwrap_or(self.posts_per_page)
                .clamp(1, MAX_PAGE_SIZE),
            offset: query.offset.unwrap_or(0).min(MAX_OFFSET),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        let config = AppConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            database: None,
            posts_per_page: 10,
            staff_usernames: Vec::new(),
        };
        AppState::build(Repositories::in_memory(), Arc::new(SystemClock), &config)
    }

    #[test]
    fn test_page_defaults_and_bounds() {
        let state = state();

        let page = state.page(ListQuery::default());
        assert_eq!((page.limit, page.offset), (10, 0));

        let page = state.page(ListQuery {
            limit: Some(1000),
            offset: Some(u64::MAX),
        });
        assert_eq!(page.limit, MAX_PAGE_SIZE);
        assert_eq!(page.offset, MAX_OFFSET);
        assert!(i64::try_from(page.offset).is_ok());
    }
}
