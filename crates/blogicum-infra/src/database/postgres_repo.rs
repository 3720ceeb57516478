//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, EntityTrait, FromQueryResult, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Select,
};
use uuid::Uuid;

use blogicum_core::domain::{
    AuthorRef, Category, CategoryRef, Comment, CommentView, ForbiddenWord, Location, LocationRef,
    Post, PostSummary, User,
};
use blogicum_core::error::RepoError;
use blogicum_core::ports::{
    CategoryRepository, CommentRepository, ForbiddenWordRepository, LocationRepository,
    PostFilter, PostRepository, UserRepository, Visibility,
};

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::forbidden_word::{self, Entity as ForbiddenWordEntity};
use super::entity::location::{self, Entity as LocationEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

pub type PostgresCategoryRepository = PostgresBaseRepository<CategoryEntity>;

pub type PostgresLocationRepository = PostgresBaseRepository<LocationEntity>;

pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

pub type PostgresForbiddenWordRepository = PostgresBaseRepository<ForbiddenWordEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(username = %username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

/// One row of a post listing: the post, its joined relations and the
/// aggregated comment count.
#[derive(Debug, FromQueryResult)]
struct PostRow {
    id: Uuid,
    title: String,
    text: String,
    pub_date: DateTimeWithTimeZone,
    author_id: Uuid,
    location_id: Option<Uuid>,
    category_id: Uuid,
    image: Option<String>,
    is_published: bool,
    created_at: DateTimeWithTimeZone,
    author_username: String,
    category_title: String,
    category_slug: String,
    category_is_published: bool,
    location_name: Option<String>,
    location_is_published: Option<bool>,
    comment_count: i64,
}

impl From<PostRow> for PostSummary {
    fn from(row: PostRow) -> Self {
        // The location is a LEFT JOIN: all three columns are present or none.
        let location = match (row.location_id, row.location_name, row.location_is_published) {
            (Some(id), Some(name), Some(is_published)) => Some(LocationRef {
                id,
                name,
                is_published,
            }),
            _ => None,
        };

        Self {
            post: Post {
                id: row.id,
                title: row.title,
                text: row.text,
                pub_date: row.pub_date.into(),
                author_id: row.author_id,
                location_id: row.location_id,
                category_id: row.category_id,
                image: row.image,
                is_published: row.is_published,
                created_at: row.created_at.into(),
            },
            author: AuthorRef {
                id: row.author_id,
                username: row.author_username,
            },
            category: CategoryRef {
                id: row.category_id,
                title: row.category_title,
                slug: row.category_slug,
                is_published: row.category_is_published,
            },
            location,
            comment_count: u64::try_from(row.comment_count).unwrap_or_default(),
        }
    }
}

/// Posts joined to author, category and location, with comments counted.
pub(super) fn summary_select() -> Select<PostEntity> {
    PostEntity::find()
        .select_only()
        .columns([
            post::Column::Id,
            post::Column::Title,
            post::Column::Text,
            post::Column::PubDate,
            post::Column::AuthorId,
            post::Column::LocationId,
            post::Column::CategoryId,
            post::Column::Image,
            post::Column::IsPublished,
            post::Column::CreatedAt,
        ])
        .column_as(user::Column::Username, "author_username")
        .column_as(category::Column::Title, "category_title")
        .column_as(category::Column::Slug, "category_slug")
        .column_as(category::Column::IsPublished, "category_is_published")
        .column_as(location::Column::Name, "location_name")
        .column_as(location::Column::IsPublished, "location_is_published")
        .column_as(
            Expr::col((comment::Entity, comment::Column::Id)).count(),
            "comment_count",
        )
        .join(JoinType::InnerJoin, post::Relation::Author.def())
        .join(JoinType::InnerJoin, post::Relation::Category.def())
        .join(JoinType::LeftJoin, post::Relation::Location.def())
        .join(JoinType::LeftJoin, post::Relation::Comments.def())
        .group_by(post::Column::Id)
        .group_by(user::Column::Id)
        .group_by(category::Column::Id)
        .group_by(location::Column::Id)
}

pub(super) fn apply_filter(mut select: Select<PostEntity>, filter: &PostFilter) -> Select<PostEntity> {
    if let Some(category_id) = filter.category_id {
        select = select.filter(post::Column::CategoryId.eq(category_id));
    }
    if let Some(author_id) = filter.author_id {
        select = select.filter(post::Column::AuthorId.eq(author_id));
    }

    select = match filter.visibility {
        Visibility::Any => select,
        Visibility::PublishedAt(at) => select
            .filter(post::Column::IsPublished.eq(true))
            .filter(post::Column::PubDate.lte(at)),
        Visibility::PublicAt(at) => select
            .filter(post::Column::IsPublished.eq(true))
            .filter(post::Column::PubDate.lte(at))
            .filter(category::Column::IsPublished.eq(true)),
    };

    select = select
        .order_by_desc(post::Column::PubDate)
        .order_by_desc(post::Column::Id);

    if let Some(page) = filter.page {
        select = select.limit(page.limit).offset(page.offset);
    }

    select
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn list(&self, filter: &PostFilter) -> Result<Vec<PostSummary>, RepoError> {
        tracing::debug!(filter = ?filter, "Listing posts");

        let rows = apply_filter(summary_select(), filter)
            .into_model::<PostRow>()
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_summary(&self, id: Uuid) -> Result<Option<PostSummary>, RepoError> {
        let row = summary_select()
            .filter(post::Column::Id.eq(id))
            .into_model::<PostRow>()
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(row.map(Into::into))
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let result = CategoryEntity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn list_all(&self) -> Result<Vec<Category>, RepoError> {
        let result = CategoryEntity::find()
            .order_by_asc(category::Column::Title)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl LocationRepository for PostgresLocationRepository {
    async fn list_all(&self) -> Result<Vec<Location>, RepoError> {
        let result = LocationEntity::find()
            .order_by_asc(location::Column::Name)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, FromQueryResult)]
struct CommentRow {
    id: Uuid,
    text: String,
    post_id: Uuid,
    author_id: Uuid,
    created_at: DateTimeWithTimeZone,
    author_username: String,
}

impl From<CommentRow> for CommentView {
    fn from(row: CommentRow) -> Self {
        Self {
            comment: Comment {
                id: row.id,
                text: row.text,
                post_id: row.post_id,
                author_id: row.author_id,
                created_at: row.created_at.into(),
            },
            author_username: row.author_username,
        }
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<CommentView>, RepoError> {
        let rows = CommentEntity::find()
            .select_only()
            .columns([
                comment::Column::Id,
                comment::Column::Text,
                comment::Column::PostId,
                comment::Column::AuthorId,
                comment::Column::CreatedAt,
            ])
            .column_as(user::Column::Username, "author_username")
            .join(JoinType::InnerJoin, comment::Relation::Author.def())
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::CreatedAt)
            .order_by_asc(comment::Column::Id)
            .into_model::<CommentRow>()
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl ForbiddenWordRepository for PostgresForbiddenWordRepository {
    async fn list_all(&self) -> Result<Vec<ForbiddenWord>, RepoError> {
        let result = ForbiddenWordEntity::find()
            .order_by_asc(forbidden_word::Column::Word)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}
