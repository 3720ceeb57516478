//! In-memory blog store - used when no database is configured.
//!
//! Mirrors the relational schema closely enough for the query engine to
//! behave identically: unique keys, foreign keys and referential actions are
//! enforced, and listings are ordered the same way as the SQL ones.
//! Data is lost on process restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use blogicum_core::domain::{
    AuthorRef, Category, CategoryRef, Comment, CommentView, ForbiddenWord, Location, LocationRef,
    Post, PostSummary, User,
};
use blogicum_core::error::RepoError;
use blogicum_core::ports::{
    BaseRepository, CategoryRepository, CommentRepository, ForbiddenWordRepository,
    LocationRepository, PostFilter, PostRepository, UserRepository, Visibility,
};

#[cfg(test)]
mod tests;

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    categories: HashMap<Uuid, Category>,
    locations: HashMap<Uuid, Location>,
    posts: HashMap<Uuid, Post>,
    comments: HashMap<Uuid, Comment>,
    words: HashMap<Uuid, ForbiddenWord>,
}

/// A row type stored in one of the tables.
trait Stored: Clone + Send + Sync + 'static {
    fn id(&self) -> Uuid;

    fn table(tables: &Tables) -> &HashMap<Uuid, Self>;

    fn table_mut(tables: &mut Tables) -> &mut HashMap<Uuid, Self>;

    /// Unique and foreign key checks, run before every write.
    fn check(&self, _tables: &Tables) -> Result<(), RepoError> {
        Ok(())
    }

    /// Referential actions, run before the row is removed.
    fn on_delete(_id: Uuid, _tables: &mut Tables) -> Result<(), RepoError> {
        Ok(())
    }
}

fn constraint(message: &str) -> RepoError {
    RepoError::Constraint(message.to_string())
}

impl Stored for User {
    fn id(&self) -> Uuid {
        self.id
    }

    fn table(tables: &Tables) -> &HashMap<Uuid, Self> {
        &tables.users
    }

    fn table_mut(tables: &mut Tables) -> &mut HashMap<Uuid, Self> {
        &mut tables.users
    }

    fn check(&self, tables: &Tables) -> Result<(), RepoError> {
        if tables
            .users
            .values()
            .any(|u| u.id != self.id && u.username == self.username)
        {
            return Err(constraint("username already exists"));
        }
        Ok(())
    }

    fn on_delete(id: Uuid, tables: &mut Tables) -> Result<(), RepoError> {
        let posts: Vec<Uuid> = tables
            .posts
            .values()
            .filter(|p| p.author_id == id)
            .map(|p| p.id)
            .collect();
        for post_id in posts {
            Post::on_delete(post_id, tables)?;
            tables.posts.remove(&post_id);
        }
        tables.comments.retain(|_, c| c.author_id != id);
        Ok(())
    }
}

impl Stored for Category {
    fn id(&self) -> Uuid {
        self.id
    }

    fn table(tables: &Tables) -> &HashMap<Uuid, Self> {
        &tables.categories
    }

    fn table_mut(tables: &mut Tables) -> &mut HashMap<Uuid, Self> {
        &mut tables.categories
    }

    fn check(&self, tables: &Tables) -> Result<(), RepoError> {
        if tables
            .categories
            .values()
            .any(|c| c.id != self.id && c.slug == self.slug)
        {
            return Err(constraint("slug already exists"));
        }
        Ok(())
    }

    fn on_delete(id: Uuid, tables: &mut Tables) -> Result<(), RepoError> {
        if tables.posts.values().any(|p| p.category_id == id) {
            return Err(constraint("category is referenced by posts"));
        }
        Ok(())
    }
}

impl Stored for Location {
    fn id(&self) -> Uuid {
        self.id
    }

    fn table(tables: &Tables) -> &HashMap<Uuid, Self> {
        &tables.locations
    }

    fn table_mut(tables: &mut Tables) -> &mut HashMap<Uuid, Self> {
        &mut tables.locations
    }

    fn on_delete(id: Uuid, tables: &mut Tables) -> Result<(), RepoError> {
        for post in tables.posts.values_mut() {
            if post.location_id == Some(id) {
                post.location_id = None;
            }
        }
        Ok(())
    }
}

impl Stored for Post {
    fn id(&self) -> Uuid {
        self.id
    }

    fn table(tables: &Tables) -> &HashMap<Uuid, Self> {
        &tables.posts
    }

    fn table_mut(tables: &mut Tables) -> &mut HashMap<Uuid, Self> {
        &mut tables.posts
    }

    fn check(&self, tables: &Tables) -> Result<(), RepoError> {
        if !tables.users.contains_key(&self.author_id) {
            return Err(constraint("unknown author"));
        }
        if !tables.categories.contains_key(&self.category_id) {
            return Err(constraint("unknown category"));
        }
        if let Some(location_id) = self.location_id {
            if !tables.locations.contains_key(&location_id) {
                return Err(constraint("unknown location"));
            }
        }
        Ok(())
    }

    fn on_delete(id: Uuid, tables: &mut Tables) -> Result<(), RepoError> {
        tables.comments.retain(|_, c| c.post_id != id);
        Ok(())
    }
}

impl Stored for Comment {
    fn id(&self) -> Uuid {
        self.id
    }

    fn table(tables: &Tables) -> &HashMap<Uuid, Self> {
        &tables.comments
    }

    fn table_mut(tables: &mut Tables) -> &mut HashMap<Uuid, Self> {
        &mut tables.comments
    }

    fn check(&self, tables: &Tables) -> Result<(), RepoError> {
        if !tables.posts.contains_key(&self.post_id) {
            return Err(constraint("unknown post"));
        }
        if !tables.users.contains_key(&self.author_id) {
            return Err(constraint("unknown author"));
        }
        Ok(())
    }
}

impl Stored for ForbiddenWord {
    fn id(&self) -> Uuid {
        self.id
    }

    fn table(tables: &Tables) -> &HashMap<Uuid, Self> {
        &tables.words
    }

    fn table_mut(tables: &mut Tables) -> &mut HashMap<Uuid, Self> {
        &mut tables.words
    }

    fn check(&self, tables: &Tables) -> Result<(), RepoError> {
        if tables
            .words
            .values()
            .any(|w| w.id != self.id && w.word == self.word)
        {
            return Err(constraint("word already exists"));
        }
        Ok(())
    }
}

/// Every repository port over one set of in-memory tables.
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
        }
    }

    async fn get<T: Stored>(&self, id: Uuid) -> Result<Option<T>, RepoError> {
        let tables = self.tables.read().await;
        Ok(T::table(&tables).get(&id).cloned())
    }

    async fn insert_row<T: Stored>(&self, row: T) -> Result<T, RepoError> {
        let mut tables = self.tables.write().await;
        if T::table(&tables).contains_key(&row.id()) {
            return Err(constraint("id already exists"));
        }
        row.check(&tables)?;
        T::table_mut(&mut tables).insert(row.id(), row.clone());
        Ok(row)
    }

    async fn update_row<T: Stored>(&self, row: T) -> Result<T, RepoError> {
        let mut tables = self.tables.write().await;
        if !T::table(&tables).contains_key(&row.id()) {
            return Err(RepoError::NotFound);
        }
        row.check(&tables)?;
        T::table_mut(&mut tables).insert(row.id(), row.clone());
        Ok(row)
    }

    async fn delete_row<T: Stored>(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if !T::table(&tables).contains_key(&id) {
            return Err(RepoError::NotFound);
        }
        T::on_delete(id, &mut tables)?;
        T::table_mut(&mut tables).remove(&id);
        Ok(())
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        self.get(id).await
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        self.insert_row(user).await
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        self.update_row(user).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.delete_row::<User>(id).await
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }
}

#[async_trait]
impl BaseRepository<Category, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, RepoError> {
        self.get(id).await
    }

    async fn insert(&self, category: Category) -> Result<Category, RepoError> {
        self.insert_row(category).await
    }

    async fn update(&self, category: Category) -> Result<Category, RepoError> {
        self.update_row(category).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.delete_row::<Category>(id).await
    }
}

#[async_trait]
impl CategoryRepository for InMemoryStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.categories.values().find(|c| c.slug == slug).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Category>, RepoError> {
        let tables = self.tables.read().await;
        let mut categories: Vec<Category> = tables.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(categories)
    }
}

#[async_trait]
impl BaseRepository<Location, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Location>, RepoError> {
        self.get(id).await
    }

    async fn insert(&self, location: Location) -> Result<Location, RepoError> {
        self.insert_row(location).await
    }

    async fn update(&self, location: Location) -> Result<Location, RepoError> {
        self.update_row(location).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.delete_row::<Location>(id).await
    }
}

#[async_trait]
impl LocationRepository for InMemoryStore {
    async fn list_all(&self) -> Result<Vec<Location>, RepoError> {
        let tables = self.tables.read().await;
        let mut locations: Vec<Location> = tables.locations.values().cloned().collect();
        locations.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(locations)
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        self.get(id).await
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        self.insert_row(post).await
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        self.update_row(post).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.delete_row::<Post>(id).await
    }
}

/// Join a post with its author, category and location; `None` when a
/// required relation is missing, as an inner join would drop the row.
fn summarize(tables: &Tables, post: &Post) -> Option<PostSummary> {
    let author = tables.users.get(&post.author_id)?;
    let category = tables.categories.get(&post.category_id)?;
    let location = post
        .location_id
        .and_then(|id| tables.locations.get(&id))
        .map(|l| LocationRef {
            id: l.id,
            name: l.name.clone(),
            is_published: l.is_published,
        });
    let comment_count = tables
        .comments
        .values()
        .filter(|c| c.post_id == post.id)
        .count() as u64;

    Some(PostSummary {
        post: post.clone(),
        author: AuthorRef {
            id: author.id,
            username: author.username.clone(),
        },
        category: CategoryRef {
            id: category.id,
            title: category.title.clone(),
            slug: category.slug.clone(),
            is_published: category.is_published,
        },
        location,
        comment_count,
    })
}

fn matches(filter: &PostFilter, summary: &PostSummary) -> bool {
    let post = &summary.post;
    if filter.category_id.is_some_and(|id| id != post.category_id) {
        return false;
    }
    if filter.author_id.is_some_and(|id| id != post.author_id) {
        return false;
    }
    match filter.visibility {
        Visibility::Any => true,
        Visibility::PublishedAt(at) => post.is_published && post.pub_date <= at,
        Visibility::PublicAt(at) => {
            post.is_published && post.pub_date <= at && summary.category.is_published
        }
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn list(&self, filter: &PostFilter) -> Result<Vec<PostSummary>, RepoError> {
        let tables = self.tables.read().await;
        let mut posts: Vec<PostSummary> = tables
            .posts
            .values()
            .filter_map(|post| summarize(&tables, post))
            .filter(|summary| matches(filter, summary))
            .collect();

        posts.sort_by(|a, b| {
            b.post
                .pub_date
                .cmp(&a.post.pub_date)
                .then_with(|| b.post.id.cmp(&a.post.id))
        });

        if let Some(page) = filter.page {
            let offset = usize::try_from(page.offset).unwrap_or(usize::MAX);
            let limit = usize::try_from(page.limit).unwrap_or(usize::MAX);
            posts = posts.into_iter().skip(offset).take(limit).collect();
        }

        Ok(posts)
    }

    async fn find_summary(&self, id: Uuid) -> Result<Option<PostSummary>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .posts
            .get(&id)
            .and_then(|post| summarize(&tables, post)))
    }
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        self.get(id).await
    }

    async fn insert(&self, comment: Comment) -> Result<Comment, RepoError> {
        self.insert_row(comment).await
    }

    async fn update(&self, comment: Comment) -> Result<Comment, RepoError> {
        self.update_row(comment).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.delete_row::<Comment>(id).await
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<CommentView>, RepoError> {
        let tables = self.tables.read().await;
        let mut comments: Vec<CommentView> = tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .filter_map(|c| {
                tables.users.get(&c.author_id).map(|author| CommentView {
                    comment: c.clone(),
                    author_username: author.username.clone(),
                })
            })
            .collect();

        comments.sort_by(|a, b| {
            a.comment
                .created_at
                .cmp(&b.comment.created_at)
                .then_with(|| a.comment.id.cmp(&b.comment.id))
        });
        Ok(comments)
    }
}

#[async_trait]
impl BaseRepository<ForbiddenWord, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ForbiddenWord>, RepoError> {
        self.get(id).await
    }

    async fn insert(&self, word: ForbiddenWord) -> Result<ForbiddenWord, RepoError> {
        self.insert_row(word).await
    }

    async fn update(&self, word: ForbiddenWord) -> Result<ForbiddenWord, RepoError> {
        self.update_row(word).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.delete_row::<ForbiddenWord>(id).await
    }
}

#[async_trait]
impl ForbiddenWordRepository for InMemoryStore {
    async fn list_all(&self) -> Result<Vec<ForbiddenWord>, RepoError> {
        let tables = self.tables.read().await;
        let mut words: Vec<ForbiddenWord> = tables.words.values().cloned().collect();
        words.sort_by(|a, b| a.word.cmp(&b.word));
        Ok(words)
    }
}
