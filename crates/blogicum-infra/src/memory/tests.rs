//! Query engine and write flows end to end over the in-memory store.

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use blogicum_core::DomainError;
use blogicum_core::domain::{Category, Comment, Location, Post, User, Viewer};
use blogicum_core::ports::{BaseRepository, Clock, CommentRepository, PageRequest};
use blogicum_core::services::{
    AdminService, CategoryDraft, CommentService, ContentFilter, PostDraft, PostQueryService,
    PostService, ProfileChanges, ProfileService,
};

use super::InMemoryStore;
use crate::clock::ManualClock;

struct Blog {
    store: Arc<InMemoryStore>,
    clock: Arc<ManualClock>,
    queries: PostQueryService,
    posts: PostService,
    comments: CommentService,
    profiles: ProfileService,
    admin: AdminService,
}

fn blog() -> Blog {
    let store = Arc::new(InMemoryStore::new());
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let filter = ContentFilter::new(store.clone());

    let queries = PostQueryService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        clock.clone(),
    );
    let posts = PostService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        filter.clone(),
        clock.clone(),
    );
    let comments = CommentService::new(store.clone(), queries.clone(), filter, clock.clone());
    let profiles = ProfileService::new(store.clone(), clock.clone());
    let admin = AdminService::new(store.clone(), store.clone(), store.clone());

    Blog {
        store,
        clock,
        queries,
        posts,
        comments,
        profiles,
        admin,
    }
}

impl Blog {
    async fn user(&self, username: &str) -> User {
        self.store
            .insert(User::new(username.into(), String::new(), "hash".into()))
            .await
            .unwrap()
    }

    async fn category(&self, slug: &str, is_published: bool) -> Category {
        let mut category = Category::new(slug.to_uppercase(), String::new(), slug.into());
        category.is_published = is_published;
        self.store.insert(category).await.unwrap()
    }

    /// A post scheduled `offset` away from the current clock reading.
    async fn post(&self, author: &User, category: &Category, offset: Duration, is_published: bool) -> Post {
        let mut post = Post::new(
            author.id,
            category.id,
            "Title".into(),
            "Body".into(),
            self.clock.now() + offset,
        );
        post.is_published = is_published;
        self.store.insert(post).await.unwrap()
    }

    async fn comment(&self, post: &Post, author: &User, minutes_ago: i64) -> Comment {
        let mut comment = Comment::new(post.id, author.id, "Nice".into());
        comment.created_at = self.clock.now() - Duration::minutes(minutes_ago);
        self.store.insert(comment).await.unwrap()
    }

    fn draft(&self, category: &Category, text: &str) -> PostDraft {
        PostDraft {
            title: "Title".into(),
            text: text.into(),
            pub_date: self.clock.now(),
            category_id: category.id,
            location_id: None,
            image: None,
            is_published: true,
        }
    }
}

fn is_not_found<T>(result: &Result<T, DomainError>) -> bool {
    matches!(result, Err(DomainError::NotFound { .. }))
}

#[tokio::test]
async fn test_anonymous_visibility_requires_all_three_conditions() {
    let blog = blog();
    let author = blog.user("author").await;
    let open = blog.category("open", true).await;
    let closed = blog.category("closed", false).await;
    let hour = Duration::hours(1);

    let cases = [
        (blog.post(&author, &open, -hour, true).await, true),
        (blog.post(&author, &open, -hour, false).await, false),
        (blog.post(&author, &open, hour, true).await, false),
        (blog.post(&author, &closed, -hour, true).await, false),
    ];

    for (post, visible) in &cases {
        let anonymous = blog.queries.get_visible_post(post.id, &Viewer::Anonymous).await;
        assert_eq!(anonymous.is_ok(), *visible, "post {}", post.id);
        assert_eq!(is_not_found(&anonymous), !*visible);

        let as_author = blog.queries.get_visible_post(post.id, &Viewer::User(author.id)).await;
        assert!(as_author.is_ok());
    }

    let public = blog.queries.list_public(None).await.unwrap();
    assert_eq!(public.len(), 1);
    assert_eq!(public[0].post.id, cases[0].0.id);
}

#[tokio::test]
async fn test_unpublished_category_hides_published_post() {
    let blog = blog();
    let author = blog.user("author").await;
    let c1 = blog.category("c1", false).await;
    let p1 = blog.post(&author, &c1, -Duration::days(1), true).await;

    assert!(is_not_found(&blog.queries.list_by_category("c1", None).await));
    assert!(is_not_found(
        &blog.queries.get_visible_post(p1.id, &Viewer::Anonymous).await
    ));
    assert!(blog.queries.get_visible_post(p1.id, &Viewer::User(author.id)).await.is_ok());
}

#[tokio::test]
async fn test_missing_category_is_not_found() {
    let blog = blog();
    assert!(is_not_found(&blog.queries.list_by_category("nowhere", None).await));
}

#[tokio::test]
async fn test_category_listing_hides_drafts_and_scheduled_posts() {
    let blog = blog();
    let author = blog.user("author").await;
    let travel = blog.category("travel", true).await;
    let other = blog.category("other", true).await;

    let visible = blog.post(&author, &travel, -Duration::hours(2), true).await;
    blog.post(&author, &travel, -Duration::hours(1), false).await;
    blog.post(&author, &travel, Duration::hours(1), true).await;
    blog.post(&author, &other, -Duration::hours(1), true).await;

    let listing = blog.queries.list_by_category("travel", None).await.unwrap();
    assert_eq!(listing.category.id, travel.id);
    let ids: Vec<Uuid> = listing.posts.iter().map(|s| s.post.id).collect();
    assert_eq!(ids, vec![visible.id]);
}

#[tokio::test]
async fn test_scheduled_post_appears_when_its_time_comes() {
    let blog = blog();
    let author = blog.user("author").await;
    let category = blog.category("news", true).await;
    let p2 = blog.post(&author, &category, Duration::hours(1), true).await;

    assert!(is_not_found(
        &blog.queries.get_visible_post(p2.id, &Viewer::Anonymous).await
    ));
    assert!(blog.queries.get_visible_post(p2.id, &Viewer::User(author.id)).await.is_ok());
    assert!(blog.queries.list_public(None).await.unwrap().is_empty());

    blog.clock.advance(Duration::hours(1));

    assert!(blog.queries.get_visible_post(p2.id, &Viewer::Anonymous).await.is_ok());
    assert_eq!(blog.queries.list_public(None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_public_listing_is_newest_first_and_paginated() {
    let blog = blog();
    let author = blog.user("author").await;
    let category = blog.category("daily", true).await;

    for days in 1..=5 {
        blog.post(&author, &category, -Duration::days(days), true).await;
    }

    let all = blog.queries.list_public(None).await.unwrap();
    assert_eq!(all.len(), 5);
    assert!(all.windows(2).all(|w| w[0].post.pub_date >= w[1].post.pub_date));

    let page = blog
        .queries
        .list_public(Some(PageRequest { limit: 2, offset: 2 }))
        .await
        .unwrap();
    let expected: Vec<Uuid> = all[2..4].iter().map(|s| s.post.id).collect();
    assert_eq!(page.iter().map(|s| s.post.id).collect::<Vec<_>>(), expected);
}

#[tokio::test]
async fn test_comment_counts_and_order() {
    let blog = blog();
    let author = blog.user("author").await;
    let reader = blog.user("reader").await;
    let category = blog.category("talk", true).await;
    let busy = blog.post(&author, &category, -Duration::hours(2), true).await;
    let quiet = blog.post(&author, &category, -Duration::hours(1), true).await;

    let newest = blog.comment(&busy, &reader, 1).await;
    let oldest = blog.comment(&busy, &author, 30).await;
    let middle = blog.comment(&busy, &reader, 10).await;

    let listed = blog.queries.list_public(None).await.unwrap();
    let count_of = |id: Uuid| listed.iter().find(|s| s.post.id == id).map(|s| s.comment_count);
    assert_eq!(count_of(busy.id), Some(3));
    assert_eq!(count_of(quiet.id), Some(0));

    let comments = blog.queries.comments_for(busy.id, &Viewer::Anonymous).await.unwrap();
    let ids: Vec<Uuid> = comments.iter().map(|c| c.comment.id).collect();
    assert_eq!(ids, vec![oldest.id, middle.id, newest.id]);
    assert_eq!(comments[0].author_username, "author");

    BaseRepository::<Comment, Uuid>::delete(blog.store.as_ref(), middle.id)
        .await
        .unwrap();
    let summary = blog.queries.get_visible_post(busy.id, &Viewer::Anonymous).await.unwrap();
    assert_eq!(summary.comment_count, 2);
}

#[tokio::test]
async fn test_author_listing_and_profile_visibility() {
    let blog = blog();
    let author = blog.user("author").await;
    let stranger = blog.user("stranger").await;
    let category = blog.category("diary", true).await;

    let public = blog.post(&author, &category, -Duration::hours(1), true).await;
    blog.post(&author, &category, -Duration::hours(1), false).await;
    blog.post(&author, &category, Duration::hours(1), true).await;
    blog.post(&stranger, &category, -Duration::hours(1), true).await;

    assert_eq!(blog.queries.list_by_author(author.id, None).await.unwrap().len(), 3);

    let own = blog
        .queries
        .list_profile("author", &Viewer::User(author.id), None)
        .await
        .unwrap();
    assert_eq!(own.user.id, author.id);
    assert_eq!(own.posts.len(), 3);

    for viewer in [Viewer::Anonymous, Viewer::User(stranger.id)] {
        let seen = blog.queries.list_profile("author", &viewer, None).await.unwrap();
        let ids: Vec<Uuid> = seen.posts.iter().map(|s| s.post.id).collect();
        assert_eq!(ids, vec![public.id]);
    }

    assert!(is_not_found(
        &blog.queries.list_profile("ghost", &Viewer::Anonymous, None).await
    ));
}

#[tokio::test]
async fn test_location_is_optional() {
    let blog = blog();
    let author = blog.user("author").await;
    let category = blog.category("places", true).await;
    let location: Location = blog.store.insert(Location::new("Moscow".into())).await.unwrap();

    let mut post = blog.post(&author, &category, -Duration::hours(1), true).await;
    post.location_id = Some(location.id);
    let post: Post = blog.store.update(post).await.unwrap();

    let summary = blog.queries.get_visible_post(post.id, &Viewer::Anonymous).await.unwrap();
    assert_eq!(summary.location.map(|l| l.name), Some("Moscow".to_string()));

    BaseRepository::<Location, Uuid>::delete(blog.store.as_ref(), location.id)
        .await
        .unwrap();
    let summary = blog.queries.get_visible_post(post.id, &Viewer::Anonymous).await.unwrap();
    assert!(summary.location.is_none());
    assert!(summary.post.location_id.is_none());
}

#[tokio::test]
async fn test_forbidden_words_block_post_creation() {
    let blog = blog();
    let author = blog.user("author").await;
    let category = blog.category("general", true).await;
    blog.admin.add_word("spam".into()).await.unwrap();

    let rejected = blog
        .posts
        .create(&Viewer::User(author.id), blog.draft(&category, "buy spamx today"))
        .await;
    match rejected {
        Err(DomainError::ForbiddenWords(words)) => assert_eq!(words, vec!["spam"]),
        other => panic!("expected rejection, got {other:?}"),
    }
    assert!(blog.queries.list_by_author(author.id, None).await.unwrap().is_empty());

    let created = blog
        .posts
        .create(&Viewer::User(author.id), blog.draft(&category, "hello world"))
        .await
        .unwrap();
    assert_eq!(created.author_id, author.id);
}

#[tokio::test]
async fn test_forbidden_word_in_comment() {
    let blog = blog();
    let author = blog.user("author").await;
    let reader = blog.user("reader").await;
    let category = blog.category("general", true).await;
    let post = blog.post(&author, &category, -Duration::hours(1), true).await;
    let word = blog.admin.add_word("ban".into()).await.unwrap();

    let rejected = blog
        .comments
        .create(post.id, &Viewer::User(reader.id), "I bane this".into())
        .await;
    match rejected {
        Err(DomainError::ForbiddenWords(words)) => assert_eq!(words, vec!["ban"]),
        other => panic!("expected rejection, got {other:?}"),
    }

    blog.admin.remove_word(word.id).await.unwrap();
    assert!(
        blog.comments
            .create(post.id, &Viewer::User(reader.id), "I bane this".into())
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_only_the_author_may_change_a_post() {
    let blog = blog();
    let author = blog.user("author").await;
    let other = blog.user("other").await;
    let category = blog.category("general", true).await;
    let post = blog
        .posts
        .create(&Viewer::User(author.id), blog.draft(&category, "first"))
        .await
        .unwrap();

    let denied = blog
        .posts
        .update(post.id, &Viewer::User(other.id), blog.draft(&category, "hijacked"))
        .await;
    assert!(matches!(denied, Err(DomainError::PermissionDenied)));
    assert!(matches!(
        blog.posts.delete(post.id, &Viewer::Anonymous).await,
        Err(DomainError::PermissionDenied)
    ));

    let updated = blog
        .posts
        .update(post.id, &Viewer::User(author.id), blog.draft(&category, "second"))
        .await
        .unwrap();
    assert_eq!(updated.text, "second");
    assert_eq!(updated.author_id, author.id);

    blog.comment(&post, &other, 1).await;
    blog.posts.delete(post.id, &Viewer::User(author.id)).await.unwrap();
    assert!(blog.queries.comments_for(post.id, &Viewer::User(author.id)).await.is_err());
    assert!(
        CommentRepository::list_for_post(blog.store.as_ref(), post.id)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_post_needs_signed_in_author_and_known_category() {
    let blog = blog();
    let author = blog.user("author").await;
    let category = blog.category("general", true).await;

    assert!(matches!(
        blog.posts.create(&Viewer::Anonymous, blog.draft(&category, "text")).await,
        Err(DomainError::Unauthorized)
    ));

    let mut draft = blog.draft(&category, "text");
    draft.category_id = Uuid::new_v4();
    assert!(matches!(
        blog.posts.create(&Viewer::User(author.id), draft).await,
        Err(DomainError::Validation(_))
    ));

    let mut draft = blog.draft(&category, "text");
    draft.title = "x".repeat(257);
    assert!(matches!(
        blog.posts.create(&Viewer::User(author.id), draft).await,
        Err(DomainError::Validation(_))
    ));

    assert!(matches!(
        blog.posts.create(&Viewer::User(author.id), blog.draft(&category, "   ")).await,
        Err(DomainError::Validation(_))
    ));
    assert!(blog.queries.list_by_author(author.id, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_hidden_post_mutations_look_like_missing_ones() {
    let blog = blog();
    let author = blog.user("author").await;
    let other = blog.user("other").await;
    let open = blog.category("open", true).await;
    let closed = blog.category("closed", false).await;
    let hour = Duration::hours(1);
    let viewer = Viewer::User(other.id);

    let hidden = [
        blog.post(&author, &open, -hour, false).await,
        blog.post(&author, &open, hour, true).await,
        blog.post(&author, &closed, -hour, true).await,
    ];
    let visible = blog.post(&author, &open, -hour, true).await;
    let comment = blog.comment(&visible, &author, 1).await;

    let missing = Uuid::new_v4();
    assert!(is_not_found(&blog.posts.delete(missing, &viewer).await));
    assert!(is_not_found(
        &blog.posts.update(missing, &viewer, blog.draft(&open, "text")).await
    ));

    for post in &hidden {
        assert!(is_not_found(&blog.posts.delete(post.id, &viewer).await));
        assert!(is_not_found(
            &blog.posts.update(post.id, &viewer, blog.draft(&open, "text")).await
        ));
        assert!(is_not_found(
            &blog.comments.delete(post.id, comment.id, &viewer).await
        ));
    }

    // A post the viewer can see still reports the ownership failure.
    assert!(matches!(
        blog.posts.delete(visible.id, &viewer).await,
        Err(DomainError::PermissionDenied)
    ));
    assert!(matches!(
        blog.comments.update(visible.id, comment.id, &viewer, "edited".into()).await,
        Err(DomainError::PermissionDenied)
    ));

    // Once the category is hidden, its comments are out of reach too.
    let mut moved = visible.clone();
    moved.category_id = closed.id;
    blog.store.update(moved).await.unwrap();
    assert!(is_not_found(
        &blog.comments.update(visible.id, comment.id, &viewer, "edited".into()).await
    ));

    // The author still reaches every one of them.
    for post in &hidden {
        blog.posts.delete(post.id, &Viewer::User(author.id)).await.unwrap();
    }
    blog.comments
        .delete(visible.id, comment.id, &Viewer::User(author.id))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_comment_rules() {
    let blog = blog();
    let author = blog.user("author").await;
    let reader = blog.user("reader").await;
    let category = blog.category("general", true).await;
    let post = blog.post(&author, &category, -Duration::hours(1), true).await;
    let draft = blog.post(&author, &category, -Duration::hours(1), false).await;

    assert!(matches!(
        blog.comments.create(post.id, &Viewer::Anonymous, "hi".into()).await,
        Err(DomainError::Unauthorized)
    ));
    assert!(is_not_found(
        &blog.comments.create(draft.id, &Viewer::User(reader.id), "hi".into()).await
    ));

    let comment = blog
        .comments
        .create(post.id, &Viewer::User(reader.id), "hi".into())
        .await
        .unwrap();
    assert_eq!(comment.created_at, blog.clock.now());

    assert!(matches!(
        blog.comments
            .update(post.id, comment.id, &Viewer::User(author.id), "edited".into())
            .await,
        Err(DomainError::PermissionDenied)
    ));
    assert!(is_not_found(
        &blog.comments.delete(draft.id, comment.id, &Viewer::User(reader.id)).await
    ));

    let edited = blog
        .comments
        .update(post.id, comment.id, &Viewer::User(reader.id), "edited".into())
        .await
        .unwrap();
    assert_eq!(edited.text, "edited");

    blog.comments
        .delete(post.id, comment.id, &Viewer::User(reader.id))
        .await
        .unwrap();
    assert!(blog.queries.comments_for(post.id, &Viewer::Anonymous).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_post_detail_carries_comments_oldest_first() {
    let blog = blog();
    let author = blog.user("author").await;
    let reader = blog.user("reader").await;
    let category = blog.category("general", true).await;
    let post = blog.post(&author, &category, -Duration::hours(1), true).await;
    let scheduled = blog.post(&author, &category, Duration::hours(1), true).await;
    let newer = blog.comment(&post, &author, 1).await;
    let older = blog.comment(&post, &reader, 5).await;

    let detail = blog.queries.get_post_detail(post.id, &Viewer::Anonymous).await.unwrap();
    assert_eq!(detail.summary.post.id, post.id);
    assert_eq!(detail.summary.comment_count, 2);
    let ids: Vec<Uuid> = detail.comments.iter().map(|view| view.comment.id).collect();
    assert_eq!(ids, vec![older.id, newer.id]);
    assert_eq!(detail.comments[0].author_username, "reader");

    assert!(is_not_found(
        &blog.queries.get_post_detail(scheduled.id, &Viewer::User(reader.id)).await
    ));
    let own = blog
        .queries
        .get_post_detail(scheduled.id, &Viewer::User(author.id))
        .await
        .unwrap();
    assert!(own.comments.is_empty());
}

#[tokio::test]
async fn test_profile_update() {
    let blog = blog();
    let leo = blog.user("leo").await;
    blog.user("anna").await;

    let changes = |username: &str| ProfileChanges {
        username: username.into(),
        email: "leo@example.com".into(),
        first_name: "Leo".into(),
        last_name: "Tolstoy".into(),
    };

    assert!(matches!(
        blog.profiles.update(&Viewer::User(leo.id), changes("anna")).await,
        Err(DomainError::Duplicate(_))
    ));
    assert!(matches!(
        blog.profiles.update(&Viewer::Anonymous, changes("leo")).await,
        Err(DomainError::Unauthorized)
    ));

    let updated = blog
        .profiles
        .update(&Viewer::User(leo.id), changes("count_leo"))
        .await
        .unwrap();
    assert_eq!(updated.username, "count_leo");
    assert_eq!(updated.last_name, "Tolstoy");
    assert!(
        blog.queries
            .list_profile("count_leo", &Viewer::Anonymous, None)
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_admin_reference_data() {
    let blog = blog();
    let draft = |slug: &str| CategoryDraft {
        title: "Travel".into(),
        description: "Trips".into(),
        slug: slug.into(),
        is_published: true,
    };

    let travel = blog.admin.create_category(draft("travel")).await.unwrap();
    assert!(matches!(
        blog.admin.create_category(draft("travel")).await,
        Err(DomainError::Duplicate(_))
    ));
    assert!(matches!(
        blog.admin.create_category(draft("bad slug")).await,
        Err(DomainError::Validation(_))
    ));

    let mut hidden = draft("travel");
    hidden.is_published = false;
    let updated = blog.admin.update_category(travel.id, hidden).await.unwrap();
    assert!(!updated.is_published);
    assert!(is_not_found(&blog.queries.list_by_category("travel", None).await));

    assert!(matches!(
        blog.admin.add_word("   ".into()).await,
        Err(DomainError::Validation(_))
    ));
    blog.admin.add_word("spam".into()).await.unwrap();
    assert!(matches!(
        blog.admin.add_word("spam".into()).await,
        Err(DomainError::Duplicate(_))
    ));
    assert_eq!(blog.admin.list_words().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_store_enforces_references() {
    let blog = blog();
    let author = blog.user("author").await;
    let category = blog.category("general", true).await;
    let post = blog.post(&author, &category, -Duration::hours(1), true).await;
    blog.comment(&post, &author, 1).await;

    let restricted = BaseRepository::<Category, Uuid>::delete(blog.store.as_ref(), category.id).await;
    assert!(matches!(restricted, Err(blogicum_core::error::RepoError::Constraint(_))));

    let orphan = Post::new(Uuid::new_v4(), category.id, "T".into(), "B".into(), Utc::now());
    assert!(blog.store.insert(orphan).await.is_err());

    BaseRepository::<User, Uuid>::delete(blog.store.as_ref(), author.id)
        .await
        .unwrap();
    let gone: Option<Post> = blog.store.find_by_id(post.id).await.unwrap();
    assert!(gone.is_none());
    assert!(
        CommentRepository::list_for_post(blog.store.as_ref(), post.id)
            .await
            .unwrap()
            .is_empty()
    );
}
