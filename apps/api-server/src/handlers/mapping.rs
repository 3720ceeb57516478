//! Domain to wire conversions.

use blogicum_core::domain::{
    Category, Comment, CommentView, ForbiddenWord, Location, Post, PostSummary, User,
};
use blogicum_shared::dto::{
    AuthorResponse, CategoryRefResponse, CategoryResponse, CommentResponse,
    ForbiddenWordResponse, LocationRefResponse, LocationResponse, PostResponse,
    PostSummaryResponse, UserResponse,
};

pub fn post_summary(summary: PostSummary) -> PostSummaryResponse {
    let location = summary
        .location
        .filter(|l| l.is_published)
        .map(|l| LocationRefResponse { name: l.name });

    PostSummaryResponse {
        id: summary.post.id,
        title: summary.post.title,
        text: summary.post.text,
        pub_date: summary.post.pub_date,
        author: AuthorResponse {
            id: summary.author.id,
            username: summary.author.username,
        },
        category: CategoryRefResponse {
            title: summary.category.title,
            slug: summary.category.slug,
        },
        location,
        image: summary.post.image,
        is_published: summary.post.is_published,
        comment_count: summary.comment_count,
    }
}

pub fn post_summaries(summaries: Vec<PostSummary>) -> Vec<PostSummaryResponse> {
    summaries.into_iter().map(post_summary).collect()
}

pub fn post(post: Post) -> PostResponse {
    PostResponse {
        id: post.id,
        title: post.title,
        text: post.text,
        pub_date: post.pub_date,
        author_id: post.author_id,
        category_id: post.category_id,
        location_id: post.location_id,
        image: post.image,
        is_published: post.is_published,
        created_at: post.created_at,
    }
}

pub fn comment_view(view: CommentView) -> CommentResponse {
    let author = AuthorResponse {
        id: view.comment.author_id,
        username: view.author_username,
    };
    comment(view.comment, author)
}

fn comment(comment: Comment, author: AuthorResponse) -> CommentResponse {
    CommentResponse {
        id: comment.id,
        post_id: comment.post_id,
        text: comment.text,
        author,
        created_at: comment.created_at,
    }
}

pub fn user(user: User) -> UserResponse {
    UserResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        first_name: user.first_name,
        last_name: user.last_name,
        is_staff: user.is_staff,
        created_at: user.created_at,
    }
}

pub fn category(category: Category) -> CategoryResponse {
    CategoryResponse {
        id: category.id,
        title: category.title,
        description: category.description,
        slug: category.slug,
        is_published: category.is_published,
        created_at: category.created_at,
    }
}

pub fn location(location: Location) -> LocationResponse {
    LocationResponse {
        id: location.id,
        name: location.name,
        is_published: location.is_published,
        created_at: location.created_at,
    }
}

pub fn forbidden_word(word: ForbiddenWord) -> ForbiddenWordResponse {
    ForbiddenWordResponse {
        id: word.id,
        word: word.word,
    }
}
