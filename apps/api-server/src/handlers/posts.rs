//! Post and comment handlers.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use uuid::Uuid;

use blogicum_core::domain::{Comment, CommentView};
use blogicum_core::services::PostDraft;
use blogicum_shared::dto::{CommentRequest, CommentResponse, ListQuery, PostDetailResponse, PostRequest};

use super::mapping;
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn draft(req: PostRequest) -> PostDraft {
    PostDraft {
        title: req.title,
        text: req.text,
        pub_date: req.pub_date.unwrap_or_else(Utc::now),
        category_id: req.category_id,
        location_id: req.location_id,
        image: req.image,
        is_published: req.is_published,
    }
}

/// GET /api/posts
pub async fn list(state: web::Data<AppState>, query: web::Query<ListQuery>) -> AppResult<HttpResponse> {
    let page = state.page(query.into_inner());
    let posts = state.queries.list_public(Some(page)).await?;

    Ok(HttpResponse::Ok().json(mapping::post_summaries(posts)))
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .create(&identity.viewer(), draft(body.into_inner()))
        .await?;

    Ok(HttpResponse::Created().json(mapping::post(post)))
}

/// GET /api/posts/{id}
pub async fn detail(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let detail = state.queries.get_post_detail(id, &identity.viewer()).await?;

    Ok(HttpResponse::Ok().json(PostDetailResponse {
        post: mapping::post_summary(detail.summary),
        comments: detail.comments.into_iter().map(mapping::comment_view).collect(),
    }))
}

/// PUT /api/posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let post = state
        .posts
        .update(id, &identity.viewer(), draft(body.into_inner()))
        .await
        .map_err(|e| AppError::for_mutation(e, id))?;

    Ok(HttpResponse::Ok().json(mapping::post(post)))
}

/// DELETE /api/posts/{id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    state
        .posts
        .delete(id, &identity.viewer())
        .await
        .map_err(|e| AppError::for_mutation(e, id))?;

    Ok(HttpResponse::NoContent().finish())
}

/// POST /api/posts/{id}/comments
pub async fn add_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let comment = state
        .comments
        .create(post_id, &identity.viewer(), body.into_inner().text)
        .await?;

    Ok(HttpResponse::Created().json(with_author(&state, comment).await?))
}

/// PUT /api/posts/{id}/comments/{comment_id}
pub async fn edit_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let comment = state
        .comments
        .update(post_id, comment_id, &identity.viewer(), body.into_inner().text)
        .await
        .map_err(|e| AppError::for_mutation(e, post_id))?;

    Ok(HttpResponse::Ok().json(with_author(&state, comment).await?))
}

/// DELETE /api/posts/{id}/comments/{comment_id}
pub async fn delete_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    state
        .comments
        .delete(post_id, comment_id, &identity.viewer())
        .await
        .map_err(|e| AppError::for_mutation(e, post_id))?;

    Ok(HttpResponse::NoContent().finish())
}

/// Render `comment` under its author's current username. Token claims may
/// predate a rename.
async fn with_author(state: &AppState, comment: Comment) -> AppResult<CommentResponse> {
    let author = state
        .users
        .find_by_id(comment.author_id)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

    Ok(mapping::comment_view(CommentView {
        comment,
        author_username: author.username,
    }))
}
