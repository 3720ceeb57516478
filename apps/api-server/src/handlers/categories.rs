//! Category listing handler.

use actix_web::{HttpResponse, web};

use blogicum_shared::dto::{CategoryPostsResponse, ListQuery};

use super::mapping;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/category/{slug}
pub async fn category_posts(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    let page = state.page(query.into_inner());
    let listing = state
        .queries
        .list_by_category(&path.into_inner(), Some(page))
        .await?;

    Ok(HttpResponse::Ok().json(CategoryPostsResponse {
        category: mapping::category(listing.category),
        posts: mapping::post_summaries(listing.posts),
    }))
}
