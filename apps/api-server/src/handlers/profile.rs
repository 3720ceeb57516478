//! Profile handlers.

use actix_web::{HttpResponse, web};

use blogicum_core::services::ProfileChanges;
use blogicum_shared::dto::{ListQuery, ProfileResponse, ProfileUpdateRequest};

use super::mapping;
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/profile/{username}
pub async fn show(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<String>,
    query: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    let page = state.page(query.into_inner());
    let profile = state
        .queries
        .list_profile(&path.into_inner(), &identity.viewer(), Some(page))
        .await?;

    Ok(HttpResponse::Ok().json(ProfileResponse {
        username: profile.user.username,
        first_name: profile.user.first_name,
        last_name: profile.user.last_name,
        joined: profile.user.created_at,
        posts: mapping::post_summaries(profile.posts),
    }))
}

/// PUT /api/profile
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<ProfileUpdateRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let user = state
        .profiles
        .update(
            &identity.viewer(),
            ProfileChanges {
                username: req.username,
                email: req.email,
                first_name: req.first_name,
                last_name: req.last_name,
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(mapping::user(user)))
}
