//! Staff-only handlers for the blocklist and reference data.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use blogicum_core::services::{CategoryDraft, LocationDraft};
use blogicum_shared::dto::{CategoryRequest, ForbiddenWordRequest, LocationRequest};

use super::mapping;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn require_admin(identity: &Identity) -> AppResult<()> {
    if identity.is_staff {
        Ok(())
    } else {
        tracing::warn!(user_id = %identity.user_id, "Non-staff user attempted an admin action");
        Err(AppError::Forbidden)
    }
}

fn category_draft(req: CategoryRequest) -> CategoryDraft {
    CategoryDraft {
        title: req.title,
        description: req.description,
        slug: req.slug,
        is_published: req.is_published,
    }
}

fn location_draft(req: LocationRequest) -> LocationDraft {
    LocationDraft {
        name: req.name,
        is_published: req.is_published,
    }
}

/// GET /api/admin/forbidden-words
pub async fn list_words(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    require_admin(&identity)?;
    let words = state.admin.list_words().await?;

    Ok(HttpResponse::Ok().json(words.into_iter().map(mapping::forbidden_word).collect::<Vec<_>>()))
}

/// POST /api/admin/forbidden-words
pub async fn add_word(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<ForbiddenWordRequest>,
) -> AppResult<HttpResponse> {
    require_admin(&identity)?;
    let word = state.admin.add_word(body.into_inner().word).await?;

    Ok(HttpResponse::Created().json(mapping::forbidden_word(word)))
}

/// PUT /api/admin/forbidden-words/{id}
pub async fn update_word(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<ForbiddenWordRequest>,
) -> AppResult<HttpResponse> {
    require_admin(&identity)?;
    let word = state
        .admin
        .update_word(path.into_inner(), body.into_inner().word)
        .await?;

    Ok(HttpResponse::Ok().json(mapping::forbidden_word(word)))
}

/// DELETE /api/admin/forbidden-words/{id}
pub async fn remove_word(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    require_admin(&identity)?;
    state.admin.remove_word(path.into_inner()).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/admin/categories
pub async fn list_categories(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    require_admin(&identity)?;
    let categories = state.admin.list_categories().await?;

    Ok(HttpResponse::Ok().json(categories.into_iter().map(mapping::category).collect::<Vec<_>>()))
}

/// POST /api/admin/categories
pub async fn create_category(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CategoryRequest>,
) -> AppResult<HttpResponse> {
    require_admin(&identity)?;
    let category = state
        .admin
        .create_category(category_draft(body.into_inner()))
        .await?;

    Ok(HttpResponse::Created().json(mapping::category(category)))
}

/// PUT /api/admin/categories/{id}
pub async fn update_category(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CategoryRequest>,
) -> AppResult<HttpResponse> {
    require_admin(&identity)?;
    let category = state
        .admin
        .update_category(path.into_inner(), category_draft(body.into_inner()))
        .await?;

    Ok(HttpResponse::Ok().json(mapping::category(category)))
}

/// GET /api/admin/locations
pub async fn list_locations(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    require_admin(&identity)?;
    let locations = state.admin.list_locations().await?;

    Ok(HttpResponse::Ok().json(locations.into_iter().map(mapping::location).collect::<Vec<_>>()))
}

/// POST /api/admin/locations
pub async fn create_location(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<LocationRequest>,
) -> AppResult<HttpResponse> {
    require_admin(&identity)?;
    let location = state
        .admin
        .create_location(location_draft(body.into_inner()))
        .await?;

    Ok(HttpResponse::Created().json(mapping::location(location)))
}

/// PUT /api/admin/locations/{id}
pub async fn update_location(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<LocationRequest>,
) -> AppResult<HttpResponse> {
    require_admin(&identity)?;
    let location = state
        .admin
        .update_location(path.into_inner(), location_draft(body.into_inner()))
        .await?;

    Ok(HttpResponse::Ok().json(mapping::location(location)))
}
