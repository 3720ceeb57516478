//! Authentication handlers.

use actix_web::{HttpResponse, web};
use std::sync::Arc;

use blogicum_core::domain::User;
use blogicum_core::ports::{PasswordService, TokenService, TokenSubject};
use blogicum_shared::dto::{AuthResponse, LoginRequest, RegisterUserRequest};

use super::mapping;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::observability::RequestId;
use crate::state::AppState;

/// Minimum accepted password length.
const MIN_PASSWORD_LEN: usize = 8;

fn issue_token(token_service: &dyn TokenService, user: &User) -> AppResult<AuthResponse> {
    let token = token_service
        .issue(&TokenSubject::from(user))
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: token_service.lifetime_seconds(),
    })
}

fn bad_credentials() -> AppError {
    AppError::Unauthorized("Invalid username or password".to_string())
}

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    // Validate input
    if !User::is_valid_username(&req.username) {
        return Err(AppError::BadRequest(
            "Username may contain only letters, digits and @/./+/-/_".to_string(),
        ));
    }
    if !User::is_valid_email(&req.email) {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    // Check if user already exists
    if state.users.find_by_username(&req.username).await?.is_some() {
        return Err(AppError::Conflict("Username already taken".to_string()));
    }

    // Hash password
    let password_hash = password_service.hash(&req.password)?;

    let mut user = User::new(req.username, req.email, password_hash);
    user.is_staff = state.staff_usernames.contains(&user.username);
    let saved_user = state.users.insert(user).await?;
    tracing::info!(user_id = %saved_user.id, is_staff = saved_user.is_staff, "User registered");

    Ok(HttpResponse::Created().json(issue_token(token_service.get_ref().as_ref(), &saved_user)?))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    request_id: RequestId,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .users
        .find_by_username(&req.username)
        .await?
        .ok_or_else(bad_credentials)?;

    // Verify password
    let valid = password_service.verify(&req.password, &user.password_hash)?;

    if !valid {
        tracing::info!(
            username = %req.username,
            request_id = %request_id.as_str(),
            "Rejected login"
        );
        return Err(bad_credentials());
    }

    Ok(HttpResponse::Ok().json(issue_token(token_service.get_ref().as_ref(), &user)?))
}

/// GET /api/auth/me - Protected route
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

    Ok(HttpResponse::Ok().json(mapping::user(user)))
}
