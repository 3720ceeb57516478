//! Handler errors rendered as RFC 7807 problem details.

use std::fmt;

use actix_web::{HttpResponse, ResponseError, http::StatusCode, http::header};
use uuid::Uuid;

use blogicum_core::error::{DomainError, RepoError};
use blogicum_core::ports::AuthError;
use blogicum_shared::ErrorResponse;

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Unauthorized(String),
    Forbidden,
    Conflict(String),
    Internal(String),
    /// Text matched the blocklist; carries the matched words.
    ForbiddenWords(Vec<String>),
    /// Mutation refused to a non-author; points back at the post.
    SeeOther(String),
}

impl AppError {
    /// Map a failed post or comment mutation. Non-authors are sent back to
    /// the post instead of receiving a 403.
    pub fn for_mutation(err: DomainError, post_id: Uuid) -> Self {
        match err {
            DomainError::PermissionDenied => AppError::SeeOther(format!("/api/posts/{post_id}")),
            other => other.into(),
        }
    }

    fn forbidden_message(words: &[String]) -> String {
        DomainError::ForbiddenWords(words.to_vec()).to_string()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {msg}"),
            AppError::BadRequest(msg) => write!(f, "Bad request: {msg}"),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {msg}"),
            AppError::Forbidden => f.write_str("Forbidden"),
            AppError::Conflict(msg) => write!(f, "Conflict: {msg}"),
            AppError::Internal(msg) => write!(f, "Internal error: {msg}"),
            AppError::ForbiddenWords(words) => f.write_str(&Self::forbidden_message(words)),
            AppError::SeeOther(location) => write!(f, "See other: {location}"),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ForbiddenWords(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::SeeOther(_) => StatusCode::SEE_OTHER,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let problem = ErrorResponse::new(status.as_u16());

        let body = match self {
            AppError::NotFound(detail)
            | AppError::BadRequest(detail)
            | AppError::Unauthorized(detail)
            | AppError::Conflict(detail) => problem.with_detail(detail.clone()),
            AppError::Forbidden => problem,
            AppError::Internal(detail) => {
                // The detail stays in the log.
                tracing::error!(detail = %detail, "Internal error");
                problem
            }
            AppError::ForbiddenWords(words) => {
                ErrorResponse::forbidden_words(Self::forbidden_message(words), words.clone())
            }
            AppError::SeeOther(location) => {
                return HttpResponse::SeeOther()
                    .insert_header((header::LOCATION, location.as_str()))
                    .json(
                        problem
                            .with_detail("Only the author may change this content")
                            .with_instance(location.clone()),
                    );
            }
        };

        HttpResponse::build(status).json(body)
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity } => AppError::NotFound(format!("{entity} not found")),
            DomainError::ForbiddenWords(words) => AppError::ForbiddenWords(words),
            DomainError::Validation(msg) => AppError::BadRequest(msg),
            DomainError::Duplicate(msg) => AppError::Conflict(msg),
            DomainError::PermissionDenied => AppError::Forbidden,
            DomainError::Unauthorized => {
                AppError::Unauthorized("Sign in to perform this action".to_string())
            }
            DomainError::Internal(msg) => AppError::Internal(msg),
            DomainError::Repository(e) => e.into(),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Resource not found".to_string()),
            RepoError::Constraint(msg) => AppError::Conflict(msg),
            RepoError::Connection(msg) | RepoError::Query(msg) => AppError::Internal(msg),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken => {
                AppError::Unauthorized("Provide a Bearer token in the Authorization header".to_string())
            }
            AuthError::TokenExpired => {
                AppError::Unauthorized("Token expired, sign in again".to_string())
            }
            AuthError::InvalidToken(msg) => AppError::Unauthorized(msg),
            AuthError::Hashing(msg) => AppError::Internal(msg),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn body_json(res: HttpResponse) -> serde_json::Value {
        let body = to_bytes(res.into_body()).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[actix_web::test]
    async fn test_forbidden_words_render_as_422() {
        let res = AppError::from(DomainError::ForbiddenWords(vec!["spam".into()])).error_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let json = body_json(res).await;
        assert_eq!(json["detail"], "Forbidden words are not allowed: spam");
        assert_eq!(json["forbidden_words"][0], "spam");
    }

    #[actix_web::test]
    async fn test_permission_denied_redirects_to_post() {
        let post_id = Uuid::new_v4();
        let res = AppError::for_mutation(DomainError::PermissionDenied, post_id).error_response();

        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        let location = format!("/api/posts/{post_id}");
        assert_eq!(res.headers().get(header::LOCATION).unwrap().to_str().unwrap(), location);
        assert_eq!(body_json(res).await["instance"], location);
    }

    #[actix_web::test]
    async fn test_internal_detail_is_not_leaked() {
        let res = AppError::from(RepoError::Connection("pool timed out".into())).error_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(res).await;
        assert_eq!(json["title"], "Internal Server Error");
        assert!(json.get("detail").is_none());
    }

    #[test]
    fn test_hidden_and_missing_look_the_same() {
        let res = AppError::from(DomainError::not_found("post")).error_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_other_mutation_errors_pass_through() {
        let err = AppError::for_mutation(DomainError::not_found("post"), Uuid::new_v4());
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_auth_errors_are_401() {
        for err in [
            AuthError::MissingToken,
            AuthError::TokenExpired,
            AuthError::InvalidToken("bad".into()),
        ] {
            assert_eq!(AppError::from(err).status_code(), StatusCode::UNAUTHORIZED);
        }
    }
}
