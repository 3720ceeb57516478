//! Bearer-token extractors.
//!
//! `Identity` rejects the request without a valid token; `OptionalIdentity`
//! falls back to an anonymous viewer. Both read the token service from
//! `web::Data<Arc<dyn TokenService>>`.

use std::future::{Ready, ready};
use std::sync::Arc;

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use uuid::Uuid;

use blogicum_core::domain::Viewer;
use blogicum_core::ports::{AuthError, TokenService, TokenSubject};

use super::error::AppError;

/// The signed-in user behind a request.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: Uuid,
    pub username: String,
    pub is_staff: bool,
}

impl Identity {
    pub fn viewer(&self) -> Viewer {
        Viewer::User(self.user_id)
    }
}

impl From<TokenSubject> for Identity {
    fn from(subject: TokenSubject) -> Self {
        Self {
            user_id: subject.user_id,
            username: subject.username,
            is_staff: subject.is_staff,
        }
    }
}

fn bearer_token(req: &HttpRequest) -> Result<&str, AuthError> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?;

    value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AuthError::InvalidToken("expected `Bearer <token>`".to_string()))
}

fn authenticate(req: &HttpRequest) -> Result<Identity, AppError> {
    let Some(tokens) = req.app_data::<web::Data<Arc<dyn TokenService>>>() else {
        tracing::error!("TokenService is not registered as app data");
        return Err(AppError::Internal("token service unavailable".to_string()));
    };

    let claims = tokens.verify(bearer_token(req)?)?;
    Ok(claims.subject.into())
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

/// Identity when a valid token is present. Anything else is anonymous.
pub struct OptionalIdentity(pub Option<Identity>);

impl OptionalIdentity {
    pub fn viewer(&self) -> Viewer {
        self.0.as_ref().map_or(Viewer::Anonymous, Identity::viewer)
    }
}

impl FromRequest for OptionalIdentity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let identity = match authenticate(req) {
            Ok(identity) => Some(identity),
            Err(AppError::Unauthorized(reason)) => {
                if req.headers().contains_key(header::AUTHORIZATION) {
                    tracing::debug!(reason = %reason, "Ignoring unusable token");
                }
                None
            }
            Err(_) => None,
        };
        ready(Ok(OptionalIdentity(identity)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use blogicum_infra::{JwtConfig, JwtTokenService};

    fn token_service() -> Arc<dyn TokenService> {
        Arc::new(JwtTokenService::new(JwtConfig {
            secret: "test-secret".to_string(),
            expiration_hours: 1,
            issuer: "test".to_string(),
        }))
    }

    #[actix_web::test]
    async fn test_bearer_token_yields_identity() {
        let tokens = token_service();
        let user_id = Uuid::new_v4();
        let token = tokens
            .issue(&TokenSubject {
                user_id,
                username: "leo".to_string(),
                is_staff: true,
            })
            .unwrap();

        let req = TestRequest::default()
            .app_data(web::Data::new(tokens))
            .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
            .to_http_request();

        let identity = Identity::extract(&req).await.unwrap();
        assert_eq!(identity.user_id, user_id);
        assert_eq!(identity.username, "leo");
        assert!(identity.is_staff);
        assert_eq!(identity.viewer(), Viewer::User(user_id));
    }

    #[actix_web::test]
    async fn test_missing_token_is_anonymous_when_optional() {
        let req = TestRequest::default()
            .app_data(web::Data::new(token_service()))
            .to_http_request();

        assert!(matches!(
            Identity::extract(&req).await,
            Err(AppError::Unauthorized(_))
        ));
        let optional = OptionalIdentity::extract(&req).await.unwrap();
        assert_eq!(optional.viewer(), Viewer::Anonymous);
    }

    #[actix_web::test]
    async fn test_malformed_header_is_rejected() {
        for value in ["Token abc", "Bearer ", "Bearer    "] {
            let req = TestRequest::default()
                .app_data(web::Data::new(token_service()))
                .insert_header((header::AUTHORIZATION, value))
                .to_http_request();

            assert!(matches!(
                Identity::extract(&req).await,
                Err(AppError::Unauthorized(_))
            ));
        }
    }
}
