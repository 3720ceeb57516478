//! Credential ports: bearer tokens and password hashes.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::User;

/// The account a bearer token is issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSubject {
    pub user_id: Uuid,
    pub username: String,
    /// Staff accounts may maintain the blocklist and reference data.
    pub is_staff: bool,
}

impl From<&User> for TokenSubject {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            is_staff: user.is_staff,
        }
    }
}

/// A verified token.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub subject: TokenSubject,
    pub expires_at: DateTime<Utc>,
}

pub trait TokenService: Send + Sync {
    /// Sign a token for `subject`.
    fn issue(&self, subject: &TokenSubject) -> Result<String, AuthError>;

    /// Check signature, issuer and expiry, then decode.
    fn verify(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// Lifetime of issued tokens, in seconds.
    fn lifetime_seconds(&self) -> u64;
}

pub trait PasswordService: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// `Ok(false)` on a mismatch; `Err` only when `hash` is unusable.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Authorization header is missing")]
    MissingToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),
}
