//! Domain-level error types.

use thiserror::Error;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Missing, or present but hidden from the viewer. The two cases are
    /// deliberately indistinguishable.
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    #[error("Forbidden words are not allowed: {}", .0.join(", "))]
    ForbiddenWords(Vec<String>),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Permission denied")]
    PermissionDenied,

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Repository(#[from] RepoError),
}

impl DomainError {
    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound { entity }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forbidden_words_message_names_every_word() {
        let err = DomainError::ForbiddenWords(vec!["ban".into(), "spam".into()]);
        assert_eq!(err.to_string(), "Forbidden words are not allowed: ban, spam");
    }

    #[test]
    fn test_not_found_is_generic() {
        assert_eq!(DomainError::not_found("post").to_string(), "post not found");
    }
}
