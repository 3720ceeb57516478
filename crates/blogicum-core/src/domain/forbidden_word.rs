use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::post::validate_title;
use crate::error::DomainError;

/// A word or phrase that user-submitted text may not resemble.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForbiddenWord {
    pub id: Uuid,
    pub word: String,
}

impl ForbiddenWord {
    pub fn new(word: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            word,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        validate_title("word", &self.word)
    }
}
