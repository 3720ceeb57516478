//! Staff-only management of the blocklist and reference data.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Category, ForbiddenWord, Location};
use crate::error::{DomainError, RepoError};
use crate::ports::{CategoryRepository, ForbiddenWordRepository, LocationRepository};

/// Editable category fields.
#[derive(Debug, Clone)]
pub struct CategoryDraft {
    pub title: String,
    pub description: String,
    pub slug: String,
    pub is_published: bool,
}

/// Editable location fields.
#[derive(Debug, Clone)]
pub struct LocationDraft {
    pub name: String,
    pub is_published: bool,
}

/// Callers are expected to have checked the admin role.
#[derive(Clone)]
pub struct AdminService {
    words: Arc<dyn ForbiddenWordRepository>,
    categories: Arc<dyn CategoryRepository>,
    locations: Arc<dyn LocationRepository>,
}

impl AdminService {
    pub fn new(
        words: Arc<dyn ForbiddenWordRepository>,
        categories: Arc<dyn CategoryRepository>,
        locations: Arc<dyn LocationRepository>,
    ) -> Self {
        Self {
            words,
            categories,
            locations,
        }
    }

    pub async fn list_words(&self) -> Result<Vec<ForbiddenWord>, DomainError> {
        Ok(self.words.list_all().await?)
    }

    pub async fn add_word(&self, word: String) -> Result<ForbiddenWord, DomainError> {
        let word = ForbiddenWord::new(word.trim().to_string());
        word.validate()?;

        let saved = self.words.insert(word).await.map_err(duplicate("word"))?;
        tracing::info!(word_id = %saved.id, "Forbidden word added");
        Ok(saved)
    }

    pub async fn update_word(&self, id: Uuid, word: String) -> Result<ForbiddenWord, DomainError> {
        let mut existing = self
            .words
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("forbidden word"))?;
        existing.word = word.trim().to_string();
        existing.validate()?;

        self.words.update(existing).await.map_err(duplicate("word"))
    }

    pub async fn remove_word(&self, id: Uuid) -> Result<(), DomainError> {
        self.words.delete(id).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found("forbidden word"),
            other => other.into(),
        })?;
        tracing::info!(word_id = %id, "Forbidden word removed");
        Ok(())
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, DomainError> {
        Ok(self.categories.list_all().await?)
    }

    pub async fn create_category(&self, draft: CategoryDraft) -> Result<Category, DomainError> {
        let mut category = Category::new(draft.title, draft.description, draft.slug);
        category.is_published = draft.is_published;
        category.validate()?;
        self.ensure_slug_free(&category).await?;

        let saved = self
            .categories
            .insert(category)
            .await
            .map_err(duplicate("slug"))?;
        tracing::info!(category_id = %saved.id, slug = %saved.slug, "Category created");
        Ok(saved)
    }

    pub async fn update_category(&self, id: Uuid, draft: CategoryDraft) -> Result<Category, DomainError> {
        let mut category = self
            .categories
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("category"))?;

        category.title = draft.title;
        category.description = draft.description;
        category.slug = draft.slug;
        category.is_published = draft.is_published;
        category.validate()?;
        self.ensure_slug_free(&category).await?;

        self.categories
            .update(category)
            .await
            .map_err(duplicate("slug"))
    }

    pub async fn list_locations(&self) -> Result<Vec<Location>, DomainError> {
        Ok(self.locations.list_all().await?)
    }

    pub async fn create_location(&self, draft: LocationDraft) -> Result<Location, DomainError> {
        let mut location = Location::new(draft.name);
        location.is_published = draft.is_published;
        location.validate()?;

        Ok(self.locations.insert(location).await?)
    }

    pub async fn update_location(&self, id: Uuid, draft: LocationDraft) -> Result<Location, DomainError> {
        let mut location = self
            .locations
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("location"))?;

        location.name = draft.name;
        location.is_published = draft.is_published;
        location.validate()?;

        Ok(self.locations.update(location).await?)
    }

    async fn ensure_slug_free(&self, category: &Category) -> Result<(), DomainError> {
        match self.categories.find_by_slug(&category.slug).await? {
            Some(other) if other.id != category.id => {
                Err(DomainError::Duplicate(format!("slug '{}' is taken", category.slug)))
            }
            _ => Ok(()),
        }
    }
}

fn duplicate(field: &'static str) -> impl Fn(RepoError) -> DomainError {
    move |e| match e {
        RepoError::Constraint(_) => DomainError::Duplicate(format!("{field} already exists")),
        other => other.into(),
    }
}
