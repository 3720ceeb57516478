//! Author-ownership guard for mutations.

use uuid::Uuid;

use crate::domain::{Comment, Post, Viewer};
use crate::error::DomainError;

/// Content with a single owning author.
pub trait Owned {
    fn owner_id(&self) -> Uuid;
}

impl Owned for Post {
    fn owner_id(&self) -> Uuid {
        self.author_id
    }
}

impl Owned for Comment {
    fn owner_id(&self) -> Uuid {
        self.author_id
    }
}

pub fn is_owner(resource: &impl Owned, viewer: &Viewer) -> bool {
    viewer.is(resource.owner_id())
}

/// Fail with `PermissionDenied` unless `viewer` authored `resource`.
pub fn ensure_owner(resource: &impl Owned, viewer: &Viewer) -> Result<(), DomainError> {
    if is_owner(resource, viewer) {
        Ok(())
    } else {
        tracing::debug!(owner = %resource.owner_id(), viewer = ?viewer, "Ownership check failed");
        Err(DomainError::PermissionDenied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_passes_others_fail() {
        let author = Uuid::new_v4();
        let comment = Comment::new(Uuid::new_v4(), author, "hi".into());

        assert!(ensure_owner(&comment, &Viewer::User(author)).is_ok());
        assert!(matches!(
            ensure_owner(&comment, &Viewer::User(Uuid::new_v4())),
            Err(DomainError::PermissionDenied)
        ));
        assert!(matches!(
            ensure_owner(&comment, &Viewer::Anonymous),
            Err(DomainError::PermissionDenied)
        ));
    }
}
