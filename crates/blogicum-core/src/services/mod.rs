//! Application services - use cases composed from domain rules and ports.

mod admin;
mod comments;
mod content_filter;
mod ownership;
mod posts;
mod profiles;
pub mod similarity;
mod visibility;

pub use admin::{AdminService, CategoryDraft, LocationDraft};
pub use comments::CommentService;
pub use content_filter::{ContentFilter, SIMILARITY_CUTOFF, find_forbidden};
pub use ownership::{Owned, ensure_owner, is_owner};
pub use posts::{PostDraft, PostService};
pub use profiles::{ProfileChanges, ProfileService};
pub use visibility::{CategoryPosts, PostDetail, PostQueryService, Profile};
