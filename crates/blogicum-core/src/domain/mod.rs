//! Domain entities - the core business objects.

mod category;
mod comment;
mod forbidden_word;
mod location;
mod post;
mod user;
mod viewer;

pub use category::Category;
pub use comment::{Comment, CommentView};
pub use forbidden_word::ForbiddenWord;
pub use location::Location;
pub use post::{AuthorRef, CategoryRef, LocationRef, Post, PostSummary, TITLE_MAX_LEN};
pub use user::User;
pub use viewer::Viewer;
