//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod clock;
mod query;
mod repository;

pub use auth::{AuthError, PasswordService, TokenClaims, TokenService, TokenSubject};
pub use clock::Clock;
pub use query::{DEFAULT_PAGE_SIZE, PageRequest, PostFilter, Visibility};
pub use repository::{
    BaseRepository, CategoryRepository, CommentRepository, ForbiddenWordRepository,
    LocationRepository, PostRepository, UserRepository,
};
