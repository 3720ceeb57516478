//! # Blogicum Infrastructure
//!
//! Concrete implementations of the ports defined in `blogicum-core`:
//! SeaORM repositories for PostgreSQL, an in-memory store, clocks and
//! authentication services.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL database support via SeaORM
//! - `auth` - JWT + Argon2 authentication

pub mod clock;
pub mod database;
pub mod memory;

#[cfg(feature = "auth")]
pub mod auth;

pub use clock::{ManualClock, SystemClock};
pub use database::DatabaseConfig;
pub use memory::InMemoryStore;

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
