//! # Blogicum Core
//!
//! The domain layer of the Blogicum blog platform: entities, ports, the post
//! visibility rules and the forbidden-word filter.
//! This crate contains pure business logic with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::DomainError;
