//! # Blogicum Shared
//!
//! Wire types of the HTTP API, free of any server-side dependency so that
//! clients can reuse them.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;
