//! HTTP interface
//!
//! - `session`: cookie-based session extractors
//! - `error`: mapping of domain errors to responses
//! - `modules`: handlers grouped by page
//! - `router`: route table with Swagger documentation

pub mod common;
pub mod dto;
pub mod error;
pub mod modules;
pub mod router;
pub mod session;

pub use error::HttpError;
pub use router::{create_router, AppState};
pub use session::{CookieSettings, CurrentSession, MaybeSession, SessionState};

#[cfg(test)]
mod tests;
