//! Authentication module: login, signup, logout

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
