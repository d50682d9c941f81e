//! Confirmed reservations: list, edit, delete

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
