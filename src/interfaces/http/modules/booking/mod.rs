//! Booking wizard pages: location, car, insurance, accessories, payment

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
