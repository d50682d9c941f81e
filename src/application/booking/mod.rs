//! Booking wizard use cases

pub mod service;

pub use service::{BookingService, PaymentReview};
