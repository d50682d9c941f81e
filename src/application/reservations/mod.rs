//! Reservation management use cases

pub mod service;

pub use service::{EditForm, ReservationService, ReservationUpdate};
