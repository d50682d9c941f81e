//! Application layer: use cases orchestrating the domain and repositories
//!
//! Services are stateless apart from their dependencies. Wizard state is
//! passed in and handed back as a [`BookingDraft`](crate::domain::BookingDraft);
//! persisting it in the session is the caller's job.

pub mod booking;
pub mod identity;
pub mod reservations;

pub use booking::{BookingService, PaymentReview};
pub use identity::AuthService;
pub use reservations::{EditForm, ReservationService, ReservationUpdate};
