//! Domain layer: entities, the booking state machine, pricing and the
//! repository / session-store interfaces.

pub mod booking;
pub mod catalog;
pub mod error;
pub mod repositories;
pub mod reservation;
pub mod session;
pub mod user;

// Re-export commonly used types
pub use booking::{BookingDraft, BookingStep, PriceQuote};
pub use catalog::{Accessory, Car, CarWithLocation, InsuranceOption, Location};
pub use error::{DomainError, DomainResult};
pub use repositories::RepositoryProvider;
pub use reservation::{NewReservation, Reservation, ReservationChanges, ReservationSummary};
pub use session::{SessionData, SessionId, SessionStore};
pub use user::{NewUser, SessionUser, User};
