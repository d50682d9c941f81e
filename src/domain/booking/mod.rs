//! Booking wizard domain
//!
//! - `draft`: the per-session booking being assembled
//! - `step`: the wizard state machine and its gates
//! - `pricing`: the rental price calculator

pub mod draft;
pub mod pricing;
pub mod step;

pub use draft::{
    ensure_date_order, BookingDraft, CarSelection, InsuranceSelection, SelectedAccessory,
};
pub use pricing::{price, rental_days, PriceQuote, MIN_RENTAL_DAYS};
pub use step::BookingStep;
