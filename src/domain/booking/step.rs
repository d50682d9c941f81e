//! Booking wizard state machine
//!
//! The wizard is linear. Each step may only be entered once the steps it
//! depends on have written their output into the draft.

use std::fmt;

use super::draft::BookingDraft;
use crate::domain::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BookingStep {
    /// Branch and rental dates
    Location,
    Car,
    /// Optional cover
    Insurance,
    /// Optional extras
    Accessories,
    /// Price review and confirmation
    Payment,
}

impl BookingStep {
    pub const ALL: [BookingStep; 5] = [
        Self::Location,
        Self::Car,
        Self::Insurance,
        Self::Accessories,
        Self::Payment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Location => "location",
            Self::Car => "car",
            Self::Insurance => "insurance",
            Self::Accessories => "accessories",
            Self::Payment => "payment",
        }
    }

    /// Route serving this step
    pub fn path(&self) -> &'static str {
        match self {
            Self::Location => "/locations",
            Self::Car => "/cars",
            Self::Insurance => "/insurance",
            Self::Accessories => "/accessories",
            Self::Payment => "/payment",
        }
    }

    /// Step whose output must be present before this one can be entered.
    ///
    /// Insurance and accessories are optional, so the later steps only
    /// depend on the car.
    pub fn prerequisite(&self) -> Option<BookingStep> {
        match self {
            Self::Location => None,
            Self::Car => Some(Self::Location),
            Self::Insurance | Self::Accessories | Self::Payment => Some(Self::Car),
        }
    }

    /// Whether the draft holds what the steps after this one need.
    ///
    /// Only `Location` and `Car` are ever prerequisites; the optional steps
    /// put nothing in the draft that a later step requires.
    fn is_completed_by(&self, draft: Option<&BookingDraft>) -> bool {
        match (self, draft) {
            (_, None) => false,
            (Self::Car, Some(draft)) => draft.car.is_some(),
            (_, Some(_)) => true,
        }
    }

    /// Check that every step this one depends on is complete.
    ///
    /// Fails with `PrerequisiteMissing` naming the earliest incomplete step.
    pub fn gate(&self, draft: Option<&BookingDraft>) -> DomainResult<()> {
        let mut missing = None;
        let mut required = self.prerequisite();
        while let Some(step) = required {
            if !step.is_completed_by(draft) {
                missing = Some(step);
            }
            required = step.prerequisite();
        }

        match missing {
            Some(step) => Err(DomainError::PrerequisiteMissing { step }),
            None => Ok(()),
        }
    }

    /// Gate the step and hand back the draft it operates on.
    ///
    /// Not meant for [`BookingStep::Location`], which starts a new draft.
    pub fn enter(&self, draft: Option<BookingDraft>) -> DomainResult<BookingDraft> {
        self.gate(draft.as_ref())?;
        draft.ok_or(DomainError::PrerequisiteMissing {
            step: BookingStep::Location,
        })
    }
}

impl fmt::Display for BookingStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use crate::domain::catalog::Car;

    fn location_only() -> BookingDraft {
        BookingDraft::new(
            1,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
        )
        .unwrap()
    }

    fn with_car() -> BookingDraft {
        let mut d = location_only();
        d.select_car(&Car {
            id: 3,
            location_id: 1,
            model: "Golf".into(),
            daily_price: Decimal::new(4500, 2),
        });
        d
    }

    fn missing_step(result: DomainResult<()>) -> Option<BookingStep> {
        match result {
            Err(DomainError::PrerequisiteMissing { step }) => Some(step),
            _ => None,
        }
    }

    #[test]
    fn location_is_always_open() {
        assert!(BookingStep::Location.gate(None).is_ok());
    }

    #[test]
    fn without_draft_every_later_step_goes_back_to_location() {
        for step in &BookingStep::ALL[1..] {
            assert_eq!(missing_step(step.gate(None)), Some(BookingStep::Location));
        }
    }

    #[test]
    fn payment_without_car_goes_back_to_cars() {
        let d = location_only();
        assert_eq!(
            missing_step(BookingStep::Payment.gate(Some(&d))),
            Some(BookingStep::Car)
        );
        assert_eq!(BookingStep::Car.path(), "/cars");
    }

    #[test]
    fn car_step_open_after_location() {
        assert!(BookingStep::Car.gate(Some(&location_only())).is_ok());
    }

    #[test]
    fn car_unlocks_remaining_steps() {
        let d = with_car();
        for step in [
            BookingStep::Insurance,
            BookingStep::Accessories,
            BookingStep::Payment,
        ] {
            assert!(step.gate(Some(&d)).is_ok(), "{} should be open", step);
        }
    }

    #[test]
    fn enter_returns_the_draft() {
        let d = BookingStep::Insurance.enter(Some(with_car())).unwrap();
        assert_eq!(d.car.unwrap().car_id, 3);
    }

    #[test]
    fn steps_are_ordered() {
        let mut sorted = BookingStep::ALL;
        sorted.sort();
        assert_eq!(sorted, BookingStep::ALL);
    }
}
