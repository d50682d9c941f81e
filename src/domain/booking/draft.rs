//! In-progress booking accumulated across the wizard steps

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::pricing::{price, PriceQuote};
use crate::domain::catalog::{Accessory, Car, InsuranceOption};
use crate::domain::reservation::NewReservation;
use crate::domain::{DomainError, DomainResult};

/// Car chosen in the car step, with the price at selection time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarSelection {
    pub car_id: i32,
    pub daily_price: Decimal,
}

/// Insurance chosen in the insurance step, with the price at selection time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsuranceSelection {
    pub insurance_id: i32,
    pub price_per_day: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedAccessory {
    pub id: i32,
    pub name: String,
    pub price: Decimal,
}

impl From<&Accessory> for SelectedAccessory {
    fn from(a: &Accessory) -> Self {
        Self {
            id: a.id,
            name: a.name.clone(),
            price: a.price_flat,
        }
    }
}

/// Unconfirmed booking held in one user's session.
///
/// Created by the location step; every later step only writes its own
/// fields. Prices are snapshots and are never re-fetched for the draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDraft {
    pub location_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub car: Option<CarSelection>,
    pub insurance: Option<InsuranceSelection>,
    pub accessories: Vec<SelectedAccessory>,
    /// Set when the summary is reviewed
    pub total_price: Option<Decimal>,
}

/// Reject ranges that end before they start.
pub fn ensure_date_order(start_date: NaiveDate, end_date: NaiveDate) -> DomainResult<()> {
    if end_date < start_date {
        return Err(DomainError::Validation(format!(
            "end date {} is before start date {}",
            end_date, start_date
        )));
    }
    Ok(())
}

impl BookingDraft {
    pub fn new(location_id: i32, start_date: NaiveDate, end_date: NaiveDate) -> DomainResult<Self> {
        ensure_date_order(start_date, end_date)?;
        Ok(Self {
            location_id,
            start_date,
            end_date,
            car: None,
            insurance: None,
            accessories: Vec::new(),
            total_price: None,
        })
    }

    pub fn select_car(&mut self, car: &Car) {
        self.car = Some(CarSelection {
            car_id: car.id,
            daily_price: car.daily_price,
        });
        self.total_price = None;
    }

    /// `None` means the user declined insurance.
    pub fn select_insurance(&mut self, option: Option<&InsuranceOption>) {
        self.insurance = option.map(|o| InsuranceSelection {
            insurance_id: o.id,
            price_per_day: o.price_per_day,
        });
        self.total_price = None;
    }

    pub fn select_accessories(&mut self, accessories: &[Accessory]) {
        self.accessories = accessories.iter().map(SelectedAccessory::from).collect();
        self.total_price = None;
    }

    pub fn accessory_ids(&self) -> Vec<i32> {
        self.accessories.iter().map(|a| a.id).collect()
    }

    /// Price the draft from its snapshots. `None` until a car is selected.
    pub fn quote(&self) -> Option<PriceQuote> {
        let car = self.car.as_ref()?;
        Some(price(
            car.daily_price,
            self.insurance.as_ref().map(|i| i.price_per_day),
            self.accessories.iter().map(|a| a.price),
            self.start_date,
            self.end_date,
        ))
    }

    /// Price the draft and remember the total for confirmation.
    pub fn review(&mut self) -> Option<PriceQuote> {
        let quote = self.quote()?;
        self.total_price = Some(quote.total_price);
        Some(quote)
    }

    /// Turn the draft into a reservation for `user_id`.
    ///
    /// The total is recomputed from the snapshots so a confirmation that
    /// skipped the review still stores the right amount.
    pub fn into_reservation(self, user_id: i32) -> DomainResult<NewReservation> {
        let (Some(car), Some(quote)) = (self.car.as_ref(), self.quote()) else {
            return Err(DomainError::Validation(
                "a car must be selected before confirming".into(),
            ));
        };
        let car_id = car.car_id;
        let accessory_ids = self.accessory_ids();

        Ok(NewReservation {
            user_id,
            car_id,
            location_id: self.location_id,
            insurance_id: self.insurance.map(|i| i.insurance_id),
            start_date: self.start_date,
            end_date: self.end_date,
            total_price: quote.total_price,
            accessory_ids,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn car(id: i32, cents: i64) -> Car {
        Car {
            id,
            location_id: 1,
            model: "Corolla".into(),
            daily_price: Decimal::new(cents, 2),
        }
    }

    fn accessory(id: i32, cents: i64) -> Accessory {
        Accessory {
            id,
            name: format!("Extra {}", id),
            price_flat: Decimal::new(cents, 2),
        }
    }

    fn draft() -> BookingDraft {
        BookingDraft::new(1, date("2024-01-01"), date("2024-01-04")).unwrap()
    }

    #[test]
    fn new_draft_rejects_end_before_start() {
        let err = BookingDraft::new(1, date("2024-01-04"), date("2024-01-01")).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn new_draft_accepts_same_day() {
        let d = BookingDraft::new(1, date("2024-01-04"), date("2024-01-04")).unwrap();
        assert!(d.car.is_none());
        assert!(d.accessories.is_empty());
    }

    #[test]
    fn no_quote_without_car() {
        assert!(draft().quote().is_none());
    }

    #[test]
    fn car_price_is_snapshotted() {
        let mut d = draft();
        let mut c = car(7, 5000);
        d.select_car(&c);
        c.daily_price = Decimal::new(9900, 2);

        assert_eq!(d.car.as_ref().unwrap().daily_price, Decimal::new(5000, 2));
        assert_eq!(d.quote().unwrap().car_total, Decimal::new(15000, 2));
    }

    #[test]
    fn review_stores_total() {
        let mut d = draft();
        d.select_car(&car(1, 5000));
        d.select_insurance(Some(&InsuranceOption {
            id: 2,
            name: "Full".into(),
            price_per_day: Decimal::new(1000, 2),
        }));
        d.select_accessories(&[accessory(1, 500), accessory(2, 700)]);

        let quote = d.review().unwrap();
        assert_eq!(quote.total_price, Decimal::new(19200, 2));
        assert_eq!(d.total_price, Some(Decimal::new(19200, 2)));
    }

    #[test]
    fn changing_a_selection_invalidates_total() {
        let mut d = draft();
        d.select_car(&car(1, 5000));
        d.review();
        d.select_accessories(&[accessory(3, 100)]);
        assert!(d.total_price.is_none());
    }

    #[test]
    fn empty_accessory_selection() {
        let mut d = draft();
        d.select_car(&car(1, 4000));
        d.select_accessories(&[]);
        assert!(d.accessories.is_empty());
        assert_eq!(d.quote().unwrap().accessories_total, Decimal::ZERO);
    }

    #[test]
    fn into_reservation_carries_selection() {
        let mut d = draft();
        d.select_car(&car(4, 5000));
        d.select_accessories(&[accessory(8, 500)]);

        let r = d.into_reservation(42).unwrap();
        assert_eq!(r.user_id, 42);
        assert_eq!(r.car_id, 4);
        assert_eq!(r.insurance_id, None);
        assert_eq!(r.accessory_ids, vec![8]);
        assert_eq!(r.total_price, Decimal::new(15500, 2));
    }

    #[test]
    fn into_reservation_requires_car() {
        assert!(draft().into_reservation(1).is_err());
    }
}
