//! Reservation domain entity

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::domain::booking::rental_days;

/// Confirmed booking
#[derive(Debug, Clone, PartialEq)]
pub struct Reservation {
    pub id: i32,
    /// Owner; every reservation-scoped operation filters on it
    pub user_id: i32,
    pub car_id: i32,
    pub location_id: i32,
    pub insurance_id: Option<i32>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_price: Decimal,
    /// Linked accessories, ascending
    pub accessory_ids: Vec<i32>,
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    /// Billable days of this reservation
    pub fn days(&self) -> i64 {
        rental_days(self.start_date, self.end_date)
    }

    pub fn is_owned_by(&self, user_id: i32) -> bool {
        self.user_id == user_id
    }
}

/// Reservation joined with the car and branch it was booked for
#[derive(Debug, Clone, PartialEq)]
pub struct ReservationSummary {
    pub reservation: Reservation,
    pub car_model: String,
    pub car_daily_price: Decimal,
    pub city: String,
    pub branch_name: String,
}

/// Confirmed draft, ready to be persisted
#[derive(Debug, Clone, PartialEq)]
pub struct NewReservation {
    pub user_id: i32,
    pub car_id: i32,
    pub location_id: i32,
    pub insurance_id: Option<i32>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_price: Decimal,
    pub accessory_ids: Vec<i32>,
}

/// Edited fields of a reservation, already priced.
///
/// The accessory list replaces the stored one wholesale. The branch is
/// never changed by an edit.
#[derive(Debug, Clone, PartialEq)]
pub struct ReservationChanges {
    pub car_id: i32,
    pub insurance_id: Option<i32>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_price: Decimal,
    pub accessory_ids: Vec<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Reservation {
        Reservation {
            id: 1,
            user_id: 10,
            car_id: 2,
            location_id: 3,
            insurance_id: None,
            start_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 6, 5).unwrap(),
            total_price: Decimal::new(20000, 2),
            accessory_ids: vec![],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn days_follow_the_pricing_rule() {
        let mut r = sample();
        assert_eq!(r.days(), 4);
        r.end_date = r.start_date;
        assert_eq!(r.days(), 1);
    }

    #[test]
    fn ownership() {
        let r = sample();
        assert!(r.is_owned_by(10));
        assert!(!r.is_owned_by(11));
    }
}
