//! Rental price calculation
//!
//! Pure functions over the values snapshotted into a draft (or re-fetched
//! when a reservation is edited). Amounts are fixed-point decimals so the
//! total is always the exact sum of its parts.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Shortest billable rental
pub const MIN_RENTAL_DAYS: i64 = 1;

/// Price breakdown for a rental
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub days: i64,
    pub car_total: Decimal,
    pub insurance_total: Decimal,
    pub accessories_total: Decimal,
    pub total_price: Decimal,
}

/// Number of billable days between two calendar dates.
///
/// Calendar dates always span whole days. Same-day rentals and reversed
/// ranges are billed as [`MIN_RENTAL_DAYS`].
pub fn rental_days(start_date: NaiveDate, end_date: NaiveDate) -> i64 {
    (end_date - start_date).num_days().max(MIN_RENTAL_DAYS)
}

/// Compute the price breakdown for a rental.
///
/// # Arguments
/// * `car_daily_price` - Car price per day
/// * `insurance_price_per_day` - Insurance price per day, `None` when no cover was chosen
/// * `accessory_prices` - Flat price of every chosen accessory
pub fn price<I>(
    car_daily_price: Decimal,
    insurance_price_per_day: Option<Decimal>,
    accessory_prices: I,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> PriceQuote
where
    I: IntoIterator<Item = Decimal>,
{
    let days = rental_days(start_date, end_date);
    let day_count = Decimal::from(days);

    let car_total = car_daily_price * day_count;
    let insurance_total = insurance_price_per_day.unwrap_or(Decimal::ZERO) * day_count;
    let accessories_total: Decimal = accessory_prices.into_iter().sum();

    PriceQuote {
        days,
        car_total,
        insurance_total,
        accessories_total,
        total_price: car_total + insurance_total + accessories_total,
    }
}
