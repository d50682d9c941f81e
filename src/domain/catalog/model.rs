//! Reference data: branches, fleet, insurance and accessories
//!
//! Prices are fixed-point decimals in the rental currency.

use rust_decimal::Decimal;

/// Rental branch
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub id: i32,
    pub city: String,
    pub branch_name: String,
}

/// Car available for rent at a branch
#[derive(Debug, Clone, PartialEq)]
pub struct Car {
    pub id: i32,
    pub location_id: i32,
    pub model: String,
    pub daily_price: Decimal,
}

/// Car joined with its branch, for summaries
#[derive(Debug, Clone, PartialEq)]
pub struct CarWithLocation {
    pub car: Car,
    pub location: Location,
}

/// Insurance cover charged per rental day
#[derive(Debug, Clone, PartialEq)]
pub struct InsuranceOption {
    pub id: i32,
    pub name: String,
    pub price_per_day: Decimal,
}

/// Optional extra charged once per rental
#[derive(Debug, Clone, PartialEq)]
pub struct Accessory {
    pub id: i32,
    pub name: String,
    pub price_flat: Decimal,
}
