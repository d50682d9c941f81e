//! View models shared by several pages
//!
//! Handlers answer with JSON view models; amounts serialize as decimal
//! strings so no precision is lost.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::booking::SelectedAccessory;
use crate::domain::{
    Accessory, BookingDraft, Car, InsuranceOption, Location, PriceQuote, SessionUser,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct LocationDto {
    pub id: i32,
    pub city: String,
    pub branch_name: String,
}

impl From<Location> for LocationDto {
    fn from(l: Location) -> Self {
        Self {
            id: l.id,
            city: l.city,
            branch_name: l.branch_name,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CarDto {
    pub id: i32,
    pub location_id: i32,
    pub model: String,
    pub daily_price: Decimal,
}

impl From<Car> for CarDto {
    fn from(c: Car) -> Self {
        Self {
            id: c.id,
            location_id: c.location_id,
            model: c.model,
            daily_price: c.daily_price,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InsuranceOptionDto {
    pub id: i32,
    pub name: String,
    pub price_per_day: Decimal,
}

impl From<InsuranceOption> for InsuranceOptionDto {
    fn from(o: InsuranceOption) -> Self {
        Self {
            id: o.id,
            name: o.name,
            price_per_day: o.price_per_day,
        }
    }
}

/// Accessory with its flat price
#[derive(Debug, Serialize, ToSchema)]
pub struct AccessoryDto {
    pub id: i32,
    pub name: String,
    pub price: Decimal,
}

impl From<Accessory> for AccessoryDto {
    fn from(a: Accessory) -> Self {
        Self {
            id: a.id,
            name: a.name,
            price: a.price_flat,
        }
    }
}

impl From<&SelectedAccessory> for AccessoryDto {
    fn from(a: &SelectedAccessory) -> Self {
        Self {
            id: a.id,
            name: a.name.clone(),
            price: a.price,
        }
    }
}

/// Booking in progress, as shown next to each wizard step
#[derive(Debug, Serialize, ToSchema)]
pub struct DraftDto {
    pub location_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub car_id: Option<i32>,
    pub car_daily_price: Option<Decimal>,
    pub insurance_id: Option<i32>,
    pub insurance_price_per_day: Option<Decimal>,
    pub accessories: Vec<AccessoryDto>,
    pub total_price: Option<Decimal>,
}

impl From<&BookingDraft> for DraftDto {
    fn from(d: &BookingDraft) -> Self {
        Self {
            location_id: d.location_id,
            start_date: d.start_date,
            end_date: d.end_date,
            car_id: d.car.as_ref().map(|c| c.car_id),
            car_daily_price: d.car.as_ref().map(|c| c.daily_price),
            insurance_id: d.insurance.as_ref().map(|i| i.insurance_id),
            insurance_price_per_day: d.insurance.as_ref().map(|i| i.price_per_day),
            accessories: d.accessories.iter().map(AccessoryDto::from).collect(),
            total_price: d.total_price,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PriceQuoteDto {
    pub days: i64,
    pub car_total: Decimal,
    pub insurance_total: Decimal,
    pub accessories_total: Decimal,
    pub total_price: Decimal,
}

impl From<PriceQuote> for PriceQuoteDto {
    fn from(q: PriceQuote) -> Self {
        Self {
            days: q.days,
            car_total: q.car_total,
            insurance_total: q.insurance_total,
            accessories_total: q.accessories_total,
            total_price: q.total_price,
        }
    }
}

/// Logged-in user
#[derive(Debug, Serialize, ToSchema)]
pub struct UserDto {
    pub id: i32,
    pub name: String,
    pub email: String,
}

impl From<&SessionUser> for UserDto {
    fn from(u: &SessionUser) -> Self {
        Self {
            id: u.id,
            name: u.name.clone(),
            email: u.email.clone(),
        }
    }
}
