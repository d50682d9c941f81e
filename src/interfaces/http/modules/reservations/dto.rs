//! Reservation view models and the edit form

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::{EditForm, ReservationUpdate};
use crate::domain::{DomainResult, Reservation, ReservationSummary};
use crate::interfaces::http::common::FormFields;
use crate::interfaces::http::dto::{AccessoryDto, CarDto, InsuranceOptionDto, LocationDto};

#[derive(Debug, Serialize, ToSchema)]
pub struct ReservationDto {
    pub id: i32,
    pub car_id: i32,
    pub location_id: i32,
    pub insurance_id: Option<i32>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: i64,
    pub total_price: Decimal,
    pub accessory_ids: Vec<i32>,
    pub created_at: DateTime<Utc>,
}

impl From<Reservation> for ReservationDto {
    fn from(r: Reservation) -> Self {
        Self {
            days: r.days(),
            id: r.id,
            car_id: r.car_id,
            location_id: r.location_id,
            insurance_id: r.insurance_id,
            start_date: r.start_date,
            end_date: r.end_date,
            total_price: r.total_price,
            accessory_ids: r.accessory_ids,
            created_at: r.created_at,
        }
    }
}

/// Row of the reservation list
#[derive(Debug, Serialize, ToSchema)]
pub struct ReservationListItem {
    #[serde(flatten)]
    pub reservation: ReservationDto,
    pub car_model: String,
    pub car_daily_price: Decimal,
    pub city: String,
    pub branch_name: String,
}

impl From<ReservationSummary> for ReservationListItem {
    fn from(s: ReservationSummary) -> Self {
        Self {
            reservation: s.reservation.into(),
            car_model: s.car_model,
            car_daily_price: s.car_daily_price,
            city: s.city,
            branch_name: s.branch_name,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReservationsPage {
    /// Newest first
    pub reservations: Vec<ReservationListItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EditReservationPage {
    pub reservation: ReservationDto,
    pub location: LocationDto,
    /// Cars at the reservation's branch
    pub cars: Vec<CarDto>,
    pub insurance_options: Vec<InsuranceOptionDto>,
    pub accessories: Vec<AccessoryDto>,
    pub selected_accessory_ids: Vec<i32>,
}

impl From<EditForm> for EditReservationPage {
    fn from(form: EditForm) -> Self {
        Self {
            reservation: form.reservation.into(),
            location: form.location.into(),
            cars: form.cars.into_iter().map(Into::into).collect(),
            insurance_options: form.insurance_options.into_iter().map(Into::into).collect(),
            accessories: form.accessories.into_iter().map(Into::into).collect(),
            selected_accessory_ids: form.selected_accessory_ids,
        }
    }
}

/// Edit submission. Accessories arrive as repeated `accessory_ids` keys.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateReservationForm {
    pub car_id: i32,
    /// Empty declines insurance
    pub insurance_id: Option<i32>,
    #[serde(default)]
    pub accessory_ids: Vec<i32>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl TryFrom<&FormFields> for ReservationUpdate {
    type Error = crate::domain::DomainError;

    fn try_from(fields: &FormFields) -> DomainResult<Self> {
        Ok(Self {
            car_id: fields.required("car_id")?,
            insurance_id: fields.optional("insurance_id")?,
            accessory_ids: fields.ids("accessory_ids"),
            start_date: fields.required("start_date")?,
            end_date: fields.required("end_date")?,
        })
    }
}
