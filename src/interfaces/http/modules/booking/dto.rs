//! Booking wizard forms and page view models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::PaymentReview;
use crate::domain::{BookingDraft, DomainError, DomainResult};
use crate::interfaces::http::dto::{
    AccessoryDto, CarDto, DraftDto, InsuranceOptionDto, LocationDto, PriceQuoteDto, UserDto,
};

/// Step 1 submission
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LocationForm {
    #[validate(range(min = 1, message = "location_id must be positive"))]
    pub location_id: i32,
    /// YYYY-MM-DD
    pub start_date: NaiveDate,
    /// YYYY-MM-DD, not before `start_date`
    pub end_date: NaiveDate,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CarForm {
    #[validate(range(min = 1, message = "car_id must be positive"))]
    pub car_id: i32,
}

/// Empty or missing `insurance_id` declines insurance.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct InsuranceForm {
    #[serde(default)]
    pub insurance_id: Option<String>,
}

impl InsuranceForm {
    pub fn selected_id(&self) -> DomainResult<Option<i32>> {
        match self.insurance_id.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw.parse().map(Some).map_err(|_| {
                DomainError::Validation(format!("insurance_id: invalid value \"{}\"", raw))
            }),
        }
    }
}

/// Step 4 submission, documented for the schema only; the handler reads
/// repeated `accessory_ids` keys directly.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AccessoriesForm {
    #[serde(default)]
    pub accessory_ids: Vec<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LocationsPage {
    pub user: UserDto,
    pub locations: Vec<LocationDto>,
    /// Draft currently held by the session, if any
    pub draft: Option<DraftDto>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CarsPage {
    pub draft: Option<DraftDto>,
    pub cars: Vec<CarDto>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InsurancePage {
    pub draft: Option<DraftDto>,
    pub insurance_options: Vec<InsuranceOptionDto>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AccessoriesPage {
    pub draft: Option<DraftDto>,
    pub accessories: Vec<AccessoryDto>,
    pub selected_accessory_ids: Vec<i32>,
}

/// Review shown before confirming
#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentPage {
    pub car: CarDto,
    pub city: String,
    pub branch_name: String,
    pub insurance: Option<InsuranceOptionDto>,
    pub accessories: Vec<AccessoryDto>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub quote: PriceQuoteDto,
}

impl From<PaymentReview> for PaymentPage {
    fn from(review: PaymentReview) -> Self {
        let PaymentReview {
            car,
            insurance,
            draft,
            quote,
        } = review;

        Self {
            city: car.location.city,
            branch_name: car.location.branch_name,
            car: car.car.into(),
            insurance: insurance.map(InsuranceOptionDto::from),
            accessories: draft.accessories.iter().map(AccessoryDto::from).collect(),
            start_date: draft.start_date,
            end_date: draft.end_date,
            quote: quote.into(),
        }
    }
}

pub fn draft_dto(draft: Option<&BookingDraft>) -> Option<DraftDto> {
    draft.map(DraftDto::from)
}
