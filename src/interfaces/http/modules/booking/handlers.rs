//! Booking wizard handlers
//!
//! GET handlers return the page view model; POST handlers store the
//! updated draft in the session and redirect to the next step. A step
//! reached out of order redirects back to the earliest missing one.

use std::sync::Arc;

use axum::extract::State;
use axum::response::Redirect;
use axum::Json;

use super::dto::{
    draft_dto, AccessoriesForm, AccessoriesPage, CarForm, CarsPage, InsuranceForm, InsurancePage,
    LocationForm, LocationsPage, PaymentPage,
};
use crate::application::BookingService;
use crate::domain::BookingStep;
use crate::interfaces::http::common::{
    ApiResponse, FormFields, ValidatedForm, ValidatedFormRejection,
};
use crate::interfaces::http::dto::UserDto;
use crate::interfaces::http::error::HttpResult;
use crate::interfaces::http::session::CurrentSession;

pub const RESERVATIONS_PATH: &str = "/reservations";

#[derive(Clone)]
pub struct BookingState {
    pub service: Arc<BookingService>,
}

// ── Step 1 ──────────────────────────────────────────────────────

#[utoipa::path(
    get,
    path = "/locations",
    tag = "Booking",
    responses(
        (status = 200, description = "Branches to pick from", body = ApiResponse<LocationsPage>),
        (status = 303, description = "Not logged in")
    )
)]
pub async fn locations_page(
    State(booking): State<BookingState>,
    session: CurrentSession,
) -> HttpResult<Json<ApiResponse<LocationsPage>>> {
    let locations = booking.service.locations().await?;

    Ok(Json(ApiResponse::success(LocationsPage {
        user: UserDto::from(&session.data.user),
        locations: locations.into_iter().map(Into::into).collect(),
        draft: draft_dto(session.data.draft.as_ref()),
    })))
}

#[utoipa::path(
    post,
    path = "/locations",
    tag = "Booking",
    request_body(content = LocationForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Draft started, on to the car step"),
        (status = 404, description = "Unknown location", body = ApiResponse<String>),
        (status = 422, description = "Invalid dates", body = ApiResponse<String>)
    )
)]
pub async fn select_location(
    State(booking): State<BookingState>,
    mut session: CurrentSession,
    ValidatedForm(form): ValidatedForm<LocationForm>,
) -> HttpResult<Redirect> {
    let draft = booking
        .service
        .start(form.location_id, form.start_date, form.end_date)
        .await?;
    session.save_draft(Some(draft)).await?;
    Ok(Redirect::to(BookingStep::Car.path()))
}

// ── Step 2 ──────────────────────────────────────────────────────

#[utoipa::path(
    get,
    path = "/cars",
    tag = "Booking",
    responses(
        (status = 200, description = "Cars to pick from", body = ApiResponse<CarsPage>),
        (status = 303, description = "No draft yet")
    )
)]
pub async fn cars_page(
    State(booking): State<BookingState>,
    session: CurrentSession,
) -> HttpResult<Json<ApiResponse<CarsPage>>> {
    let draft = session.data.draft.as_ref();
    let cars = booking.service.cars(draft).await?;

    Ok(Json(ApiResponse::success(CarsPage {
        draft: draft_dto(draft),
        cars: cars.into_iter().map(Into::into).collect(),
    })))
}

#[utoipa::path(
    post,
    path = "/cars",
    tag = "Booking",
    request_body(content = CarForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Car stored, on to insurance; or no draft yet, back to locations"),
        (status = 404, description = "Unknown car", body = ApiResponse<String>),
        (status = 422, description = "Malformed car id", body = ApiResponse<String>)
    )
)]
pub async fn select_car(
    State(booking): State<BookingState>,
    mut session: CurrentSession,
    form: Result<ValidatedForm<CarForm>, ValidatedFormRejection>,
) -> HttpResult<Redirect> {
    // Gate first so an out-of-order post redirects even with a bad form
    BookingStep::Car.gate(session.data.draft.as_ref())?;
    let ValidatedForm(form) = form?;
    let draft = booking.service.select_car(session.draft(), form.car_id).await?;
    session.save_draft(Some(draft)).await?;
    Ok(Redirect::to(BookingStep::Insurance.path()))
}

// ── Step 3 ──────────────────────────────────────────────────────

#[utoipa::path(
    get,
    path = "/insurance",
    tag = "Booking",
    responses(
        (status = 200, description = "Insurance options", body = ApiResponse<InsurancePage>),
        (status = 303, description = "No car selected yet")
    )
)]
pub async fn insurance_page(
    State(booking): State<BookingState>,
    session: CurrentSession,
) -> HttpResult<Json<ApiResponse<InsurancePage>>> {
    let draft = session.data.draft.as_ref();
    let options = booking.service.insurance_options(draft).await?;

    Ok(Json(ApiResponse::success(InsurancePage {
        draft: draft_dto(draft),
        insurance_options: options.into_iter().map(Into::into).collect(),
    })))
}

#[utoipa::path(
    post,
    path = "/insurance",
    tag = "Booking",
    request_body(content = InsuranceForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Choice stored, on to accessories"),
        (status = 404, description = "Unknown insurance option", body = ApiResponse<String>)
    )
)]
pub async fn select_insurance(
    State(booking): State<BookingState>,
    mut session: CurrentSession,
    form: Result<ValidatedForm<InsuranceForm>, ValidatedFormRejection>,
) -> HttpResult<Redirect> {
    BookingStep::Insurance.gate(session.data.draft.as_ref())?;
    let ValidatedForm(form) = form?;
    let insurance_id = form.selected_id()?;
    let draft = booking
        .service
        .select_insurance(session.draft(), insurance_id)
        .await?;
    session.save_draft(Some(draft)).await?;
    Ok(Redirect::to(BookingStep::Accessories.path()))
}

// ── Step 4 ──────────────────────────────────────────────────────

#[utoipa::path(
    get,
    path = "/accessories",
    tag = "Booking",
    responses(
        (status = 200, description = "Accessories", body = ApiResponse<AccessoriesPage>),
        (status = 303, description = "No car selected yet")
    )
)]
pub async fn accessories_page(
    State(booking): State<BookingState>,
    session: CurrentSession,
) -> HttpResult<Json<ApiResponse<AccessoriesPage>>> {
    let draft = session.data.draft.as_ref();
    let accessories = booking.service.accessories(draft).await?;

    Ok(Json(ApiResponse::success(AccessoriesPage {
        draft: draft_dto(draft),
        accessories: accessories.into_iter().map(Into::into).collect(),
        selected_accessory_ids: draft.map(|d| d.accessory_ids()).unwrap_or_default(),
    })))
}

#[utoipa::path(
    post,
    path = "/accessories",
    tag = "Booking",
    request_body(content = AccessoriesForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Selection stored, on to payment")
    )
)]
pub async fn select_accessories(
    State(booking): State<BookingState>,
    mut session: CurrentSession,
    form: FormFields,
) -> HttpResult<Redirect> {
    let ids = form.ids("accessory_ids");
    let draft = booking
        .service
        .select_accessories(session.draft(), &ids)
        .await?;
    session.save_draft(Some(draft)).await?;
    Ok(Redirect::to(BookingStep::Payment.path()))
}

// ── Step 5 ──────────────────────────────────────────────────────

#[utoipa::path(
    get,
    path = "/payment",
    tag = "Booking",
    responses(
        (status = 200, description = "Price review", body = ApiResponse<PaymentPage>),
        (status = 303, description = "No car selected yet")
    )
)]
pub async fn payment_page(
    State(booking): State<BookingState>,
    mut session: CurrentSession,
) -> HttpResult<Json<ApiResponse<PaymentPage>>> {
    let review = booking.service.review(session.draft()).await?;
    session.save_draft(Some(review.draft.clone())).await?;
    Ok(Json(ApiResponse::success(PaymentPage::from(review))))
}

#[utoipa::path(
    post,
    path = "/payment",
    tag = "Booking",
    responses(
        (status = 303, description = "Reservation stored, on to the reservation list")
    )
)]
pub async fn confirm_payment(
    State(booking): State<BookingState>,
    mut session: CurrentSession,
) -> HttpResult<Redirect> {
    let user = session.data.user.clone();
    booking.service.confirm(&user, session.draft()).await?;
    session.save_draft(None).await?;
    Ok(Redirect::to(RESERVATIONS_PATH))
}
