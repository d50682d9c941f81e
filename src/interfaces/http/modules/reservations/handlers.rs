//! Reservation handlers
//!
//! Every route is scoped to the logged-in user; other users'
//! reservations answer 404 (or, for delete, nothing happens).

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::Redirect;
use axum::Json;
use tracing::warn;

use super::dto::{EditReservationPage, ReservationsPage, UpdateReservationForm};
use crate::application::{ReservationService, ReservationUpdate};
use crate::interfaces::http::common::{ApiResponse, FormFields};
use crate::interfaces::http::error::HttpResult;
use crate::interfaces::http::modules::booking::RESERVATIONS_PATH;
use crate::interfaces::http::session::CurrentSession;

#[derive(Clone)]
pub struct ReservationsState {
    pub service: Arc<ReservationService>,
}

#[utoipa::path(
    get,
    path = "/reservations",
    tag = "Reservations",
    responses(
        (status = 200, description = "Own reservations, newest first", body = ApiResponse<ReservationsPage>),
        (status = 303, description = "Not logged in")
    )
)]
pub async fn list_reservations(
    State(state): State<ReservationsState>,
    session: CurrentSession,
) -> HttpResult<Json<ApiResponse<ReservationsPage>>> {
    let summaries = state.service.list(session.user_id()).await?;

    Ok(Json(ApiResponse::success(ReservationsPage {
        reservations: summaries.into_iter().map(Into::into).collect(),
    })))
}

#[utoipa::path(
    get,
    path = "/reservations/{id}/edit",
    tag = "Reservations",
    params(("id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation with the choices it can be changed to", body = ApiResponse<EditReservationPage>),
        (status = 404, description = "Reservation not found", body = ApiResponse<String>)
    )
)]
pub async fn edit_reservation(
    State(state): State<ReservationsState>,
    session: CurrentSession,
    Path(id): Path<i32>,
) -> HttpResult<Json<ApiResponse<EditReservationPage>>> {
    let form = state.service.edit_form(id, session.user_id()).await?;
    Ok(Json(ApiResponse::success(EditReservationPage::from(form))))
}

#[utoipa::path(
    post,
    path = "/reservations/{id}/update",
    tag = "Reservations",
    params(("id" = i32, Path, description = "Reservation ID")),
    request_body(content = UpdateReservationForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Reservation re-priced and saved"),
        (status = 404, description = "Reservation, car or insurance not found", body = ApiResponse<String>),
        (status = 422, description = "Invalid form", body = ApiResponse<String>)
    )
)]
pub async fn update_reservation(
    State(state): State<ReservationsState>,
    session: CurrentSession,
    Path(id): Path<i32>,
    form: FormFields,
) -> HttpResult<Redirect> {
    let update = ReservationUpdate::try_from(&form)?;
    state.service.update(id, session.user_id(), update).await?;
    Ok(Redirect::to(RESERVATIONS_PATH))
}

#[utoipa::path(
    post,
    path = "/reservations/{id}/delete",
    tag = "Reservations",
    params(("id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 303, description = "Back to the list, whether or not anything was deleted")
    )
)]
pub async fn delete_reservation(
    State(state): State<ReservationsState>,
    session: CurrentSession,
    Path(id): Path<i32>,
) -> HttpResult<Redirect> {
    let user_id = session.user_id();
    if !state.service.delete(id, user_id).await? {
        warn!(reservation_id = id, user_id, "Delete ignored, reservation not owned or missing");
    }
    Ok(Redirect::to(RESERVATIONS_PATH))
}
