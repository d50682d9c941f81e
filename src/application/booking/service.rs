//! Booking wizard service
//!
//! Every step takes the session's current draft, checks the step gate and
//! returns the updated draft. Lookups that fail leave the caller's draft
//! untouched because the draft is only replaced on success.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use crate::domain::{
    Accessory, BookingDraft, BookingStep, Car, CarWithLocation, DomainError, DomainResult,
    InsuranceOption, Location, PriceQuote, RepositoryProvider, SessionUser,
};

/// Everything the payment page shows.
///
/// Prices are the draft's snapshots; names and branch details are read
/// from the catalog.
#[derive(Debug, Clone)]
pub struct PaymentReview {
    pub car: CarWithLocation,
    pub insurance: Option<InsuranceOption>,
    pub draft: BookingDraft,
    pub quote: PriceQuote,
}

pub struct BookingService {
    repos: Arc<dyn RepositoryProvider>,
}

impl BookingService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    // ── Step 1: location and dates ──────────────────────────────

    pub async fn locations(&self) -> DomainResult<Vec<Location>> {
        self.repos.catalog().list_locations().await
    }

    /// Start a new draft, replacing whatever the session held before.
    pub async fn start(
        &self,
        location_id: i32,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> DomainResult<BookingDraft> {
        if self.repos.catalog().find_location(location_id).await?.is_none() {
            return Err(DomainError::not_found("Location", "id", location_id));
        }
        BookingDraft::new(location_id, start_date, end_date)
    }

    // ── Step 2: car ─────────────────────────────────────────────

    /// The whole fleet is offered, whichever branch was picked.
    pub async fn cars(&self, draft: Option<&BookingDraft>) -> DomainResult<Vec<Car>> {
        BookingStep::Car.gate(draft)?;
        self.repos.catalog().list_cars().await
    }

    pub async fn select_car(
        &self,
        draft: Option<BookingDraft>,
        car_id: i32,
    ) -> DomainResult<BookingDraft> {
        let mut draft = BookingStep::Car.enter(draft)?;
        let car = self
            .repos
            .catalog()
            .find_car(car_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Car", "id", car_id))?;

        draft.select_car(&car);
        Ok(draft)
    }

    // ── Step 3: insurance ───────────────────────────────────────

    pub async fn insurance_options(
        &self,
        draft: Option<&BookingDraft>,
    ) -> DomainResult<Vec<InsuranceOption>> {
        BookingStep::Insurance.gate(draft)?;
        self.repos.catalog().list_insurance_options().await
    }

    /// `None` declines insurance.
    pub async fn select_insurance(
        &self,
        draft: Option<BookingDraft>,
        insurance_id: Option<i32>,
    ) -> DomainResult<BookingDraft> {
        let mut draft = BookingStep::Insurance.enter(draft)?;

        let option = match insurance_id {
            Some(id) => Some(
                self.repos
                    .catalog()
                    .find_insurance_option(id)
                    .await?
                    .ok_or_else(|| DomainError::not_found("InsuranceOption", "id", id))?,
            ),
            None => None,
        };

        draft.select_insurance(option.as_ref());
        Ok(draft)
    }

    // ── Step 4: accessories ─────────────────────────────────────

    pub async fn accessories(&self, draft: Option<&BookingDraft>) -> DomainResult<Vec<Accessory>> {
        BookingStep::Accessories.gate(draft)?;
        self.repos.catalog().list_accessories().await
    }

    /// Unknown ids are dropped without error.
    pub async fn select_accessories(
        &self,
        draft: Option<BookingDraft>,
        accessory_ids: &[i32],
    ) -> DomainResult<BookingDraft> {
        let mut draft = BookingStep::Accessories.enter(draft)?;
        let found = self.repos.catalog().find_accessories(accessory_ids).await?;
        draft.select_accessories(&found);
        Ok(draft)
    }

    // ── Step 5: payment ─────────────────────────────────────────

    /// Price the draft for review. The returned draft carries the total.
    pub async fn review(&self, draft: Option<BookingDraft>) -> DomainResult<PaymentReview> {
        let mut draft = BookingStep::Payment.enter(draft)?;
        let quote = draft
            .review()
            .ok_or(DomainError::PrerequisiteMissing { step: BookingStep::Car })?;

        let Some(selection) = draft.car.clone() else {
            return Err(DomainError::PrerequisiteMissing { step: BookingStep::Car });
        };
        let mut car = self
            .repos
            .catalog()
            .find_car_with_location(selection.car_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Car", "id", selection.car_id))?;
        car.car.daily_price = selection.daily_price;

        let insurance = match &draft.insurance {
            Some(chosen) => self
                .repos
                .catalog()
                .find_insurance_option(chosen.insurance_id)
                .await?
                .map(|option| InsuranceOption {
                    price_per_day: chosen.price_per_day,
                    ..option
                }),
            None => None,
        };

        Ok(PaymentReview {
            car,
            insurance,
            draft,
            quote,
        })
    }

    /// Persist the draft as a reservation for `user`.
    ///
    /// The caller clears the draft from the session on success.
    pub async fn confirm(
        &self,
        user: &SessionUser,
        draft: Option<BookingDraft>,
    ) -> DomainResult<i32> {
        let draft = BookingStep::Payment.enter(draft)?;
        let reservation = draft.into_reservation(user.id)?;
        let total = reservation.total_price;

        let id = self.repos.reservations().create(reservation).await?;

        metrics::counter!("reservations_confirmed_total").increment(1);
        info!(reservation_id = id, user_id = user.id, %total, "Reservation confirmed");
        Ok(id)
    }
}
