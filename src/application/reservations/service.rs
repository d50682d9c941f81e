//! Reservation service: list, edit and delete confirmed bookings
//!
//! Every operation is scoped to the requesting user. Someone else's
//! reservation is reported as not found.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use crate::domain::booking::{ensure_date_order, price};
use crate::domain::{
    Accessory, Car, DomainError, DomainResult, InsuranceOption, Location, RepositoryProvider,
    Reservation, ReservationChanges, ReservationSummary,
};

/// Reservation with the choices offered on the edit page
#[derive(Debug, Clone)]
pub struct EditForm {
    pub reservation: Reservation,
    pub location: Location,
    /// Cars stationed at the reservation's branch
    pub cars: Vec<Car>,
    pub insurance_options: Vec<InsuranceOption>,
    pub accessories: Vec<Accessory>,
    pub selected_accessory_ids: Vec<i32>,
}

/// Submitted edit. The branch cannot be changed.
#[derive(Debug, Clone, PartialEq)]
pub struct ReservationUpdate {
    pub car_id: i32,
    pub insurance_id: Option<i32>,
    pub accessory_ids: Vec<i32>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

pub struct ReservationService {
    repos: Arc<dyn RepositoryProvider>,
}

fn reservation_not_found(id: i32) -> DomainError {
    DomainError::not_found("Reservation", "id", id)
}

impl ReservationService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Newest first
    pub async fn list(&self, user_id: i32) -> DomainResult<Vec<ReservationSummary>> {
        self.repos.reservations().list_for_user(user_id).await
    }

    pub async fn edit_form(&self, id: i32, user_id: i32) -> DomainResult<EditForm> {
        let reservation = self
            .repos
            .reservations()
            .find_for_user(id, user_id)
            .await?
            .ok_or_else(|| reservation_not_found(id))?;

        let catalog = self.repos.catalog();
        let location = catalog
            .find_location(reservation.location_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Location", "id", reservation.location_id))?;

        Ok(EditForm {
            cars: catalog.list_cars_at(reservation.location_id).await?,
            insurance_options: catalog.list_insurance_options().await?,
            accessories: catalog.list_accessories().await?,
            selected_accessory_ids: reservation.accessory_ids.clone(),
            location,
            reservation,
        })
    }

    /// Apply an edit, re-pricing with the catalog's current prices.
    pub async fn update(
        &self,
        id: i32,
        user_id: i32,
        update: ReservationUpdate,
    ) -> DomainResult<Reservation> {
        if self
            .repos
            .reservations()
            .find_for_user(id, user_id)
            .await?
            .is_none()
        {
            return Err(reservation_not_found(id));
        }

        ensure_date_order(update.start_date, update.end_date)?;

        let catalog = self.repos.catalog();
        let car = catalog
            .find_car(update.car_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Car", "id", update.car_id))?;

        let insurance = match update.insurance_id {
            Some(insurance_id) => Some(
                catalog
                    .find_insurance_option(insurance_id)
                    .await?
                    .ok_or_else(|| DomainError::not_found("InsuranceOption", "id", insurance_id))?,
            ),
            None => None,
        };

        let accessories = catalog.find_accessories(&update.accessory_ids).await?;

        let quote = price(
            car.daily_price,
            insurance.as_ref().map(|i| i.price_per_day),
            accessories.iter().map(|a| a.price_flat),
            update.start_date,
            update.end_date,
        );

        let changes = ReservationChanges {
            car_id: car.id,
            insurance_id: insurance.map(|i| i.id),
            start_date: update.start_date,
            end_date: update.end_date,
            total_price: quote.total_price,
            accessory_ids: accessories.iter().map(|a| a.id).collect(),
        };

        let updated = self
            .repos
            .reservations()
            .update(id, user_id, changes)
            .await?
            .ok_or_else(|| reservation_not_found(id))?;

        info!(
            reservation_id = id,
            user_id,
            total = %updated.total_price,
            "Reservation updated"
        );
        Ok(updated)
    }

    /// Returns whether anything was deleted. Deleting a reservation the
    /// user does not own is a silent no-op.
    pub async fn delete(&self, id: i32, user_id: i32) -> DomainResult<bool> {
        let deleted = self.repos.reservations().delete(id, user_id).await?;
        if deleted {
            info!(reservation_id = id, user_id, "Reservation deleted");
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use sea_orm::DatabaseConnection;

    use crate::domain::{NewReservation, NewUser};
    use crate::infrastructure::database::seed::fixtures;
    use crate::infrastructure::database::test_database;
    use crate::infrastructure::SeaOrmRepositoryProvider;

    struct Setup {
        db: DatabaseConnection,
        svc: ReservationService,
        repos: Arc<dyn RepositoryProvider>,
        owner: i32,
        stranger: i32,
        location: i32,
        car: i32,
        other_car: i32,
        insurance: i32,
        gps: i32,
        seat: i32,
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    async fn setup() -> Setup {
        let db = test_database().await;
        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(db.clone()));

        let mut ids = Vec::new();
        for email in ["owner@example.com", "stranger@example.com"] {
            let user = repos
                .users()
                .create(NewUser {
                    name: email.into(),
                    email: email.into(),
                    password_hash: "hash".into(),
                })
                .await
                .unwrap();
            ids.push(user.id);
        }

        let location = fixtures::location(&db, "Berlin", "Mitte").await;
        let elsewhere = fixtures::location(&db, "Munich", "Airport").await;
        Setup {
            car: fixtures::car(&db, location, "Golf", Decimal::new(5000, 2)).await,
            other_car: fixtures::car(&db, elsewhere, "A4", Decimal::new(7000, 2)).await,
            insurance: fixtures::insurance(&db, "Full", Decimal::new(1000, 2)).await,
            gps: fixtures::accessory(&db, "GPS", Decimal::new(500, 2)).await,
            seat: fixtures::accessory(&db, "Child seat", Decimal::new(700, 2)).await,
            svc: ReservationService::new(repos.clone()),
            owner: ids[0],
            stranger: ids[1],
            location,
            repos,
            db,
        }
    }

    async fn book(s: &Setup) -> i32 {
        s.repos
            .reservations()
            .create(NewReservation {
                user_id: s.owner,
                car_id: s.car,
                location_id: s.location,
                insurance_id: None,
                start_date: date("2024-01-01"),
                end_date: date("2024-01-04"),
                total_price: Decimal::new(15500, 2),
                accessory_ids: vec![s.gps],
            })
            .await
            .unwrap()
    }

    fn edit(s: &Setup) -> ReservationUpdate {
        ReservationUpdate {
            car_id: s.car,
            insurance_id: Some(s.insurance),
            accessory_ids: vec![s.seat, 12345],
            start_date: date("2024-03-01"),
            end_date: date("2024-03-03"),
        }
    }

    #[tokio::test]
    async fn edit_form_lists_cars_at_the_branch() {
        let s = setup().await;
        let id = book(&s).await;

        let form = s.svc.edit_form(id, s.owner).await.unwrap();
        assert_eq!(form.location.city, "Berlin");
        assert_eq!(form.cars.iter().map(|c| c.id).collect::<Vec<_>>(), vec![s.car]);
        assert_eq!(form.insurance_options.len(), 1);
        assert_eq!(form.accessories.len(), 2);
        assert_eq!(form.selected_accessory_ids, vec![s.gps]);
        assert!(form.cars.iter().all(|c| c.id != s.other_car));
    }

    #[tokio::test]
    async fn update_reprices_with_current_catalog() {
        let s = setup().await;
        let id = book(&s).await;

        fixtures::reprice_car(&s.db, s.car, Decimal::new(6000, 2)).await;

        let updated = s.svc.update(id, s.owner, edit(&s)).await.unwrap();
        // 2 days x (60.00 + 10.00) + 7.00
        assert_eq!(updated.total_price, Decimal::new(14700, 2));
        assert_eq!(updated.accessory_ids, vec![s.seat]);
        assert_eq!(updated.insurance_id, Some(s.insurance));
        assert_eq!(updated.location_id, s.location);
    }

    #[tokio::test]
    async fn update_rejects_reversed_dates_and_unknown_car() {
        let s = setup().await;
        let id = book(&s).await;

        let mut reversed = edit(&s);
        reversed.end_date = date("2024-02-01");
        let err = s.svc.update(id, s.owner, reversed).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let mut unknown = edit(&s);
        unknown.car_id = 999;
        let err = s.svc.update(id, s.owner, unknown).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Car", .. }));

        let untouched = s.svc.edit_form(id, s.owner).await.unwrap().reservation;
        assert_eq!(untouched.total_price, Decimal::new(15500, 2));
    }

    #[tokio::test]
    async fn strangers_cannot_see_edit_or_delete() {
        let s = setup().await;
        let id = book(&s).await;

        assert!(matches!(
            s.svc.edit_form(id, s.stranger).await,
            Err(DomainError::NotFound { entity: "Reservation", .. })
        ));
        assert!(matches!(
            s.svc.update(id, s.stranger, edit(&s)).await,
            Err(DomainError::NotFound { entity: "Reservation", .. })
        ));
        assert!(!s.svc.delete(id, s.stranger).await.unwrap());
        assert!(s.svc.list(s.stranger).await.unwrap().is_empty());
        assert_eq!(s.svc.list(s.owner).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_removes_from_list() {
        let s = setup().await;
        let id = book(&s).await;

        assert!(s.svc.delete(id, s.owner).await.unwrap());
        assert!(s.svc.list(s.owner).await.unwrap().is_empty());
        assert!(!s.svc.delete(id, s.owner).await.unwrap());
    }
}
