//! SeaORM implementation of ReservationRepository
//!
//! Multi-row writes (the reservation plus its accessory links) run inside a
//! single transaction.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use super::db_err;
use crate::domain::reservation::ReservationRepository;
use crate::domain::{
    DomainError, DomainResult, NewReservation, Reservation, ReservationChanges,
    ReservationSummary,
};
use crate::infrastructure::database::entities::{car, location, reservation, reservation_accessory};
use crate::infrastructure::database::money::{from_cents, to_cents};

pub struct SeaOrmReservationRepository {
    db: DatabaseConnection,
}

impl SeaOrmReservationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: reservation::Model, accessory_ids: Vec<i32>) -> Reservation {
    Reservation {
        id: m.id,
        user_id: m.user_id,
        car_id: m.car_id,
        location_id: m.location_id,
        insurance_id: m.insurance_id,
        start_date: m.start_date,
        end_date: m.end_date,
        total_price: from_cents(m.total_price_cents),
        accessory_ids,
        created_at: m.created_at,
    }
}

/// Drop repeated ids, keeping the first occurrence.
fn unique_ids(ids: &[i32]) -> Vec<i32> {
    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(id) {
            out.push(*id);
        }
    }
    out
}

// ── Query helpers (usable inside and outside a transaction) ─────

async fn find_owned<C: ConnectionTrait>(
    conn: &C,
    id: i32,
    user_id: i32,
) -> Result<Option<reservation::Model>, DbErr> {
    reservation::Entity::find_by_id(id)
        .filter(reservation::Column::UserId.eq(user_id))
        .one(conn)
        .await
}

/// Accessory ids per reservation, ascending
async fn links_for<C: ConnectionTrait>(
    conn: &C,
    reservation_ids: Vec<i32>,
) -> Result<HashMap<i32, Vec<i32>>, DbErr> {
    let mut links: HashMap<i32, Vec<i32>> = HashMap::new();
    if reservation_ids.is_empty() {
        return Ok(links);
    }

    let rows = reservation_accessory::Entity::find()
        .filter(reservation_accessory::Column::ReservationId.is_in(reservation_ids))
        .order_by_asc(reservation_accessory::Column::AccessoryId)
        .all(conn)
        .await?;

    for row in rows {
        links.entry(row.reservation_id).or_default().push(row.accessory_id);
    }
    Ok(links)
}

async fn insert_links<C: ConnectionTrait>(
    conn: &C,
    reservation_id: i32,
    accessory_ids: &[i32],
) -> Result<(), DbErr> {
    if accessory_ids.is_empty() {
        return Ok(());
    }

    let rows = accessory_ids
        .iter()
        .map(|accessory_id| reservation_accessory::ActiveModel {
            reservation_id: Set(reservation_id),
            accessory_id: Set(*accessory_id),
        });
    reservation_accessory::Entity::insert_many(rows)
        .exec_without_returning(conn)
        .await?;
    Ok(())
}

async fn delete_links<C: ConnectionTrait>(conn: &C, reservation_id: i32) -> Result<(), DbErr> {
    reservation_accessory::Entity::delete_many()
        .filter(reservation_accessory::Column::ReservationId.eq(reservation_id))
        .exec(conn)
        .await?;
    Ok(())
}

// ── ReservationRepository impl ──────────────────────────────────

#[async_trait]
impl ReservationRepository for SeaOrmReservationRepository {
    async fn create(&self, r: NewReservation) -> DomainResult<i32> {
        debug!(
            "Creating reservation: user={} car={} accessories={:?}",
            r.user_id, r.car_id, r.accessory_ids
        );

        let total_price_cents = to_cents(r.total_price)?;
        let accessory_ids = unique_ids(&r.accessory_ids);

        let txn = self.db.begin().await.map_err(db_err)?;

        let saved = reservation::ActiveModel {
            user_id: Set(r.user_id),
            car_id: Set(r.car_id),
            location_id: Set(r.location_id),
            insurance_id: Set(r.insurance_id),
            start_date: Set(r.start_date),
            end_date: Set(r.end_date),
            total_price_cents: Set(total_price_cents),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(db_err)?;

        insert_links(&txn, saved.id, &accessory_ids)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok(saved.id)
    }

    async fn list_for_user(&self, user_id: i32) -> DomainResult<Vec<ReservationSummary>> {
        let models = reservation::Entity::find()
            .filter(reservation::Column::UserId.eq(user_id))
            .order_by_desc(reservation::Column::CreatedAt)
            .order_by_desc(reservation::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        if models.is_empty() {
            return Ok(Vec::new());
        }

        let car_ids: Vec<i32> = unique_ids(&models.iter().map(|m| m.car_id).collect::<Vec<_>>());
        let location_ids: Vec<i32> =
            unique_ids(&models.iter().map(|m| m.location_id).collect::<Vec<_>>());

        let cars: HashMap<i32, car::Model> = car::Entity::find()
            .filter(car::Column::Id.is_in(car_ids))
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let locations: HashMap<i32, location::Model> = location::Entity::find()
            .filter(location::Column::Id.is_in(location_ids))
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(|l| (l.id, l))
            .collect();

        let mut links = links_for(&self.db, models.iter().map(|m| m.id).collect())
            .await
            .map_err(db_err)?;

        models
            .into_iter()
            .map(|m| {
                let car = cars.get(&m.car_id).ok_or_else(|| {
                    DomainError::Internal(format!("reservation {} has no car {}", m.id, m.car_id))
                })?;
                let location = locations.get(&m.location_id).ok_or_else(|| {
                    DomainError::Internal(format!(
                        "reservation {} has no location {}",
                        m.id, m.location_id
                    ))
                })?;
                let accessory_ids = links.remove(&m.id).unwrap_or_default();

                Ok(ReservationSummary {
                    car_model: car.model.clone(),
                    car_daily_price: from_cents(car.daily_price_cents),
                    city: location.city.clone(),
                    branch_name: location.branch_name.clone(),
                    reservation: model_to_domain(m, accessory_ids),
                })
            })
            .collect()
    }

    async fn find_for_user(&self, id: i32, user_id: i32) -> DomainResult<Option<Reservation>> {
        let Some(model) = find_owned(&self.db, id, user_id).await.map_err(db_err)? else {
            return Ok(None);
        };

        let mut links = links_for(&self.db, vec![model.id]).await.map_err(db_err)?;
        let accessory_ids = links.remove(&model.id).unwrap_or_default();
        Ok(Some(model_to_domain(model, accessory_ids)))
    }

    async fn update(
        &self,
        id: i32,
        user_id: i32,
        changes: ReservationChanges,
    ) -> DomainResult<Option<Reservation>> {
        debug!("Updating reservation {} for user {}", id, user_id);

        let total_price_cents = to_cents(changes.total_price)?;
        let mut accessory_ids = unique_ids(&changes.accessory_ids);

        let txn = self.db.begin().await.map_err(db_err)?;

        let Some(existing) = find_owned(&txn, id, user_id).await.map_err(db_err)? else {
            txn.rollback().await.map_err(db_err)?;
            return Ok(None);
        };

        let mut active: reservation::ActiveModel = existing.into();
        active.car_id = Set(changes.car_id);
        active.insurance_id = Set(changes.insurance_id);
        active.start_date = Set(changes.start_date);
        active.end_date = Set(changes.end_date);
        active.total_price_cents = Set(total_price_cents);
        let updated = active.update(&txn).await.map_err(db_err)?;

        delete_links(&txn, id).await.map_err(db_err)?;
        insert_links(&txn, id, &accessory_ids).await.map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        accessory_ids.sort_unstable();
        Ok(Some(model_to_domain(updated, accessory_ids)))
    }

    async fn delete(&self, id: i32, user_id: i32) -> DomainResult<bool> {
        debug!("Deleting reservation {} for user {}", id, user_id);

        let txn = self.db.begin().await.map_err(db_err)?;

        if find_owned(&txn, id, user_id).await.map_err(db_err)?.is_none() {
            txn.rollback().await.map_err(db_err)?;
            return Ok(false);
        }

        delete_links(&txn, id).await.map_err(db_err)?;
        reservation::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok(true)
    }
}
