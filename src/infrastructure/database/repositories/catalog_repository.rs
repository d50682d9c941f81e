//! SeaORM implementation of CatalogRepository

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use super::db_err;
use crate::domain::catalog::CatalogRepository;
use crate::domain::{Accessory, Car, CarWithLocation, DomainResult, InsuranceOption, Location};
use crate::infrastructure::database::entities::{accessory, car, insurance_option, location};
use crate::infrastructure::database::money::from_cents;

pub struct SeaOrmCatalogRepository {
    db: DatabaseConnection,
}

impl SeaOrmCatalogRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn location_to_domain(m: location::Model) -> Location {
    Location {
        id: m.id,
        city: m.city,
        branch_name: m.branch_name,
    }
}

fn car_to_domain(m: car::Model) -> Car {
    Car {
        id: m.id,
        location_id: m.location_id,
        model: m.model,
        daily_price: from_cents(m.daily_price_cents),
    }
}

fn insurance_to_domain(m: insurance_option::Model) -> InsuranceOption {
    InsuranceOption {
        id: m.id,
        name: m.name,
        price_per_day: from_cents(m.price_per_day_cents),
    }
}

fn accessory_to_domain(m: accessory::Model) -> Accessory {
    Accessory {
        id: m.id,
        name: m.name,
        price_flat: from_cents(m.price_flat_cents),
    }
}

// ── CatalogRepository impl ──────────────────────────────────────

#[async_trait]
impl CatalogRepository for SeaOrmCatalogRepository {
    async fn list_locations(&self) -> DomainResult<Vec<Location>> {
        let models = location::Entity::find()
            .order_by_asc(location::Column::City)
            .order_by_asc(location::Column::BranchName)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(location_to_domain).collect())
    }

    async fn find_location(&self, id: i32) -> DomainResult<Option<Location>> {
        let model = location::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(location_to_domain))
    }

    async fn list_cars(&self) -> DomainResult<Vec<Car>> {
        let models = car::Entity::find()
            .order_by_asc(car::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(car_to_domain).collect())
    }

    async fn list_cars_at(&self, location_id: i32) -> DomainResult<Vec<Car>> {
        let models = car::Entity::find()
            .filter(car::Column::LocationId.eq(location_id))
            .order_by_asc(car::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(car_to_domain).collect())
    }

    async fn find_car(&self, id: i32) -> DomainResult<Option<Car>> {
        let model = car::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(car_to_domain))
    }

    async fn find_car_with_location(&self, id: i32) -> DomainResult<Option<CarWithLocation>> {
        let row = car::Entity::find_by_id(id)
            .find_also_related(location::Entity)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(match row {
            Some((car, Some(location))) => Some(CarWithLocation {
                car: car_to_domain(car),
                location: location_to_domain(location),
            }),
            _ => None,
        })
    }

    async fn list_insurance_options(&self) -> DomainResult<Vec<InsuranceOption>> {
        let models = insurance_option::Entity::find()
            .order_by_asc(insurance_option::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(insurance_to_domain).collect())
    }

    async fn find_insurance_option(&self, id: i32) -> DomainResult<Option<InsuranceOption>> {
        let model = insurance_option::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(insurance_to_domain))
    }

    async fn list_accessories(&self) -> DomainResult<Vec<Accessory>> {
        let models = accessory::Entity::find()
            .order_by_asc(accessory::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(accessory_to_domain).collect())
    }

    async fn find_accessories(&self, ids: &[i32]) -> DomainResult<Vec<Accessory>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut found = accessory::Entity::find()
            .filter(accessory::Column::Id.is_in(ids.to_vec()))
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let mut ordered = Vec::with_capacity(found.len());
        for id in ids {
            if let Some(pos) = found.iter().position(|m| m.id == *id) {
                ordered.push(accessory_to_domain(found.swap_remove(pos)));
            }
        }
        Ok(ordered)
    }
}
