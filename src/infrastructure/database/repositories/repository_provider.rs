//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::catalog::CatalogRepository;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::reservation::ReservationRepository;
use crate::domain::user::UserRepository;

use super::catalog_repository::SeaOrmCatalogRepository;
use super::reservation_repository::SeaOrmReservationRepository;
use super::user_repository::SeaOrmUserRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let cars = repos.catalog().list_cars_at(1).await?;
/// let mine = repos.reservations().list_for_user(7).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    users: SeaOrmUserRepository,
    catalog: SeaOrmCatalogRepository,
    reservations: SeaOrmReservationRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: SeaOrmUserRepository::new(db.clone()),
            catalog: SeaOrmCatalogRepository::new(db.clone()),
            reservations: SeaOrmReservationRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn catalog(&self) -> &dyn CatalogRepository {
        &self.catalog
    }

    fn reservations(&self) -> &dyn ReservationRepository {
        &self.reservations
    }
}
