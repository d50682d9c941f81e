//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod catalog_repository;
pub mod repository_provider;
pub mod reservation_repository;
pub mod user_repository;

pub use catalog_repository::SeaOrmCatalogRepository;
pub use repository_provider::SeaOrmRepositoryProvider;
pub use reservation_repository::SeaOrmReservationRepository;
pub use user_repository::SeaOrmUserRepository;

use crate::domain::DomainError;

pub(crate) fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(format!("Database error: {}", e))
}
