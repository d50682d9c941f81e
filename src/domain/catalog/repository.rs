//! Catalog repository interface (read-only reference data)

use async_trait::async_trait;

use super::model::{Accessory, Car, CarWithLocation, InsuranceOption, Location};
use crate::domain::DomainResult;

#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn list_locations(&self) -> DomainResult<Vec<Location>>;

    async fn find_location(&self, id: i32) -> DomainResult<Option<Location>>;

    /// All cars, regardless of branch
    async fn list_cars(&self) -> DomainResult<Vec<Car>>;

    async fn list_cars_at(&self, location_id: i32) -> DomainResult<Vec<Car>>;

    async fn find_car(&self, id: i32) -> DomainResult<Option<Car>>;

    /// Car together with the branch it belongs to
    async fn find_car_with_location(&self, id: i32) -> DomainResult<Option<CarWithLocation>>;

    async fn list_insurance_options(&self) -> DomainResult<Vec<InsuranceOption>>;

    async fn find_insurance_option(&self, id: i32) -> DomainResult<Option<InsuranceOption>>;

    async fn list_accessories(&self) -> DomainResult<Vec<Accessory>>;

    /// Resolve accessory ids. Unknown ids are skipped; the result follows
    /// the order of `ids` with duplicates removed.
    async fn find_accessories(&self, ids: &[i32]) -> DomainResult<Vec<Accessory>>;
}
