//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider`: unified access to all per-aggregate repositories

use super::catalog::CatalogRepository;
use super::reservation::ReservationRepository;
use super::user::UserRepository;

/// Provides access to all domain repositories.
///
/// Consumers request only the repository they need:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let car = repos.catalog().find_car(3).await?;
///     let mine = repos.reservations().list_for_user(7).await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn users(&self) -> &dyn UserRepository;
    fn catalog(&self) -> &dyn CatalogRepository;
    fn reservations(&self) -> &dyn ReservationRepository;
}
