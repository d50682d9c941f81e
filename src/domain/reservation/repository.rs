//! Reservation repository interface
//!
//! Every operation except `create` is scoped to the owning user. A
//! reservation that belongs to someone else behaves as if it did not exist.

use async_trait::async_trait;

use super::model::{NewReservation, Reservation, ReservationChanges, ReservationSummary};
use crate::domain::DomainResult;

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Persist the reservation and its accessory links atomically.
    /// Returns the new reservation ID.
    async fn create(&self, reservation: NewReservation) -> DomainResult<i32>;

    /// Reservations of a user, newest first
    async fn list_for_user(&self, user_id: i32) -> DomainResult<Vec<ReservationSummary>>;

    async fn find_for_user(&self, id: i32, user_id: i32) -> DomainResult<Option<Reservation>>;

    /// Apply changes and replace the accessory links atomically.
    /// `None` if the reservation does not exist or is not owned by `user_id`.
    async fn update(
        &self,
        id: i32,
        user_id: i32,
        changes: ReservationChanges,
    ) -> DomainResult<Option<Reservation>>;

    /// Delete the links and the reservation atomically.
    /// Returns `false` (and changes nothing) when not owned by `user_id`.
    async fn delete(&self, id: i32, user_id: i32) -> DomainResult<bool>;
}
