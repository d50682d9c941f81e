//! Session store interface

use async_trait::async_trait;

use super::model::{SessionData, SessionId};
use crate::domain::DomainResult;

/// Persistence for session state, keyed by session id.
///
/// Concurrent writes to the same session are last-write-wins.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, id: &SessionId) -> DomainResult<Option<SessionData>>;

    /// Insert or replace the session.
    async fn set(&self, id: &SessionId, data: SessionData) -> DomainResult<()>;

    /// Replace the data of an existing session.
    ///
    /// Returns `false` and stores nothing when the session is gone, so a
    /// write racing a logout cannot bring the session back.
    async fn update(&self, id: &SessionId, data: SessionData) -> DomainResult<bool>;

    /// Remove the session. Clearing an unknown id is not an error.
    async fn clear(&self, id: &SessionId) -> DomainResult<()>;
}
