use async_trait::async_trait;

use super::{NewUser, User};
use crate::domain::DomainResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user. Fails with `Conflict` if the email is taken.
    async fn create(&self, user: NewUser) -> DomainResult<User>;

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>>;
}
