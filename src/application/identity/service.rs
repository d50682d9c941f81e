//! Authentication service
//!
//! HTTP handlers are thin wrappers that validate the form and delegate here.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{DomainError, DomainResult, NewUser, RepositoryProvider, SessionUser};
use crate::infrastructure::crypto::{hash_password, verify_password};

pub const INVALID_CREDENTIALS: &str = "Invalid email or password";
pub const EMAIL_IN_USE: &str = "Email already in use";

pub struct AuthService {
    repos: Arc<dyn RepositoryProvider>,
    bcrypt_cost: u32,
}

/// Emails are compared case-insensitively.
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl AuthService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, bcrypt_cost: u32) -> Self {
        Self { repos, bcrypt_cost }
    }

    /// Register a user and return the identity to store in the session.
    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> DomainResult<SessionUser> {
        let email = normalize_email(email);

        if self.repos.users().find_by_email(&email).await?.is_some() {
            return Err(DomainError::Conflict(EMAIL_IN_USE.into()));
        }

        let password = password.to_string();
        let cost = self.bcrypt_cost;
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password, cost))
            .await
            .map_err(|e| DomainError::Internal(format!("Hashing task failed: {}", e)))?
            .map_err(|e| DomainError::Internal(format!("Failed to hash password: {}", e)))?;

        let user = self
            .repos
            .users()
            .create(NewUser {
                name: name.trim().to_string(),
                email,
                password_hash,
            })
            .await?;

        info!(user_id = user.id, "User signed up");
        Ok(user.identity())
    }

    /// Check credentials. Unknown email and wrong password fail identically.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<SessionUser> {
        let email = normalize_email(email);

        let Some(user) = self.repos.users().find_by_email(&email).await? else {
            return Err(DomainError::Unauthorized(INVALID_CREDENTIALS.into()));
        };

        let password = password.to_string();
        let hash = user.password_hash.clone();
        let verified = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| DomainError::Internal(format!("Verification task failed: {}", e)))?;

        match verified {
            Ok(true) => {
                info!(user_id = user.id, "User logged in");
                Ok(user.identity())
            }
            Ok(false) => Err(DomainError::Unauthorized(INVALID_CREDENTIALS.into())),
            Err(e) => {
                warn!(user_id = user.id, "Stored password hash is unusable: {}", e);
                Err(DomainError::Unauthorized(INVALID_CREDENTIALS.into()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::test_database;
    use crate::infrastructure::SeaOrmRepositoryProvider;

    async fn service() -> AuthService {
        let repos = Arc::new(SeaOrmRepositoryProvider::new(test_database().await));
        AuthService::new(repos, crate::infrastructure::crypto::MIN_COST)
    }

    #[tokio::test]
    async fn signup_then_login() {
        let auth = service().await;

        let created = auth
            .signup("Grace", "grace@example.com", "hopper1906")
            .await
            .unwrap();
        assert_eq!(created.name, "Grace");

        let logged_in = auth.login("grace@example.com", "hopper1906").await.unwrap();
        assert_eq!(logged_in, created);
    }

    #[tokio::test]
    async fn email_is_case_insensitive() {
        let auth = service().await;
        auth.signup("Grace", " Grace@Example.com", "hopper1906")
            .await
            .unwrap();

        assert!(auth.login("GRACE@example.com", "hopper1906").await.is_ok());

        let err = auth
            .signup("Other", "grace@example.COM", "whatever1")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(msg) if msg == EMAIL_IN_USE));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_the_same() {
        let auth = service().await;
        auth.signup("Grace", "grace@example.com", "hopper1906")
            .await
            .unwrap();

        let wrong = auth.login("grace@example.com", "nope").await.unwrap_err();
        let unknown = auth.login("ghost@example.com", "nope").await.unwrap_err();

        for err in [wrong, unknown] {
            assert!(matches!(err, DomainError::Unauthorized(msg) if msg == INVALID_CREDENTIALS));
        }
    }
}
