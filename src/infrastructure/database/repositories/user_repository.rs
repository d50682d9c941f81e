//! SeaORM implementation of UserRepository

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use super::db_err;
use crate::domain::user::UserRepository;
use crate::domain::{DomainError, DomainResult, NewUser, User};
use crate::infrastructure::database::entities::user;

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: user::Model) -> User {
    User {
        id: m.id,
        name: m.name,
        email: m.email,
        password_hash: m.password_hash,
        created_at: m.created_at,
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create(&self, new_user: NewUser) -> DomainResult<User> {
        debug!("Creating user: {}", new_user.email);

        let model = user::ActiveModel {
            name: Set(new_user.name),
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let saved = model.insert(&self.db).await.map_err(|e| {
            if e.to_string().contains("UNIQUE") || e.to_string().contains("duplicate") {
                DomainError::Conflict("Email already in use".to_string())
            } else {
                db_err(e)
            }
        })?;

        Ok(model_to_domain(saved))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::test_database;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Ada".into(),
            email: email.into(),
            password_hash: "$2b$04$hash".into(),
        }
    }

    #[tokio::test]
    async fn create_and_find() {
        let repo = SeaOrmUserRepository::new(test_database().await);

        let created = repo.create(new_user("ada@example.com")).await.unwrap();
        assert!(created.id > 0);

        let by_email = repo.find_by_email("ada@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, created.id);
        assert_eq!(by_email.name, "Ada");
        assert_eq!(by_email.email, "ada@example.com");
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let repo = SeaOrmUserRepository::new(test_database().await);
        repo.create(new_user("dup@example.com")).await.unwrap();

        let err = repo.create(new_user("dup@example.com")).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(msg) if msg == "Email already in use"));
    }

    #[tokio::test]
    async fn unknown_user() {
        let repo = SeaOrmUserRepository::new(test_database().await);
        assert!(repo.find_by_email("nobody@example.com").await.unwrap().is_none());
    }
}
