//! User domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Registered user
#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// The identity stored in the session after a successful login.
    pub fn identity(&self) -> SessionUser {
        SessionUser {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// Logged-in identity carried by a session (never the credential hash).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: i32,
    pub name: String,
    pub email: String,
}

/// Data needed to insert a user; the hash is computed before this is built.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}
