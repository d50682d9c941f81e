use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::booking::BookingDraft;
use crate::domain::user::SessionUser;

/// Opaque session identifier carried by the session cookie
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    /// Fresh random identifier
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    pub user: SessionUser,
    pub draft: Option<BookingDraft>,
}

impl SessionData {
    pub fn new(user: SessionUser) -> Self {
        Self { user, draft: None }
    }
}
