//! Authentication forms

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginForm {
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignupForm {
    #[validate(length(min = 1, max = 100, message = "name must be 1–100 characters"))]
    pub name: String,
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "password must be 8–128 characters"))]
    pub password: String,
}

/// Login or signup form description
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthPage {
    /// Where the form posts to
    pub action: String,
    pub fields: Vec<String>,
}

impl AuthPage {
    pub fn login() -> Self {
        Self {
            action: "/login".into(),
            fields: vec!["email".into(), "password".into()],
        }
    }

    pub fn signup() -> Self {
        Self {
            action: "/signup".into(),
            fields: vec!["name".into(), "email".into(), "password".into()],
        }
    }
}
