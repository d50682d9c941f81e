//! Identity module: signup and login

pub mod service;

pub use service::{AuthService, EMAIL_IN_USE, INVALID_CREDENTIALS};
