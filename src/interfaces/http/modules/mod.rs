//! Handlers grouped by page

pub mod auth;
pub mod booking;
pub mod health;
pub mod metrics;
pub mod reservations;
