//! # Car Rental Booking Service
//!
//! Web backend where registered users book a rental car through a
//! five-step wizard and then manage their reservations.
//!
//! ## Architecture
//!
//! - **domain**: entities, the booking wizard state machine, pricing and
//!   repository traits
//! - **application**: authentication, booking and reservation services
//! - **infrastructure**: SeaORM persistence, password hashing, session store
//! - **interfaces**: HTTP handlers, session cookie extractors, Swagger UI
//! - **server**: runtime bootstrap and graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig, ConfigError};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

pub use interfaces::http::{create_router, AppState};
pub use server::{init_tracing, ServerHandle, ServerOptions};
