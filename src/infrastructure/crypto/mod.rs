//! Credential hashing

pub mod password;

pub use password::{hash_password, verify_password, DEFAULT_COST, MAX_COST, MIN_COST};
