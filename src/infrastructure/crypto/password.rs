//! Password hashing utilities

use bcrypt::{hash, verify};

pub use bcrypt::DEFAULT_COST;

/// Work factor bounds accepted by bcrypt
pub const MIN_COST: u32 = 4;
pub const MAX_COST: u32 = 31;

/// Hash a password using bcrypt with the given work factor.
/// The salt is generated per call and embedded in the hash.
pub fn hash_password(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    hash(password, cost)
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password, hash)
}
