//! Browser session state
//!
//! A session exists only while a user is logged in. It carries the
//! identity and the booking draft being assembled.

pub mod model;
pub mod store;

pub use model::{SessionData, SessionId};
pub use store::SessionStore;
