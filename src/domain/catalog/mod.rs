//! Catalog aggregate
//!
//! Read-mostly reference data shared by all bookings.

pub mod model;
pub mod repository;

pub use model::{Accessory, Car, CarWithLocation, InsuranceOption, Location};
pub use repository::CatalogRepository;
