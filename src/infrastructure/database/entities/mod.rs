//! Database entities module

pub mod accessory;
pub mod car;
pub mod insurance_option;
pub mod location;
pub mod reservation;
pub mod reservation_accessory;
pub mod user;

pub use accessory::Entity as Accessory;
pub use car::Entity as Car;
pub use insurance_option::Entity as InsuranceOption;
pub use location::Entity as Location;
pub use reservation::Entity as Reservation;
pub use reservation_accessory::Entity as ReservationAccessory;
pub use user::Entity as User;
