//! Database entities module

pub mod customer;
pub mod facility;
pub mod reservation;
pub mod spot;

pub use customer::Entity as Customer;
pub use facility::Entity as Facility;
pub use reservation::Entity as Reservation;
pub use spot::Entity as Spot;
