//! Domain layer: core business entities, billing math and the
//! persistence port.

pub mod billing;
pub mod customer;
pub mod error;
pub mod facility;
pub mod reservation;
pub mod spot;
pub mod store;

pub use customer::{Customer, CustomerRole, NewCustomer, ProfileUpdate};
pub use error::{DomainError, DomainResult};
pub use facility::{Facility, FacilityDetails, FacilityOccupancy, NewFacility};
pub use reservation::{OccupancyStatus, PaymentStatus, Reservation, ReservationDraft};
pub use spot::{Spot, SpotStatus};
pub use store::ParkingStore;
