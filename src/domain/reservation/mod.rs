//! Reservation aggregate

pub mod model;

pub use model::{OccupancyStatus, PaymentStatus, Reservation, ReservationDraft};
