//! Customer aggregate

pub mod model;

pub use model::{Customer, CustomerRole, NewCustomer, ProfileUpdate};
