//! Application layer: business logic services over the persistence
//! port.

pub mod services;

pub use services::{AllocationService, CustomerService};
