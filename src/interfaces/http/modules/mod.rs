//! REST API modules, one per resource

pub mod auth;
pub mod customers;
pub mod facilities;
pub mod health;
pub mod reservations;
