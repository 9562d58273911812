//! Registration, login and account self-service endpoints

pub mod dto;
pub mod handlers;
