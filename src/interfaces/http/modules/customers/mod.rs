//! Customer administration endpoints

pub mod dto;
pub mod handlers;
