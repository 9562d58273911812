//! Spot reservation and release endpoints

pub mod dto;
pub mod handlers;
