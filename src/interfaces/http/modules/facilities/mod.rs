//! Facility management and browsing endpoints

pub mod dto;
pub mod handlers;
