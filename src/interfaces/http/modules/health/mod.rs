//! Liveness endpoint

pub mod handlers;
