//! HTTP interface: routing, middleware and API modules

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;

pub use router::create_api_router;
