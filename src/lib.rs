//! # ParkHub
//!
//! Parking-lot reservation service: facilities own fixed sets of spots,
//! customers reserve a spot and release it with a time-based charge.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core business entities, billing and the persistence port
//! - **application**: Business logic services (allocation, customers)
//! - **infrastructure**: Database (SeaORM/SQLite), in-memory storage, crypto
//! - **interfaces**: REST API with Swagger documentation
//! - **support**: Cross-cutting utilities (graceful shutdown)

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod support;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, SeaOrmParkingStore};

// Re-export API router
pub use interfaces::http::create_api_router;
