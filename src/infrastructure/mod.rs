//! Infrastructure layer: database, alternative storage backends and
//! crypto.

pub mod crypto;
pub mod database;
pub mod storage;

pub use database::{init_database, DatabaseConfig, SeaOrmParkingStore};
pub use storage::InMemoryParkingStore;
