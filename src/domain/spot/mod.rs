//! Spot aggregate

pub mod model;

pub use model::{Spot, SpotStatus};
