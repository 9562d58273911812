//! Cross-cutting support utilities

pub mod shutdown;

pub use shutdown::{ShutdownCoordinator, ShutdownSignal};
