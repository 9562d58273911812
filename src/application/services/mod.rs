//! Application services

pub mod allocation;
pub mod customers;

pub use allocation::AllocationService;
pub use customers::CustomerService;
