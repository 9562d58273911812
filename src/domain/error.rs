//! Domain errors

use thiserror::Error;

/// Domain-level error types
#[derive(Debug, Clone, Error)]
pub enum DomainError {
    #[error("Facility not found: {0}")]
    FacilityNotFound(i32),

    #[error("No available spot in facility {0}")]
    NoAvailableSpot(i32),

    #[error("Spot not found: {0}")]
    SpotNotFound(i32),

    #[error("Spot {0} has no active reservation")]
    SpotNotOccupied(i32),

    #[error("Cannot shrink capacity to {requested}: {occupied} spot(s) still occupied")]
    CapacityBelowOccupancy { requested: u32, occupied: u32 },

    #[error("Cannot delete facility {facility_id}: {occupied} spot(s) still occupied")]
    FacilityHasOccupiedSpots { facility_id: i32, occupied: u32 },

    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Storage error: {0}")]
    Persistence(String),
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
