//! Shared HTTP plumbing: response envelope, error mapping, validated
//! JSON extraction.

pub mod validated_json;

pub use validated_json::ValidatedJson;

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::DomainError;

/// Standard API response wrapper.
///
/// Every REST endpoint returns data in this envelope.
/// On success: `{"success": true, "data": {...}}`,
/// on failure: `{"success": false, "error": "description"}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// `true` if the request succeeded
    pub success: bool,
    /// Payload; `null` on failure
    pub data: Option<T>,
    /// Error description; `null` on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Empty response for operations without return data
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EmptyData {}

/// HTTP status for a domain error kind.
fn error_status(e: &DomainError) -> StatusCode {
    match e {
        DomainError::FacilityNotFound(_)
        | DomainError::SpotNotFound(_)
        | DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::NoAvailableSpot(_)
        | DomainError::SpotNotOccupied(_)
        | DomainError::CapacityBelowOccupancy { .. }
        | DomainError::FacilityHasOccupiedSpots { .. }
        | DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        DomainError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Map a domain error onto the standard error envelope.
pub fn domain_error<T>(e: DomainError) -> (StatusCode, Json<ApiResponse<T>>) {
    (error_status(&e), Json(ApiResponse::error(e.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_kinds_map_to_404() {
        assert_eq!(
            error_status(&DomainError::FacilityNotFound(1)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            error_status(&DomainError::SpotNotFound(1)),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn state_conflicts_map_to_409() {
        assert_eq!(
            error_status(&DomainError::NoAvailableSpot(1)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            error_status(&DomainError::SpotNotOccupied(1)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            error_status(&DomainError::FacilityHasOccupiedSpots {
                facility_id: 1,
                occupied: 2
            }),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn storage_faults_map_to_500() {
        assert_eq!(
            error_status(&DomainError::Persistence("db gone".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
