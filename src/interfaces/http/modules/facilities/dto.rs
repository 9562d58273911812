//! Facility DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{Facility, FacilityOccupancy, Reservation, Spot};

#[derive(Debug, Serialize, ToSchema)]
pub struct FacilityResponse {
    pub id: i32,
    pub name: String,
    #[schema(value_type = f64)]
    pub hourly_rate: Decimal,
    pub address: String,
    pub postal_code: String,
    pub capacity: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Facility> for FacilityResponse {
    fn from(f: Facility) -> Self {
        Self {
            id: f.id,
            name: f.name,
            hourly_rate: f.hourly_rate,
            address: f.address,
            postal_code: f.postal_code,
            capacity: f.capacity,
            created_at: f.created_at,
            updated_at: f.updated_at,
        }
    }
}

/// Facility summary with live occupancy counts.
#[derive(Debug, Serialize, ToSchema)]
pub struct FacilitySummaryResponse {
    pub id: i32,
    pub name: String,
    #[schema(value_type = f64)]
    pub hourly_rate: Decimal,
    pub address: String,
    pub postal_code: String,
    pub capacity: u32,
    pub occupied: u32,
    pub available: u32,
}

impl From<FacilityOccupancy> for FacilitySummaryResponse {
    fn from(o: FacilityOccupancy) -> Self {
        let available = o.available();
        Self {
            id: o.facility.id,
            name: o.facility.name,
            hourly_rate: o.facility.hourly_rate,
            address: o.facility.address,
            postal_code: o.facility.postal_code,
            capacity: o.facility.capacity,
            occupied: o.occupied,
            available,
        }
    }
}

/// One row of the admin spot board. Occupied spots carry their active
/// reservation.
#[derive(Debug, Serialize, ToSchema)]
pub struct SpotResponse {
    pub id: i32,
    pub facility_id: i32,
    pub status: String,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservation: Option<ActiveReservationInfo>,
}

impl From<Spot> for SpotResponse {
    fn from(s: Spot) -> Self {
        Self {
            id: s.id,
            facility_id: s.facility_id,
            status: s.status.as_str().to_string(),
            updated_at: s.updated_at,
            reservation: None,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ActiveReservationInfo {
    pub reservation_id: i32,
    pub customer_id: i32,
    pub vehicle_number: String,
    pub started_at: DateTime<Utc>,
    pub expected_end_at: Option<DateTime<Utc>>,
}

impl From<Reservation> for ActiveReservationInfo {
    fn from(r: Reservation) -> Self {
        Self {
            reservation_id: r.id,
            customer_id: r.customer_id,
            vehicle_number: r.vehicle_number,
            started_at: r.started_at,
            expected_end_at: r.expected_end_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateFacilityRequest {
    #[validate(length(min = 1, max = 100, message = "facility name is required"))]
    pub name: String,
    #[schema(value_type = f64)]
    pub hourly_rate: Decimal,
    #[validate(length(min = 1, max = 200, message = "address is required"))]
    pub address: String,
    #[validate(length(max = 20))]
    #[serde(default)]
    pub postal_code: String,
    pub capacity: u32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateFacilityRequest {
    #[validate(length(min = 1, max = 100, message = "facility name is required"))]
    pub name: String,
    #[schema(value_type = f64)]
    pub hourly_rate: Decimal,
    #[validate(length(min = 1, max = 200, message = "address is required"))]
    pub address: String,
    #[validate(length(max = 20))]
    #[serde(default)]
    pub postal_code: String,
    /// When present, grow or shrink the spot set to this capacity.
    pub capacity: Option<u32>,
}
