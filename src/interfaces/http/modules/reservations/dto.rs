//! Reservation DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::Reservation;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReserveRequest {
    pub facility_id: i32,
    #[validate(length(min = 1, max = 20, message = "vehicle_number is required"))]
    pub vehicle_number: String,
    /// Advisory expected departure time; stored and echoed, never
    /// enforced.
    pub expected_end_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReleaseRequest {
    #[validate(length(min = 1, max = 50, message = "payment_method is required"))]
    pub payment_method: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReservationResponse {
    pub id: i32,
    /// `null` only for historical rows whose spot was deleted
    pub spot_id: Option<i32>,
    pub customer_id: i32,
    pub vehicle_number: String,
    pub started_at: DateTime<Utc>,
    pub expected_end_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    #[schema(value_type = Option<f64>)]
    pub cost: Option<Decimal>,
    pub payment_status: String,
    pub payment_method: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub occupancy: String,
}

impl From<Reservation> for ReservationResponse {
    fn from(r: Reservation) -> Self {
        Self {
            id: r.id,
            spot_id: r.spot_id,
            customer_id: r.customer_id,
            vehicle_number: r.vehicle_number,
            started_at: r.started_at,
            expected_end_at: r.expected_end_at,
            ended_at: r.ended_at,
            cost: r.cost,
            payment_status: r.payment_status.as_str().to_string(),
            payment_method: r.payment_method,
            paid_at: r.paid_at,
            occupancy: r.occupancy.as_str().to_string(),
        }
    }
}
