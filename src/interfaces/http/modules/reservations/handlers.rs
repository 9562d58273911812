//! Reservation API handlers
//!
//! The reserving customer is always taken from the bearer token, never
//! from the request body.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};

use super::dto::{ReleaseRequest, ReservationResponse, ReserveRequest};
use crate::application::AllocationService;
use crate::domain::{DomainError, ReservationDraft};
use crate::interfaces::http::common::{domain_error, ApiResponse, EmptyData, ValidatedJson};
use crate::interfaces::http::middleware::{require_admin, AuthenticatedUser};

/// Reservations state
#[derive(Clone)]
pub struct ReservationsHandlerState {
    pub allocation: Arc<AllocationService>,
}

fn err(e: DomainError) -> Response {
    domain_error::<EmptyData>(e).into_response()
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    request_body = ReserveRequest,
    responses(
        (status = 201, description = "Spot reserved", body = ApiResponse<ReservationResponse>),
        (status = 404, description = "Facility not found"),
        (status = 409, description = "No available spot in the facility"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn reserve(
    State(state): State<ReservationsHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<ReserveRequest>,
) -> Result<
    (StatusCode, Json<ApiResponse<ReservationResponse>>),
    (StatusCode, Json<ApiResponse<ReservationResponse>>),
> {
    let reservation = state
        .allocation
        .reserve(
            request.facility_id,
            ReservationDraft {
                customer_id: user.customer_id,
                vehicle_number: request.vehicle_number,
                expected_end_at: request.expected_end_at,
            },
        )
        .await
        .map_err(domain_error)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(reservation.into())),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/spots/{spot_id}/release",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(("spot_id" = i32, Path, description = "Spot ID")),
    request_body = ReleaseRequest,
    responses(
        (status = 200, description = "Spot released with the final charge", body = ApiResponse<ReservationResponse>),
        (status = 403, description = "Reservation belongs to another customer"),
        (status = 404, description = "Spot not found"),
        (status = 409, description = "Spot is not occupied")
    )
)]
pub async fn release(
    State(state): State<ReservationsHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(spot_id): Path<i32>,
    ValidatedJson(request): ValidatedJson<ReleaseRequest>,
) -> Result<Json<ApiResponse<ReservationResponse>>, Response> {
    // Customers may only release their own spot; admins may release any.
    if !user.is_admin() {
        let active = state
            .allocation
            .active_reservation_for_spot(spot_id)
            .await
            .map_err(err)?
            .ok_or_else(|| err(DomainError::SpotNotOccupied(spot_id)))?;
        if active.customer_id != user.customer_id {
            return Err((
                StatusCode::FORBIDDEN,
                Json(ApiResponse::<EmptyData>::error(
                    "Reservation belongs to another customer",
                )),
            )
                .into_response());
        }
    }

    let reservation = state
        .allocation
        .release(spot_id, &request.payment_method)
        .await
        .map_err(err)?;

    Ok(Json(ApiResponse::success(reservation.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All reservations", body = ApiResponse<Vec<ReservationResponse>>),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn list_reservations(
    State(state): State<ReservationsHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<Vec<ReservationResponse>>>, Response> {
    require_admin(&user)?;

    let reservations = state.allocation.list_reservations().await.map_err(err)?;

    Ok(Json(ApiResponse::success(
        reservations.into_iter().map(Into::into).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations/mine",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Reservation history of the current customer", body = ApiResponse<Vec<ReservationResponse>>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_my_reservations(
    State(state): State<ReservationsHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<
    Json<ApiResponse<Vec<ReservationResponse>>>,
    (StatusCode, Json<ApiResponse<Vec<ReservationResponse>>>),
> {
    let reservations = state
        .allocation
        .list_reservations_for_customer(user.customer_id)
        .await
        .map_err(domain_error)?;

    Ok(Json(ApiResponse::success(
        reservations.into_iter().map(Into::into).collect(),
    )))
}
