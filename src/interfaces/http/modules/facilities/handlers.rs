//! Facility API handlers
//!
//! Browsing is public; creation, editing, deletion and the spot board
//! are admin-only.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};

use super::dto::{
    CreateFacilityRequest, FacilityResponse, FacilitySummaryResponse, SpotResponse,
    UpdateFacilityRequest,
};
use crate::application::AllocationService;
use crate::domain::{DomainError, FacilityDetails, NewFacility};
use crate::interfaces::http::common::{domain_error, ApiResponse, EmptyData, ValidatedJson};
use crate::interfaces::http::middleware::{require_admin, AuthenticatedUser};

/// Facilities state
#[derive(Clone)]
pub struct FacilitiesHandlerState {
    pub allocation: Arc<AllocationService>,
}

fn err(e: DomainError) -> Response {
    domain_error::<EmptyData>(e).into_response()
}

#[utoipa::path(
    get,
    path = "/api/v1/facilities",
    tag = "Facilities",
    responses(
        (status = 200, description = "All facilities with occupancy counts", body = ApiResponse<Vec<FacilitySummaryResponse>>)
    )
)]
pub async fn list_facilities(
    State(state): State<FacilitiesHandlerState>,
) -> Result<
    Json<ApiResponse<Vec<FacilitySummaryResponse>>>,
    (StatusCode, Json<ApiResponse<Vec<FacilitySummaryResponse>>>),
> {
    let facilities = state
        .allocation
        .list_facilities()
        .await
        .map_err(domain_error)?;

    let summaries = facilities.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(summaries)))
}

#[utoipa::path(
    get,
    path = "/api/v1/facilities/{id}",
    tag = "Facilities",
    params(("id" = i32, Path, description = "Facility ID")),
    responses(
        (status = 200, description = "Facility details", body = ApiResponse<FacilityResponse>),
        (status = 404, description = "Facility not found")
    )
)]
pub async fn get_facility(
    State(state): State<FacilitiesHandlerState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<FacilityResponse>>, (StatusCode, Json<ApiResponse<FacilityResponse>>)>
{
    let facility = state
        .allocation
        .get_facility(id)
        .await
        .map_err(domain_error)?;

    Ok(Json(ApiResponse::success(facility.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/facilities",
    tag = "Facilities",
    security(("bearer_auth" = [])),
    request_body = CreateFacilityRequest,
    responses(
        (status = 201, description = "Facility created with its spot set", body = ApiResponse<FacilityResponse>),
        (status = 403, description = "Admin role required"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_facility(
    State(state): State<FacilitiesHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateFacilityRequest>,
) -> Result<(StatusCode, Json<ApiResponse<FacilityResponse>>), Response> {
    require_admin(&user)?;

    let facility = state
        .allocation
        .create_facility(NewFacility {
            name: request.name,
            hourly_rate: request.hourly_rate,
            address: request.address,
            postal_code: request.postal_code,
            capacity: request.capacity,
        })
        .await
        .map_err(err)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(facility.into())),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/facilities/{id}",
    tag = "Facilities",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Facility ID")),
    request_body = UpdateFacilityRequest,
    responses(
        (status = 200, description = "Facility updated", body = ApiResponse<FacilityResponse>),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Facility not found"),
        (status = 409, description = "Requested capacity below current occupancy")
    )
)]
pub async fn update_facility(
    State(state): State<FacilitiesHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<UpdateFacilityRequest>,
) -> Result<Json<ApiResponse<FacilityResponse>>, Response> {
    require_admin(&user)?;

    let facility = state
        .allocation
        .update_facility(
            id,
            FacilityDetails {
                name: request.name,
                hourly_rate: request.hourly_rate,
                address: request.address,
                postal_code: request.postal_code,
            },
            request.capacity,
        )
        .await
        .map_err(err)?;

    Ok(Json(ApiResponse::success(facility.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/facilities/{id}",
    tag = "Facilities",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Facility ID")),
    responses(
        (status = 200, description = "Facility deleted", body = ApiResponse<EmptyData>),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Facility not found"),
        (status = 409, description = "Facility still has occupied spots")
    )
)]
pub async fn delete_facility(
    State(state): State<FacilitiesHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<EmptyData>>, Response> {
    require_admin(&user)?;

    state.allocation.delete_facility(id).await.map_err(err)?;

    Ok(Json(ApiResponse::success(EmptyData {})))
}

#[utoipa::path(
    get,
    path = "/api/v1/facilities/{id}/spots",
    tag = "Facilities",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Facility ID")),
    responses(
        (status = 200, description = "Spot board for the facility", body = ApiResponse<Vec<SpotResponse>>),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Facility not found")
    )
)]
pub async fn list_spots(
    State(state): State<FacilitiesHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<SpotResponse>>>, Response> {
    require_admin(&user)?;

    // Distinguish an unknown facility from an empty one.
    state.allocation.get_facility(id).await.map_err(err)?;

    let spots = state.allocation.list_spots(id).await.map_err(err)?;

    let mut board = Vec::with_capacity(spots.len());
    for spot in spots {
        let occupied = !spot.is_available();
        let mut entry = SpotResponse::from(spot);
        if occupied {
            entry.reservation = state
                .allocation
                .active_reservation_for_spot(entry.id)
                .await
                .map_err(err)?
                .map(Into::into);
        }
        board.push(entry);
    }

    Ok(Json(ApiResponse::success(board)))
}
