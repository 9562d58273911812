//! Customer administration handlers (admin only)

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Extension, Json,
};

use super::dto::CustomerResponse;
use crate::application::CustomerService;
use crate::domain::DomainError;
use crate::interfaces::http::common::{domain_error, ApiResponse, EmptyData};
use crate::interfaces::http::middleware::{require_admin, AuthenticatedUser};

/// Customers state
#[derive(Clone)]
pub struct CustomersHandlerState {
    pub customers: Arc<CustomerService>,
}

fn err(e: DomainError) -> Response {
    domain_error::<EmptyData>(e).into_response()
}

#[utoipa::path(
    get,
    path = "/api/v1/customers",
    tag = "Customers",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All customer accounts", body = ApiResponse<Vec<CustomerResponse>>),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn list_customers(
    State(state): State<CustomersHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<Vec<CustomerResponse>>>, Response> {
    require_admin(&user)?;

    let customers = state.customers.list().await.map_err(err)?;

    Ok(Json(ApiResponse::success(
        customers.into_iter().map(Into::into).collect(),
    )))
}

#[utoipa::path(
    delete,
    path = "/api/v1/customers/{id}",
    tag = "Customers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Account deleted; any occupied spots freed", body = ApiResponse<EmptyData>),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Customer not found")
    )
)]
pub async fn delete_customer(
    State(state): State<CustomersHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<EmptyData>>, Response> {
    require_admin(&user)?;

    state.customers.delete(id).await.map_err(err)?;

    Ok(Json(ApiResponse::success(EmptyData {})))
}
