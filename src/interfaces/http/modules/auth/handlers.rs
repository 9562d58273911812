//! Authentication API handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};

use super::dto::{
    ChangePasswordRequest, CustomerInfo, LoginRequest, LoginResponse, RegisterRequest,
    UpdateProfileRequest,
};
use crate::application::CustomerService;
use crate::domain::ProfileUpdate;
use crate::infrastructure::crypto::jwt::{create_token, JwtConfig};
use crate::interfaces::http::common::{domain_error, ApiResponse, EmptyData, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;

/// Auth state
#[derive(Clone)]
pub struct AuthHandlerState {
    pub customers: Arc<CustomerService>,
    pub jwt_config: JwtConfig,
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<CustomerInfo>),
        (status = 409, description = "Email already registered"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn register(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CustomerInfo>>), (StatusCode, Json<ApiResponse<CustomerInfo>>)>
{
    let customer = state
        .customers
        .register(
            &request.email,
            &request.password,
            &request.name,
            &request.address,
            &request.postal_code,
        )
        .await
        .map_err(domain_error)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(customer.into())),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successful login", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, (StatusCode, Json<ApiResponse<LoginResponse>>)> {
    let customer = state
        .customers
        .authenticate(&request.email, &request.password)
        .await
        .map_err(domain_error)?;

    let token = create_token(
        customer.id,
        &customer.email,
        customer.role.as_str(),
        &state.jwt_config,
    )
    .map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(e.to_string())),
        )
    })?;

    let response = LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.jwt_config.expiration_hours * 3600,
        user: customer.into(),
    };

    Ok(Json(ApiResponse::success(response)))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current account info", body = ApiResponse<CustomerInfo>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_current_customer(
    State(state): State<AuthHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<CustomerInfo>>, (StatusCode, Json<ApiResponse<CustomerInfo>>)> {
    let customer = state
        .customers
        .get(user.customer_id)
        .await
        .map_err(domain_error)?;

    Ok(Json(ApiResponse::success(customer.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/auth/profile",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<CustomerInfo>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn update_profile(
    State(state): State<AuthHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<CustomerInfo>>, (StatusCode, Json<ApiResponse<CustomerInfo>>)> {
    let customer = state
        .customers
        .update_profile(
            user.customer_id,
            ProfileUpdate {
                name: request.name,
                address: request.address,
                postal_code: request.postal_code,
            },
        )
        .await
        .map_err(domain_error)?;

    Ok(Json(ApiResponse::success(customer.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/change-password",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = ApiResponse<EmptyData>),
        (status = 401, description = "Invalid current password")
    )
)]
pub async fn change_password(
    State(state): State<AuthHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<EmptyData>>, (StatusCode, Json<ApiResponse<EmptyData>>)> {
    state
        .customers
        .change_password(
            user.customer_id,
            &request.current_password,
            &request.new_password,
        )
        .await
        .map_err(domain_error)?;

    Ok(Json(ApiResponse::success(EmptyData {})))
}
