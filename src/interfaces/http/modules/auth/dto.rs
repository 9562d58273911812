//! Authentication DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::Customer;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    #[validate(length(min = 6, max = 128, message = "password must be 6–128 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 100, message = "name is required"))]
    pub name: String,
    #[validate(length(max = 200))]
    #[serde(default)]
    pub address: String,
    #[validate(length(max = 20))]
    #[serde(default)]
    pub postal_code: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: CustomerInfo,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerInfo {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub address: String,
    pub postal_code: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<Customer> for CustomerInfo {
    fn from(c: Customer) -> Self {
        Self {
            id: c.id,
            email: c.email,
            name: c.name,
            address: c.address,
            postal_code: c.postal_code,
            role: c.role.as_str().to_string(),
            created_at: c.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100, message = "name is required"))]
    pub name: String,
    #[validate(length(max = 200))]
    #[serde(default)]
    pub address: String,
    #[validate(length(max = 20))]
    #[serde(default)]
    pub postal_code: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "current password is required"))]
    pub current_password: String,
    #[validate(length(min = 6, max = 128, message = "new password must be 6–128 characters"))]
    pub new_password: String,
}
