//! Customer administration DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::Customer;

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerResponse {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub address: String,
    pub postal_code: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<Customer> for CustomerResponse {
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
