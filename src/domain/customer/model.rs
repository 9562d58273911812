//! Customer domain entity

use chrono::{DateTime, Utc};

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerRole {
    /// Manages facilities and customers
    Admin,
    /// Reserves and releases spots
    Customer,
}

impl CustomerRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Customer => "customer",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "admin" => Self::Admin,
            _ => Self::Customer,
        }
    }
}

impl std::fmt::Display for CustomerRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A registered account (parking customer or administrator)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    /// Unique customer ID
    pub id: i32,
    /// Login identity, unique
    pub email: String,
    /// bcrypt hash of the password
    pub password_hash: String,
    /// Display name
    pub name: String,
    pub address: String,
    pub postal_code: String,
    pub role: CustomerRole,
    pub created_at: DateTime<Utc>,
}

impl Customer {
    pub fn is_admin(&self) -> bool {
        self.role == CustomerRole::Admin
    }
}

/// Data for registering a customer.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub address: String,
    pub postal_code: String,
    pub role: CustomerRole,
}

/// Editable profile fields.
#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    pub name: String,
    pub address: String,
    pub postal_code: String,
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_roundtrip() {
        for role in &[CustomerRole::Admin, CustomerRole::Customer] {
            assert_eq!(&CustomerRole::from_str(role.as_str()), role);
        }
    }

    #[test]
    fn unknown_role_defaults_to_customer() {
        assert_eq!(CustomerRole::from_str("operator"), CustomerRole::Customer);
    }
}
