//! Facility domain entity

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// A parking facility (lot) owning one spot per unit of capacity.
#[derive(Debug, Clone, PartialEq)]
pub struct Facility {
    /// Unique facility ID
    pub id: i32,
    /// Display name
    pub name: String,
    /// Price per hour of occupancy
    pub hourly_rate: Decimal,
    /// Street address
    pub address: String,
    /// Postal code
    pub postal_code: String,
    /// Number of spots this facility owns
    pub capacity: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for creating a facility.
#[derive(Debug, Clone)]
pub struct NewFacility {
    pub name: String,
    pub hourly_rate: Decimal,
    pub address: String,
    pub postal_code: String,
    pub capacity: u32,
}

/// Editable facility details (capacity changes go through resize).
#[derive(Debug, Clone)]
pub struct FacilityDetails {
    pub name: String,
    pub hourly_rate: Decimal,
    pub address: String,
    pub postal_code: String,
}

/// Facility together with its current occupancy count, for browse views.
#[derive(Debug, Clone)]
pub struct FacilityOccupancy {
    pub facility: Facility,
    /// Number of spots currently Occupied
    pub occupied: u32,
}

impl FacilityOccupancy {
    /// Spots currently free for reservation.
    pub fn available(&self) -> u32 {
        self.facility.capacity.saturating_sub(self.occupied)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_facility(capacity: u32) -> Facility {
        Facility {
            id: 1,
            name: "Central Garage".to_string(),
            hourly_rate: dec!(12.50),
            address: "1 Main St".to_string(),
            postal_code: "560001".to_string(),
            capacity,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn available_is_capacity_minus_occupied() {
        let occ = FacilityOccupancy {
            facility: sample_facility(10),
            occupied: 3,
        };
        assert_eq!(occ.available(), 7);
    }

    #[test]
    fn available_saturates_at_zero() {
        let occ = FacilityOccupancy {
            facility: sample_facility(2),
            occupied: 5,
        };
        assert_eq!(occ.available(), 0);
    }
}
