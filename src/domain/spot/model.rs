//! Spot domain entity

use chrono::{DateTime, Utc};

/// Spot occupancy status.
///
/// The only transitions are `Available -> Occupied` (reserve) and
/// `Occupied -> Available` (release).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpotStatus {
    /// Free and eligible for allocation
    Available,
    /// Held by exactly one active reservation
    Occupied,
}

impl SpotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Occupied => "Occupied",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "Occupied" => Self::Occupied,
            _ => Self::Available,
        }
    }
}

impl std::fmt::Display for SpotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single parking space inside a facility
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spot {
    /// Unique spot ID
    pub id: i32,
    /// Owning facility
    pub facility_id: i32,
    /// Current status
    pub status: SpotStatus,
    pub updated_at: DateTime<Utc>,
}

impl Spot {
    pub fn is_available(&self) -> bool {
        self.status == SpotStatus::Available
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_display_roundtrip() {
        for status in &[SpotStatus::Available, SpotStatus::Occupied] {
            let parsed = SpotStatus::from_str(status.as_str());
            assert_eq!(&parsed, status);
        }
    }

    #[test]
    fn unknown_status_defaults_to_available() {
        assert_eq!(SpotStatus::from_str("Reserved"), SpotStatus::Available);
    }

    #[test]
    fn availability_follows_status() {
        let mut spot = Spot {
            id: 1,
            facility_id: 1,
            status: SpotStatus::Available,
            updated_at: Utc::now(),
        };
        assert!(spot.is_available());
        spot.status = SpotStatus::Occupied;
        assert!(!spot.is_available());
    }
}
