//! Reservation domain entity

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::billing;

/// Occupancy status of a reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OccupancyStatus {
    /// The reservation currently holds its spot
    Occupied,
    /// The spot was released and the charge is settled
    Released,
}

impl OccupancyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Occupied => "Occupied",
            Self::Released => "Released",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "Occupied" => Self::Occupied,
            _ => Self::Released,
        }
    }
}

impl std::fmt::Display for OccupancyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payment status of a reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Paid => "Paid",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "Paid" => Self::Paid,
            _ => Self::Pending,
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One occupancy period of one spot by one customer, with its billing
/// outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct Reservation {
    /// Unique reservation ID
    pub id: i32,
    /// Reserved spot. `None` only for historical rows whose spot was
    /// deleted after release.
    pub spot_id: Option<i32>,
    /// Customer holding the reservation
    pub customer_id: i32,
    /// Vehicle registration plate (free text)
    pub vehicle_number: String,
    /// When the spot was taken
    pub started_at: DateTime<Utc>,
    /// Advisory expected departure time; never enforced
    pub expected_end_at: Option<DateTime<Utc>>,
    /// When the spot was released
    pub ended_at: Option<DateTime<Utc>>,
    /// Final charge; `None` until released, immutable afterwards
    pub cost: Option<Decimal>,
    pub payment_status: PaymentStatus,
    /// Payment method recorded at release (free text, e.g. "UPI", "Cash")
    pub payment_method: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub occupancy: OccupancyStatus,
}

/// Input for opening a reservation.
#[derive(Debug, Clone)]
pub struct ReservationDraft {
    pub customer_id: i32,
    pub vehicle_number: String,
    pub expected_end_at: Option<DateTime<Utc>>,
}

impl Reservation {
    /// Open a new reservation holding `spot_id` from `now` on.
    pub fn open(id: i32, spot_id: i32, draft: ReservationDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            spot_id: Some(spot_id),
            customer_id: draft.customer_id,
            vehicle_number: draft.vehicle_number,
            started_at: now,
            expected_end_at: draft.expected_end_at,
            ended_at: None,
            cost: None,
            payment_status: PaymentStatus::Pending,
            payment_method: None,
            paid_at: None,
            occupancy: OccupancyStatus::Occupied,
        }
    }

    pub fn is_active(&self) -> bool {
        self.occupancy == OccupancyStatus::Occupied
    }

    /// Close this reservation at `now`, computing the charge at
    /// `hourly_rate` and recording the payment.
    ///
    /// Only valid while the reservation is active; the caller guards
    /// against double release.
    pub fn settle(&mut self, now: DateTime<Utc>, hourly_rate: Decimal, payment_method: &str) {
        self.ended_at = Some(now);
        self.cost = Some(billing::parking_fee(self.started_at, now, hourly_rate));
        self.payment_status = PaymentStatus::Paid;
        self.payment_method = Some(payment_method.to_string());
        self.paid_at = Some(now);
        self.occupancy = OccupancyStatus::Released;
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn sample_draft() -> ReservationDraft {
        ReservationDraft {
            customer_id: 7,
            vehicle_number: "KA-01-AB-1234".to_string(),
            expected_end_at: None,
        }
    }

    #[test]
    fn open_reservation_is_active_and_unbilled() {
        let r = Reservation::open(1, 42, sample_draft(), Utc::now());
        assert!(r.is_active());
        assert_eq!(r.spot_id, Some(42));
        assert_eq!(r.cost, None);
        assert_eq!(r.payment_status, PaymentStatus::Pending);
        assert_eq!(r.ended_at, None);
    }

    #[test]
    fn settle_closes_and_bills() {
        let start = Utc::now();
        let mut r = Reservation::open(1, 42, sample_draft(), start);
        let end = start + Duration::minutes(90);

        r.settle(end, dec!(15.0), "UPI");

        assert!(!r.is_active());
        assert_eq!(r.occupancy, OccupancyStatus::Released);
        assert_eq!(r.cost, Some(dec!(22.50)));
        assert_eq!(r.payment_status, PaymentStatus::Paid);
        assert_eq!(r.payment_method.as_deref(), Some("UPI"));
        assert_eq!(r.ended_at, Some(end));
        assert_eq!(r.paid_at, Some(end));
    }

    #[test]
    fn settle_never_produces_negative_cost() {
        let start = Utc::now();
        let mut r = Reservation::open(1, 42, sample_draft(), start);
        r.settle(start - Duration::minutes(5), dec!(10), "Cash");
        assert_eq!(r.cost, Some(dec!(0)));
    }

    #[test]
    fn occupancy_status_roundtrip() {
        for status in &[OccupancyStatus::Occupied, OccupancyStatus::Released] {
            assert_eq!(&OccupancyStatus::from_str(status.as_str()), status);
        }
    }

    #[test]
    fn payment_status_roundtrip() {
        for status in &[PaymentStatus::Pending, PaymentStatus::Paid] {
            assert_eq!(&PaymentStatus::from_str(status.as_str()), status);
        }
    }
}
