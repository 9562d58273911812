//! Time-based parking fee calculation.
//!
//! The charge for an occupancy period is `elapsed_hours * hourly_rate`,
//! rounded half-up to 2 decimal places. Elapsed time is wall-clock and
//! measured in whole seconds; DST shifts and clock skew are not
//! compensated.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

const SECONDS_PER_HOUR: i64 = 3600;

/// Compute the parking fee for the period `started_at..ended_at` at the
/// given hourly rate.
///
/// A non-positive elapsed duration (clock went backwards) charges zero
/// rather than producing a negative fee.
pub fn parking_fee(
    started_at: DateTime<Utc>,
    ended_at: DateTime<Utc>,
    hourly_rate: Decimal,
) -> Decimal {
    let elapsed_seconds = (ended_at - started_at).num_seconds().max(0);
    let hours = Decimal::from(elapsed_seconds) / Decimal::from(SECONDS_PER_HOUR);
    (hours * hourly_rate).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn period(hours_x100: i64) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = Utc::now();
        (start, start + Duration::seconds(hours_x100 * 36))
    }

    #[test]
    fn two_hours_at_ten_is_twenty() {
        let (start, end) = period(200);
        assert_eq!(parking_fee(start, end, dec!(10)), dec!(20.00));
    }

    #[test]
    fn ninety_minutes_at_fifteen_is_twenty_two_fifty() {
        let (start, end) = period(150);
        assert_eq!(parking_fee(start, end, dec!(15.0)), dec!(22.50));
    }

    #[test]
    fn zero_elapsed_is_zero() {
        let start = Utc::now();
        assert_eq!(parking_fee(start, start, dec!(25)), dec!(0));
    }

    #[test]
    fn negative_elapsed_charges_zero() {
        let start = Utc::now();
        let end = start - Duration::hours(1);
        assert_eq!(parking_fee(start, end, dec!(25)), dec!(0));
    }

    #[test]
    fn fee_scales_linearly_with_rate() {
        let (start, end) = period(300);
        let at_ten = parking_fee(start, end, dec!(10));
        let at_twenty = parking_fee(start, end, dec!(20));
        assert_eq!(at_twenty, at_ten * dec!(2));
    }

    #[test]
    fn rounds_half_up_to_two_decimals() {
        let start = Utc::now();
        // 90 seconds at 1.00/h = 0.025 -> rounds up to 0.03
        let end = start + Duration::seconds(90);
        assert_eq!(parking_fee(start, end, dec!(1.00)), dec!(0.03));
    }

    #[test]
    fn sub_second_remainder_is_truncated() {
        let start = Utc::now();
        let end = start + Duration::milliseconds(3_600_500);
        assert_eq!(parking_fee(start, end, dec!(10)), dec!(10.00));
    }
}
