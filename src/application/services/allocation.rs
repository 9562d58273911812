//! Spot allocation and billing engine.
//!
//! Owns the lifecycle of spot occupancy: reserve claims an Available
//! spot and opens a reservation, release closes the reservation with a
//! time-based charge, and the two capacity guards (resize, delete)
//! refuse to evict occupied spots.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::info;

use crate::domain::{
    DomainError, DomainResult, Facility, FacilityDetails, FacilityOccupancy, NewFacility,
    ParkingStore, Reservation, ReservationDraft, Spot,
};

/// Maximum capacity accepted for a single facility.
const MAX_CAPACITY: u32 = 10_000;

/// Service for spot allocation, release billing and capacity
/// maintenance.
pub struct AllocationService {
    store: Arc<dyn ParkingStore>,
}

impl AllocationService {
    pub fn new(store: Arc<dyn ParkingStore>) -> Self {
        Self { store }
    }

    /// Create a facility and provision one Available spot per unit of
    /// capacity.
    pub async fn create_facility(&self, new: NewFacility) -> DomainResult<Facility> {
        validate_rate(new.hourly_rate)?;
        validate_capacity(new.capacity)?;

        let facility = self.store.create_facility(new).await?;
        info!(
            facility_id = facility.id,
            name = %facility.name,
            capacity = facility.capacity,
            "Facility created"
        );
        Ok(facility)
    }

    pub async fn get_facility(&self, id: i32) -> DomainResult<Facility> {
        self.store
            .get_facility(id)
            .await?
            .ok_or(DomainError::FacilityNotFound(id))
    }

    pub async fn list_facilities(&self) -> DomainResult<Vec<FacilityOccupancy>> {
        self.store.list_facilities().await
    }

    /// Update facility details and, when a capacity is given, resize
    /// its spot set. The store applies both in one atomic unit, so a
    /// refused shrink leaves the details untouched too.
    pub async fn update_facility(
        &self,
        id: i32,
        details: FacilityDetails,
        new_capacity: Option<u32>,
    ) -> DomainResult<Facility> {
        validate_rate(details.hourly_rate)?;
        if let Some(capacity) = new_capacity {
            validate_capacity(capacity)?;
        }

        let facility = self.store.update_facility(id, details, new_capacity).await?;
        info!(
            facility_id = id,
            capacity = facility.capacity,
            "Facility updated"
        );
        Ok(facility)
    }

    /// Grow or shrink a facility's spot set without evicting occupied
    /// spots.
    pub async fn resize_capacity(&self, facility_id: i32, new_capacity: u32) -> DomainResult<()> {
        validate_capacity(new_capacity)?;
        self.store.resize_facility(facility_id, new_capacity).await?;
        info!(facility_id, new_capacity, "Facility capacity updated");
        Ok(())
    }

    /// Delete a facility once none of its spots is occupied. Released
    /// reservation history is retained with a nulled spot reference.
    pub async fn delete_facility(&self, facility_id: i32) -> DomainResult<()> {
        self.store.delete_facility(facility_id).await?;
        info!(facility_id, "Facility deleted");
        Ok(())
    }

    pub async fn list_spots(&self, facility_id: i32) -> DomainResult<Vec<Spot>> {
        self.store.list_spots(facility_id).await
    }

    pub async fn active_reservation_for_spot(
        &self,
        spot_id: i32,
    ) -> DomainResult<Option<Reservation>> {
        self.store.active_reservation_for_spot(spot_id).await
    }

    /// Reserve an Available spot in the facility for a customer.
    ///
    /// Allocation is deterministic: the lowest-id Available spot wins.
    /// The spot flip and the reservation insert are one atomic unit in
    /// the store, and the flip is conditional on the spot still being
    /// Available, so two concurrent reserves never share a spot.
    pub async fn reserve(
        &self,
        facility_id: i32,
        draft: ReservationDraft,
    ) -> DomainResult<Reservation> {
        if draft.vehicle_number.trim().is_empty() {
            return Err(DomainError::Validation(
                "vehicle_number must not be empty".to_string(),
            ));
        }
        let now = Utc::now();
        if let Some(expected) = draft.expected_end_at {
            if expected <= now {
                return Err(DomainError::Validation(
                    "expected_end_at must be in the future".to_string(),
                ));
            }
        }

        let reservation = self.store.claim_spot(facility_id, draft, now).await?;
        info!(
            facility_id,
            spot_id = ?reservation.spot_id,
            reservation_id = reservation.id,
            customer_id = reservation.customer_id,
            "Spot reserved"
        );
        Ok(reservation)
    }

    /// Release an occupied spot, computing the charge for the elapsed
    /// wall-clock time at the facility's hourly rate.
    ///
    /// A second release of the same spot fails with `SpotNotOccupied`;
    /// a reservation is billed exactly once.
    pub async fn release(&self, spot_id: i32, payment_method: &str) -> DomainResult<Reservation> {
        if payment_method.trim().is_empty() {
            return Err(DomainError::Validation(
                "payment_method must not be empty".to_string(),
            ));
        }

        let reservation = self
            .store
            .settle_spot(spot_id, payment_method, Utc::now())
            .await?;
        info!(
            spot_id,
            reservation_id = reservation.id,
            cost = %reservation.cost.unwrap_or_default(),
            payment_method,
            "Spot released"
        );
        Ok(reservation)
    }

    /// Estimate the charge for the spot's active reservation as of
    /// `now`, without releasing it.
    pub async fn estimate_charge(
        &self,
        spot_id: i32,
        now: DateTime<Utc>,
    ) -> DomainResult<Decimal> {
        let spot = self
            .store
            .get_spot(spot_id)
            .await?
            .ok_or(DomainError::SpotNotFound(spot_id))?;
        let reservation = self
            .store
            .active_reservation_for_spot(spot_id)
            .await?
            .ok_or(DomainError::SpotNotOccupied(spot_id))?;
        let facility = self.get_facility(spot.facility_id).await?;

        Ok(crate::domain::billing::parking_fee(
            reservation.started_at,
            now,
            facility.hourly_rate,
        ))
    }

    pub async fn get_reservation(&self, id: i32) -> DomainResult<Reservation> {
        self.store
            .get_reservation(id)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "Reservation",
                field: "id",
                value: id.to_string(),
            })
    }

    pub async fn list_reservations(&self) -> DomainResult<Vec<Reservation>> {
        self.store.list_reservations().await
    }

    pub async fn list_reservations_for_customer(
        &self,
        customer_id: i32,
    ) -> DomainResult<Vec<Reservation>> {
        self.store.list_reservations_for_customer(customer_id).await
    }
}

fn validate_rate(rate: Decimal) -> DomainResult<()> {
    if rate.is_sign_negative() {
        return Err(DomainError::Validation(
            "hourly_rate must not be negative".to_string(),
        ));
    }
    Ok(())
}

fn validate_capacity(capacity: u32) -> DomainResult<()> {
    if capacity > MAX_CAPACITY {
        return Err(DomainError::Validation(format!(
            "capacity must not exceed {}",
            MAX_CAPACITY
        )));
    }
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OccupancyStatus, PaymentStatus, SpotStatus};
    use crate::infrastructure::storage::InMemoryParkingStore;
    use rust_decimal_macros::dec;

    fn service() -> AllocationService {
        AllocationService::new(Arc::new(InMemoryParkingStore::new()))
    }

    fn lot(capacity: u32, rate: Decimal) -> NewFacility {
        NewFacility {
            name: "Central Garage".to_string(),
            hourly_rate: rate,
            address: "1 Main St".to_string(),
            postal_code: "560001".to_string(),
            capacity,
        }
    }

    fn draft(customer_id: i32) -> ReservationDraft {
        ReservationDraft {
            customer_id,
            vehicle_number: "KA-01-AB-1234".to_string(),
            expected_end_at: None,
        }
    }

    #[tokio::test]
    async fn create_facility_provisions_spots() {
        let svc = service();
        let facility = svc.create_facility(lot(3, dec!(10))).await.unwrap();

        let spots = svc.list_spots(facility.id).await.unwrap();
        assert_eq!(spots.len(), 3);
        assert!(spots.iter().all(|s| s.status == SpotStatus::Available));
    }

    #[tokio::test]
    async fn reserve_takes_lowest_available_spot() {
        let svc = service();
        let facility = svc.create_facility(lot(3, dec!(10))).await.unwrap();
        let spots = svc.list_spots(facility.id).await.unwrap();

        let r = svc.reserve(facility.id, draft(1)).await.unwrap();
        assert_eq!(r.spot_id, Some(spots[0].id));
        assert!(r.is_active());
        assert_eq!(r.cost, None);
        assert_eq!(r.payment_status, PaymentStatus::Pending);
    }

    #[tokio::test]
    async fn occupied_never_exceeds_capacity() {
        let svc = service();
        let facility = svc.create_facility(lot(2, dec!(10))).await.unwrap();

        svc.reserve(facility.id, draft(1)).await.unwrap();
        svc.reserve(facility.id, draft(2)).await.unwrap();
        let third = svc.reserve(facility.id, draft(3)).await;
        assert!(matches!(third, Err(DomainError::NoAvailableSpot(_))));

        let occupied = svc
            .list_spots(facility.id)
            .await
            .unwrap()
            .iter()
            .filter(|s| s.status == SpotStatus::Occupied)
            .count();
        assert_eq!(occupied, 2);
    }

    #[tokio::test]
    async fn reserve_on_unknown_facility_fails() {
        let svc = service();
        let result = svc.reserve(999, draft(1)).await;
        assert!(matches!(result, Err(DomainError::FacilityNotFound(999))));
    }

    #[tokio::test]
    async fn reserve_then_release_bills_and_frees() {
        let svc = service();
        let facility = svc.create_facility(lot(1, dec!(10))).await.unwrap();

        let r = svc.reserve(facility.id, draft(1)).await.unwrap();
        let spot_id = r.spot_id.unwrap();

        let settled = svc.release(spot_id, "Cash").await.unwrap();
        assert_eq!(settled.occupancy, OccupancyStatus::Released);
        assert_eq!(settled.payment_status, PaymentStatus::Paid);
        assert!(settled.cost.unwrap() >= dec!(0));
        assert_eq!(settled.payment_method.as_deref(), Some("Cash"));

        let spot = svc.list_spots(facility.id).await.unwrap().remove(0);
        assert_eq!(spot.status, SpotStatus::Available);
    }

    #[tokio::test]
    async fn double_release_fails() {
        let svc = service();
        let facility = svc.create_facility(lot(1, dec!(10))).await.unwrap();
        let r = svc.reserve(facility.id, draft(1)).await.unwrap();
        let spot_id = r.spot_id.unwrap();

        svc.release(spot_id, "Cash").await.unwrap();
        let again = svc.release(spot_id, "Cash").await;
        assert!(matches!(again, Err(DomainError::SpotNotOccupied(_))));
    }

    #[tokio::test]
    async fn release_unknown_spot_fails() {
        let svc = service();
        let result = svc.release(12345, "Cash").await;
        assert!(matches!(result, Err(DomainError::SpotNotFound(12345))));
    }

    #[tokio::test]
    async fn concurrent_reserves_share_nothing() {
        let svc = Arc::new(service());
        let facility = svc.create_facility(lot(1, dec!(10))).await.unwrap();

        let a = {
            let svc = svc.clone();
            let id = facility.id;
            tokio::spawn(async move { svc.reserve(id, draft(1)).await })
        };
        let b = {
            let svc = svc.clone();
            let id = facility.id;
            tokio::spawn(async move { svc.reserve(id, draft(2)).await })
        };

        let results = [a.await.unwrap(), b.await.unwrap()];
        let wins = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(wins, 1);
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(DomainError::NoAvailableSpot(_)))));
    }

    #[tokio::test]
    async fn resize_grows_with_available_spots() {
        let svc = service();
        let facility = svc.create_facility(lot(2, dec!(10))).await.unwrap();

        svc.resize_capacity(facility.id, 5).await.unwrap();

        let spots = svc.list_spots(facility.id).await.unwrap();
        assert_eq!(spots.len(), 5);
        assert_eq!(svc.get_facility(facility.id).await.unwrap().capacity, 5);
    }

    #[tokio::test]
    async fn resize_below_occupancy_changes_nothing() {
        let svc = service();
        let facility = svc.create_facility(lot(3, dec!(10))).await.unwrap();
        svc.reserve(facility.id, draft(1)).await.unwrap();
        svc.reserve(facility.id, draft(2)).await.unwrap();

        let result = svc.resize_capacity(facility.id, 1).await;
        assert!(matches!(
            result,
            Err(DomainError::CapacityBelowOccupancy {
                requested: 1,
                occupied: 2
            })
        ));

        assert_eq!(svc.list_spots(facility.id).await.unwrap().len(), 3);
        assert_eq!(svc.get_facility(facility.id).await.unwrap().capacity, 3);
    }

    #[tokio::test]
    async fn resize_shrink_never_touches_occupied() {
        let svc = service();
        let facility = svc.create_facility(lot(3, dec!(10))).await.unwrap();
        let r = svc.reserve(facility.id, draft(1)).await.unwrap();

        svc.resize_capacity(facility.id, 1).await.unwrap();

        let spots = svc.list_spots(facility.id).await.unwrap();
        assert_eq!(spots.len(), 1);
        assert_eq!(Some(spots[0].id), r.spot_id);
        assert_eq!(spots[0].status, SpotStatus::Occupied);
    }

    #[tokio::test]
    async fn resize_shrink_keeps_released_history_without_spot_reference() {
        let svc = service();
        let facility = svc.create_facility(lot(1, dec!(10))).await.unwrap();
        let r = svc.reserve(facility.id, draft(1)).await.unwrap();
        svc.release(r.spot_id.unwrap(), "Cash").await.unwrap();

        svc.resize_capacity(facility.id, 0).await.unwrap();

        assert!(svc.list_spots(facility.id).await.unwrap().is_empty());
        let history = svc.list_reservations_for_customer(1).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].spot_id, None);
        assert_eq!(history[0].occupancy, OccupancyStatus::Released);
    }

    #[tokio::test]
    async fn update_facility_applies_details_and_capacity_together() {
        let svc = service();
        let facility = svc.create_facility(lot(2, dec!(10))).await.unwrap();

        let updated = svc
            .update_facility(
                facility.id,
                FacilityDetails {
                    name: "East Garage".to_string(),
                    hourly_rate: dec!(12),
                    address: "2 Side St".to_string(),
                    postal_code: "560002".to_string(),
                },
                Some(4),
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "East Garage");
        assert_eq!(updated.capacity, 4);
        assert_eq!(svc.list_spots(facility.id).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn update_facility_refused_shrink_leaves_details_untouched() {
        let svc = service();
        let facility = svc.create_facility(lot(2, dec!(10))).await.unwrap();
        svc.reserve(facility.id, draft(1)).await.unwrap();

        let result = svc
            .update_facility(
                facility.id,
                FacilityDetails {
                    name: "Renamed".to_string(),
                    hourly_rate: dec!(99),
                    address: "9 Other St".to_string(),
                    postal_code: "560009".to_string(),
                },
                Some(0),
            )
            .await;
        assert!(matches!(
            result,
            Err(DomainError::CapacityBelowOccupancy { .. })
        ));

        let unchanged = svc.get_facility(facility.id).await.unwrap();
        assert_eq!(unchanged.name, "Central Garage");
        assert_eq!(unchanged.hourly_rate, dec!(10));
        assert_eq!(unchanged.capacity, 2);
        assert_eq!(svc.list_spots(facility.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn resize_to_same_capacity_is_noop() {
        let svc = service();
        let facility = svc.create_facility(lot(2, dec!(10))).await.unwrap();
        svc.resize_capacity(facility.id, 2).await.unwrap();
        assert_eq!(svc.list_spots(facility.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn delete_vacant_facility_removes_spots() {
        let svc = service();
        let facility = svc.create_facility(lot(2, dec!(10))).await.unwrap();

        svc.delete_facility(facility.id).await.unwrap();

        let result = svc.get_facility(facility.id).await;
        assert!(matches!(result, Err(DomainError::FacilityNotFound(_))));
    }

    #[tokio::test]
    async fn delete_facility_with_occupied_spot_changes_nothing() {
        let svc = service();
        let facility = svc.create_facility(lot(2, dec!(10))).await.unwrap();
        svc.reserve(facility.id, draft(1)).await.unwrap();

        let result = svc.delete_facility(facility.id).await;
        assert!(matches!(
            result,
            Err(DomainError::FacilityHasOccupiedSpots { occupied: 1, .. })
        ));
        assert_eq!(svc.list_spots(facility.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn delete_facility_keeps_released_history() {
        let svc = service();
        let facility = svc.create_facility(lot(1, dec!(10))).await.unwrap();
        let r = svc.reserve(facility.id, draft(1)).await.unwrap();
        svc.release(r.spot_id.unwrap(), "UPI").await.unwrap();

        svc.delete_facility(facility.id).await.unwrap();

        let history = svc.list_reservations_for_customer(1).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].spot_id, None);
        assert_eq!(history[0].occupancy, OccupancyStatus::Released);
        assert!(history[0].cost.is_some());
    }

    #[tokio::test]
    async fn reserve_rejects_blank_vehicle_number() {
        let svc = service();
        let facility = svc.create_facility(lot(1, dec!(10))).await.unwrap();

        let result = svc
            .reserve(
                facility.id,
                ReservationDraft {
                    customer_id: 1,
                    vehicle_number: "  ".to_string(),
                    expected_end_at: None,
                },
            )
            .await;
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn negative_rate_is_rejected() {
        let svc = service();
        let result = svc.create_facility(lot(1, dec!(-5))).await;
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn estimate_charge_accrues_without_releasing() {
        let svc = service();
        let facility = svc.create_facility(lot(1, dec!(15))).await.unwrap();
        let r = svc.reserve(facility.id, draft(1)).await.unwrap();
        let spot_id = r.spot_id.unwrap();

        let estimate = svc
            .estimate_charge(spot_id, r.started_at + chrono::Duration::minutes(90))
            .await
            .unwrap();
        assert_eq!(estimate, dec!(22.50));

        // The reservation stays open and unbilled.
        let active = svc
            .active_reservation_for_spot(spot_id)
            .await
            .unwrap()
            .unwrap();
        assert!(active.is_active());
        assert_eq!(active.cost, None);
    }

    #[tokio::test]
    async fn availability_counts_follow_reservations() {
        let svc = service();
        let facility = svc.create_facility(lot(3, dec!(10))).await.unwrap();
        svc.reserve(facility.id, draft(1)).await.unwrap();

        let listed = svc.list_facilities().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].occupied, 1);
        assert_eq!(listed[0].available(), 2);
    }
}
