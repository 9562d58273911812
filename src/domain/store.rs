//! Persistence port for the parking engine.
//!
//! Every method that mutates more than one row executes as a single
//! atomic unit in the backing store: an observer never sees a spot
//! marked Occupied without its matching reservation, or a half-applied
//! resize. Implementations back this with a database transaction
//! ([`crate::infrastructure::database::SeaOrmParkingStore`]) or a lock
//! ([`crate::infrastructure::storage::InMemoryParkingStore`]).

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::customer::{Customer, NewCustomer, ProfileUpdate};
use super::facility::{Facility, FacilityDetails, FacilityOccupancy, NewFacility};
use super::reservation::{Reservation, ReservationDraft};
use super::spot::Spot;
use super::DomainResult;

/// Storage trait for facilities, spots, customers and reservations.
#[async_trait]
pub trait ParkingStore: Send + Sync {
    // Facility operations
    /// Insert a facility and provision `capacity` Available spots for it.
    async fn create_facility(&self, new: NewFacility) -> DomainResult<Facility>;
    async fn get_facility(&self, id: i32) -> DomainResult<Option<Facility>>;
    /// Update name/rate/address and, when `new_capacity` is given,
    /// resize the spot set in the same atomic unit. A refused shrink
    /// leaves the details untouched too.
    async fn update_facility(
        &self,
        id: i32,
        details: FacilityDetails,
        new_capacity: Option<u32>,
    ) -> DomainResult<Facility>;
    /// All facilities with their current occupied-spot counts.
    async fn list_facilities(&self) -> DomainResult<Vec<FacilityOccupancy>>;
    /// Grow or shrink the spot set. Shrinking deletes only Available
    /// spots and fails with `CapacityBelowOccupancy` (no change) when
    /// the target is below the occupied count. Released history
    /// referencing a deleted spot keeps its row with a nulled spot
    /// reference.
    async fn resize_facility(&self, id: i32, new_capacity: u32) -> DomainResult<()>;
    /// Delete a facility and its spots. Fails with
    /// `FacilityHasOccupiedSpots` (no change) while any spot is
    /// Occupied. Released reservation history survives with a nulled
    /// spot reference.
    async fn delete_facility(&self, id: i32) -> DomainResult<()>;

    // Spot operations
    async fn get_spot(&self, id: i32) -> DomainResult<Option<Spot>>;
    async fn list_spots(&self, facility_id: i32) -> DomainResult<Vec<Spot>>;
    async fn active_reservation_for_spot(&self, spot_id: i32)
        -> DomainResult<Option<Reservation>>;

    // Engine primitives
    /// Claim the lowest-id Available spot of the facility and open a
    /// reservation on it, atomically. The spot flip is a conditional
    /// update keyed on `status = Available`, so at most one of two
    /// concurrent claims on the same spot wins.
    async fn claim_spot(
        &self,
        facility_id: i32,
        draft: ReservationDraft,
        now: DateTime<Utc>,
    ) -> DomainResult<Reservation>;
    /// Close the spot's active reservation (cost, payment, timestamps)
    /// and free the spot, atomically. The close is keyed on
    /// `occupancy = Occupied`, so a second release fails with
    /// `SpotNotOccupied` instead of rebilling.
    async fn settle_spot(
        &self,
        spot_id: i32,
        payment_method: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<Reservation>;

    // Customer operations
    /// Insert a customer. Fails with `Conflict` when the email is taken.
    async fn insert_customer(&self, new: NewCustomer) -> DomainResult<Customer>;
    async fn find_customer(&self, id: i32) -> DomainResult<Option<Customer>>;
    async fn find_customer_by_email(&self, email: &str) -> DomainResult<Option<Customer>>;
    async fn update_customer_profile(
        &self,
        id: i32,
        update: ProfileUpdate,
    ) -> DomainResult<Customer>;
    async fn update_customer_password(&self, id: i32, password_hash: &str) -> DomainResult<()>;
    async fn list_customers(&self) -> DomainResult<Vec<Customer>>;
    /// Delete a customer and their reservations, freeing any spot they
    /// still occupy.
    async fn delete_customer(&self, id: i32) -> DomainResult<()>;
    async fn count_admins(&self) -> DomainResult<u64>;

    // Reservation queries
    async fn get_reservation(&self, id: i32) -> DomainResult<Option<Reservation>>;
    async fn list_reservations(&self) -> DomainResult<Vec<Reservation>>;
    async fn list_reservations_for_customer(
        &self,
        customer_id: i32,
    ) -> DomainResult<Vec<Reservation>>;
}
