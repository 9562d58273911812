//! In-memory storage implementation for development and testing.
//!
//! All state lives behind one mutex, so every [`ParkingStore`] method is
//! atomic exactly like its SQL counterpart: the spot claim and its
//! reservation appear together or not at all.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::customer::{Customer, CustomerRole, NewCustomer, ProfileUpdate};
use crate::domain::facility::{Facility, FacilityDetails, FacilityOccupancy, NewFacility};
use crate::domain::reservation::{Reservation, ReservationDraft};
use crate::domain::spot::{Spot, SpotStatus};
use crate::domain::{DomainError, DomainResult, ParkingStore};

#[derive(Default)]
struct Inner {
    facilities: BTreeMap<i32, Facility>,
    spots: BTreeMap<i32, Spot>,
    reservations: BTreeMap<i32, Reservation>,
    customers: BTreeMap<i32, Customer>,
    next_facility_id: i32,
    next_spot_id: i32,
    next_reservation_id: i32,
    next_customer_id: i32,
}

impl Inner {
    fn new() -> Self {
        Self {
            next_facility_id: 1,
            next_spot_id: 1,
            next_reservation_id: 1,
            next_customer_id: 1,
            ..Self::default()
        }
    }

    fn occupied_count(&self, facility_id: i32) -> u32 {
        self.spots
            .values()
            .filter(|s| s.facility_id == facility_id && s.status == SpotStatus::Occupied)
            .count() as u32
    }

    fn add_spot(&mut self, facility_id: i32, now: DateTime<Utc>) {
        let id = self.next_spot_id;
        self.next_spot_id += 1;
        self.spots.insert(
            id,
            Spot {
                id,
                facility_id,
                status: SpotStatus::Available,
                updated_at: now,
            },
        );
    }

    /// Grow or shrink the spot set to `new_capacity`. Shrinking refuses
    /// below the occupied count, deletes only Available spots and nulls
    /// history references to them, like the SQL FK does.
    fn resize_spots(
        &mut self,
        facility_id: i32,
        current: u32,
        new_capacity: u32,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        if new_capacity == current {
            return Ok(());
        }

        if new_capacity > current {
            for _ in 0..(new_capacity - current) {
                self.add_spot(facility_id, now);
            }
            return Ok(());
        }

        let occupied = self.occupied_count(facility_id);
        if new_capacity < occupied {
            return Err(DomainError::CapacityBelowOccupancy {
                requested: new_capacity,
                occupied,
            });
        }

        let surplus: Vec<i32> = self
            .spots
            .values()
            .filter(|s| s.facility_id == facility_id && s.status == SpotStatus::Available)
            .rev()
            .take((current - new_capacity) as usize)
            .map(|s| s.id)
            .collect();
        for spot_id in &surplus {
            self.spots.remove(spot_id);
        }
        // Retained history loses its spot reference, like ON DELETE SET NULL.
        for reservation in self.reservations.values_mut() {
            if let Some(spot_id) = reservation.spot_id {
                if surplus.contains(&spot_id) {
                    reservation.spot_id = None;
                }
            }
        }
        Ok(())
    }
}

/// In-memory [`ParkingStore`] backend.
pub struct InMemoryParkingStore {
    inner: Mutex<Inner>,
}

impl InMemoryParkingStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::new()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // Lock poisoning only happens if a holder panicked; the data is
        // still consistent for tests, so recover the guard.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for InMemoryParkingStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ParkingStore for InMemoryParkingStore {
    async fn create_facility(&self, new: NewFacility) -> DomainResult<Facility> {
        let mut inner = self.lock();
        let now = Utc::now();
        let id = inner.next_facility_id;
        inner.next_facility_id += 1;

        let facility = Facility {
            id,
            name: new.name,
            hourly_rate: new.hourly_rate,
            address: new.address,
            postal_code: new.postal_code,
            capacity: new.capacity,
            created_at: now,
            updated_at: now,
        };
        inner.facilities.insert(id, facility.clone());
        for _ in 0..new.capacity {
            inner.add_spot(id, now);
        }
        Ok(facility)
    }

    async fn get_facility(&self, id: i32) -> DomainResult<Option<Facility>> {
        Ok(self.lock().facilities.get(&id).cloned())
    }

    async fn update_facility(
        &self,
        id: i32,
        details: FacilityDetails,
        new_capacity: Option<u32>,
    ) -> DomainResult<Facility> {
        let mut inner = self.lock();
        let current = inner
            .facilities
            .get(&id)
            .ok_or(DomainError::FacilityNotFound(id))?
            .capacity;
        let now = Utc::now();

        // Resize before touching details: a refused shrink must leave
        // the facility entirely unchanged.
        if let Some(capacity) = new_capacity {
            inner.resize_spots(id, current, capacity, now)?;
        }

        let facility = inner
            .facilities
            .get_mut(&id)
            .ok_or(DomainError::FacilityNotFound(id))?;
        facility.name = details.name;
        facility.hourly_rate = details.hourly_rate;
        facility.address = details.address;
        facility.postal_code = details.postal_code;
        if let Some(capacity) = new_capacity {
            facility.capacity = capacity;
        }
        facility.updated_at = now;
        Ok(facility.clone())
    }

    async fn list_facilities(&self) -> DomainResult<Vec<FacilityOccupancy>> {
        let inner = self.lock();
        Ok(inner
            .facilities
            .values()
            .map(|f| FacilityOccupancy {
                facility: f.clone(),
                occupied: inner.occupied_count(f.id),
            })
            .collect())
    }

    async fn resize_facility(&self, id: i32, new_capacity: u32) -> DomainResult<()> {
        let mut inner = self.lock();
        let current = inner
            .facilities
            .get(&id)
            .ok_or(DomainError::FacilityNotFound(id))?
            .capacity;

        if new_capacity == current {
            return Ok(());
        }

        let now = Utc::now();
        inner.resize_spots(id, current, new_capacity, now)?;

        if let Some(facility) = inner.facilities.get_mut(&id) {
            facility.capacity = new_capacity;
            facility.updated_at = now;
        }
        Ok(())
    }

    async fn delete_facility(&self, id: i32) -> DomainResult<()> {
        let mut inner = self.lock();
        if !inner.facilities.contains_key(&id) {
            return Err(DomainError::FacilityNotFound(id));
        }
        let occupied = inner.occupied_count(id);
        if occupied > 0 {
            return Err(DomainError::FacilityHasOccupiedSpots {
                facility_id: id,
                occupied,
            });
        }

        let doomed: Vec<i32> = inner
            .spots
            .values()
            .filter(|s| s.facility_id == id)
            .map(|s| s.id)
            .collect();
        for spot_id in &doomed {
            inner.spots.remove(spot_id);
        }
        // Retained history loses its spot reference, like ON DELETE SET NULL.
        for reservation in inner.reservations.values_mut() {
            if let Some(spot_id) = reservation.spot_id {
                if doomed.contains(&spot_id) {
                    reservation.spot_id = None;
                }
            }
        }
        inner.facilities.remove(&id);
        Ok(())
    }

    async fn get_spot(&self, id: i32) -> DomainResult<Option<Spot>> {
        Ok(self.lock().spots.get(&id).cloned())
    }

    async fn list_spots(&self, facility_id: i32) -> DomainResult<Vec<Spot>> {
        let inner = self.lock();
        if !inner.facilities.contains_key(&facility_id) {
            return Err(DomainError::FacilityNotFound(facility_id));
        }
        Ok(inner
            .spots
            .values()
            .filter(|s| s.facility_id == facility_id)
            .cloned()
            .collect())
    }

    async fn active_reservation_for_spot(
        &self,
        spot_id: i32,
    ) -> DomainResult<Option<Reservation>> {
        Ok(self
            .lock()
            .reservations
            .values()
            .find(|r| r.spot_id == Some(spot_id) && r.is_active())
            .cloned())
    }

    async fn claim_spot(
        &self,
        facility_id: i32,
        draft: ReservationDraft,
        now: DateTime<Utc>,
    ) -> DomainResult<Reservation> {
        let mut inner = self.lock();
        if !inner.facilities.contains_key(&facility_id) {
            return Err(DomainError::FacilityNotFound(facility_id));
        }

        // BTreeMap iteration order gives the lowest-id spot first.
        let spot_id = inner
            .spots
            .values()
            .find(|s| s.facility_id == facility_id && s.status == SpotStatus::Available)
            .map(|s| s.id)
            .ok_or(DomainError::NoAvailableSpot(facility_id))?;

        if let Some(spot) = inner.spots.get_mut(&spot_id) {
            spot.status = SpotStatus::Occupied;
            spot.updated_at = now;
        }

        let id = inner.next_reservation_id;
        inner.next_reservation_id += 1;
        let reservation = Reservation::open(id, spot_id, draft, now);
        inner.reservations.insert(id, reservation.clone());
        Ok(reservation)
    }

    async fn settle_spot(
        &self,
        spot_id: i32,
        payment_method: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<Reservation> {
        let mut inner = self.lock();
        let spot = inner
            .spots
            .get(&spot_id)
            .cloned()
            .ok_or(DomainError::SpotNotFound(spot_id))?;

        let hourly_rate = inner
            .facilities
            .get(&spot.facility_id)
            .ok_or_else(|| {
                DomainError::Persistence(format!(
                    "spot {} references missing facility {}",
                    spot_id, spot.facility_id
                ))
            })?
            .hourly_rate;

        let reservation_id = inner
            .reservations
            .values()
            .find(|r| r.spot_id == Some(spot_id) && r.is_active())
            .map(|r| r.id)
            .ok_or(DomainError::SpotNotOccupied(spot_id))?;

        let settled = {
            let reservation = inner
                .reservations
                .get_mut(&reservation_id)
                .ok_or(DomainError::SpotNotOccupied(spot_id))?;
            reservation.settle(now, hourly_rate, payment_method);
            reservation.clone()
        };

        if let Some(spot) = inner.spots.get_mut(&spot_id) {
            spot.status = SpotStatus::Available;
            spot.updated_at = now;
        }
        Ok(settled)
    }

    async fn insert_customer(&self, new: NewCustomer) -> DomainResult<Customer> {
        let mut inner = self.lock();
        if inner.customers.values().any(|c| c.email == new.email) {
            return Err(DomainError::Conflict(format!(
                "email already registered: {}",
                new.email
            )));
        }

        let id = inner.next_customer_id;
        inner.next_customer_id += 1;
        let customer = Customer {
            id,
            email: new.email,
            password_hash: new.password_hash,
            name: new.name,
            address: new.address,
            postal_code: new.postal_code,
            role: new.role,
            created_at: Utc::now(),
        };
        inner.customers.insert(id, customer.clone());
        Ok(customer)
    }

    async fn find_customer(&self, id: i32) -> DomainResult<Option<Customer>> {
        Ok(self.lock().customers.get(&id).cloned())
    }

    async fn find_customer_by_email(&self, email: &str) -> DomainResult<Option<Customer>> {
        Ok(self
            .lock()
            .customers
            .values()
            .find(|c| c.email == email)
            .cloned())
    }

    async fn update_customer_profile(
        &self,
        id: i32,
        update: ProfileUpdate,
    ) -> DomainResult<Customer> {
        let mut inner = self.lock();
        let customer = inner
            .customers
            .get_mut(&id)
            .ok_or(DomainError::NotFound {
                entity: "Customer",
                field: "id",
                value: id.to_string(),
            })?;
        customer.name = update.name;
        customer.address = update.address;
        customer.postal_code = update.postal_code;
        Ok(customer.clone())
    }

    async fn update_customer_password(&self, id: i32, password_hash: &str) -> DomainResult<()> {
        let mut inner = self.lock();
        let customer = inner
            .customers
            .get_mut(&id)
            .ok_or(DomainError::NotFound {
                entity: "Customer",
                field: "id",
                value: id.to_string(),
            })?;
        customer.password_hash = password_hash.to_string();
        Ok(())
    }

    async fn list_customers(&self) -> DomainResult<Vec<Customer>> {
        Ok(self.lock().customers.values().cloned().collect())
    }

    async fn delete_customer(&self, id: i32) -> DomainResult<()> {
        let mut inner = self.lock();
        if !inner.customers.contains_key(&id) {
            return Err(DomainError::NotFound {
                entity: "Customer",
                field: "id",
                value: id.to_string(),
            });
        }

        let freed: Vec<i32> = inner
            .reservations
            .values()
            .filter(|r| r.customer_id == id && r.is_active())
            .filter_map(|r| r.spot_id)
            .collect();
        let now = Utc::now();
        for spot_id in freed {
            if let Some(spot) = inner.spots.get_mut(&spot_id) {
                spot.status = SpotStatus::Available;
                spot.updated_at = now;
            }
        }

        inner.reservations.retain(|_, r| r.customer_id != id);
        inner.customers.remove(&id);
        Ok(())
    }

    async fn count_admins(&self) -> DomainResult<u64> {
        Ok(self
            .lock()
            .customers
            .values()
            .filter(|c| c.role == CustomerRole::Admin)
            .count() as u64)
    }

    async fn get_reservation(&self, id: i32) -> DomainResult<Option<Reservation>> {
        Ok(self.lock().reservations.get(&id).cloned())
    }

    async fn list_reservations(&self) -> DomainResult<Vec<Reservation>> {
        let mut all: Vec<Reservation> = self.lock().reservations.values().cloned().collect();
        all.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        Ok(all)
    }

    async fn list_reservations_for_customer(
        &self,
        customer_id: i32,
    ) -> DomainResult<Vec<Reservation>> {
        let mut mine: Vec<Reservation> = self
            .lock()
            .reservations
            .values()
            .filter(|r| r.customer_id == customer_id)
            .cloned()
            .collect();
        mine.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        Ok(mine)
    }
}
