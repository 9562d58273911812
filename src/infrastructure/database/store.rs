//! SeaORM implementation of the [`ParkingStore`] port.
//!
//! Every multi-row mutation runs inside one SQLite transaction. Spot
//! claims and releases are conditional updates keyed on the current
//! status, so concurrent callers cannot double-book or double-bill a
//! spot.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, NotSet,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::debug;

use crate::domain::customer::{Customer, CustomerRole, NewCustomer, ProfileUpdate};
use crate::domain::facility::{Facility, FacilityDetails, FacilityOccupancy, NewFacility};
use crate::domain::reservation::{OccupancyStatus, PaymentStatus, Reservation, ReservationDraft};
use crate::domain::spot::{Spot, SpotStatus};
use crate::domain::{DomainError, DomainResult, ParkingStore};
use crate::infrastructure::database::entities::{customer, facility, reservation, spot};

pub struct SeaOrmParkingStore {
    db: DatabaseConnection,
}

impl SeaOrmParkingStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn facility_to_domain(m: facility::Model) -> Facility {
    Facility {
        id: m.id,
        name: m.name,
        hourly_rate: m.hourly_rate,
        address: m.address,
        postal_code: m.postal_code,
        capacity: m.capacity.max(0) as u32,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn spot_to_domain(m: spot::Model) -> Spot {
    Spot {
        id: m.id,
        facility_id: m.facility_id,
        status: SpotStatus::from_str(&m.status),
        updated_at: m.updated_at,
    }
}

fn reservation_to_domain(m: reservation::Model) -> Reservation {
    Reservation {
        id: m.id,
        spot_id: m.spot_id,
        customer_id: m.customer_id,
        vehicle_number: m.vehicle_number,
        started_at: m.started_at,
        expected_end_at: m.expected_end_at,
        ended_at: m.ended_at,
        cost: m.cost,
        payment_status: PaymentStatus::from_str(&m.payment_status),
        payment_method: m.payment_method,
        paid_at: m.paid_at,
        occupancy: OccupancyStatus::from_str(&m.occupancy),
    }
}

fn customer_to_domain(m: customer::Model) -> Customer {
    Customer {
        id: m.id,
        email: m.email,
        password_hash: m.password_hash,
        name: m.name,
        address: m.address,
        postal_code: m.postal_code,
        role: CustomerRole::from_str(&m.role),
        created_at: m.created_at,
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Persistence(e.to_string())
}

/// Insert `count` Available spots for a facility.
async fn provision_spots<C: ConnectionTrait>(
    conn: &C,
    facility_id: i32,
    count: u32,
    now: DateTime<Utc>,
) -> Result<(), sea_orm::DbErr> {
    if count == 0 {
        return Ok(());
    }
    let rows = (0..count).map(|_| spot::ActiveModel {
        id: NotSet,
        facility_id: Set(facility_id),
        status: Set(SpotStatus::Available.as_str().to_string()),
        updated_at: Set(now),
    });
    spot::Entity::insert_many(rows).exec(conn).await?;
    Ok(())
}

/// Grow or shrink a facility's spot rows to `new_capacity`. Shrinking
/// refuses below the occupied count and deletes only Available spots;
/// history rows referencing them are nulled by the FK. Does not touch
/// the facility row itself.
async fn apply_resize<C: ConnectionTrait>(
    conn: &C,
    facility_id: i32,
    current: u32,
    new_capacity: u32,
    now: DateTime<Utc>,
) -> DomainResult<()> {
    if new_capacity == current {
        return Ok(());
    }

    if new_capacity > current {
        return provision_spots(conn, facility_id, new_capacity - current, now)
            .await
            .map_err(db_err);
    }

    let occupied = occupied_count(conn, facility_id).await.map_err(db_err)? as u32;
    if new_capacity < occupied {
        return Err(DomainError::CapacityBelowOccupancy {
            requested: new_capacity,
            occupied,
        });
    }

    let surplus: Vec<i32> = spot::Entity::find()
        .filter(spot::Column::FacilityId.eq(facility_id))
        .filter(spot::Column::Status.eq(SpotStatus::Available.as_str()))
        .order_by_desc(spot::Column::Id)
        .limit(u64::from(current - new_capacity))
        .all(conn)
        .await
        .map_err(db_err)?
        .into_iter()
        .map(|s| s.id)
        .collect();

    spot::Entity::delete_many()
        .filter(spot::Column::Id.is_in(surplus))
        .exec(conn)
        .await
        .map_err(db_err)?;
    Ok(())
}

async fn occupied_count<C: ConnectionTrait>(
    conn: &C,
    facility_id: i32,
) -> Result<u64, sea_orm::DbErr> {
    spot::Entity::find()
        .filter(spot::Column::FacilityId.eq(facility_id))
        .filter(spot::Column::Status.eq(SpotStatus::Occupied.as_str()))
        .count(conn)
        .await
}

// ── ParkingStore impl ───────────────────────────────────────────

#[async_trait]
impl ParkingStore for SeaOrmParkingStore {
    async fn create_facility(&self, new: NewFacility) -> DomainResult<Facility> {
        debug!(name = %new.name, capacity = new.capacity, "Creating facility");
        let now = Utc::now();

        let txn = self.db.begin().await.map_err(db_err)?;

        let model = facility::ActiveModel {
            id: NotSet,
            name: Set(new.name),
            hourly_rate: Set(new.hourly_rate),
            address: Set(new.address),
            postal_code: Set(new.postal_code),
            capacity: Set(new.capacity as i32),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let inserted = model.insert(&txn).await.map_err(db_err)?;
        provision_spots(&txn, inserted.id, new.capacity, now)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok(facility_to_domain(inserted))
    }

    async fn get_facility(&self, id: i32) -> DomainResult<Option<Facility>> {
        let model = facility::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(facility_to_domain))
    }

    async fn update_facility(
        &self,
        id: i32,
        details: FacilityDetails,
        new_capacity: Option<u32>,
    ) -> DomainResult<Facility> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let existing = facility::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(DomainError::FacilityNotFound(id))?;
        let current = existing.capacity.max(0) as u32;
        let now = Utc::now();

        // Same transaction as the detail update: a refused shrink rolls
        // everything back.
        if let Some(capacity) = new_capacity {
            apply_resize(&txn, id, current, capacity, now).await?;
        }

        let mut active: facility::ActiveModel = existing.into();
        active.name = Set(details.name);
        active.hourly_rate = Set(details.hourly_rate);
        active.address = Set(details.address);
        active.postal_code = Set(details.postal_code);
        if let Some(capacity) = new_capacity {
            active.capacity = Set(capacity as i32);
        }
        active.updated_at = Set(now);
        let updated = active.update(&txn).await.map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok(facility_to_domain(updated))
    }

    async fn list_facilities(&self) -> DomainResult<Vec<FacilityOccupancy>> {
        let facilities = facility::Entity::find()
            .order_by_asc(facility::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let mut result = Vec::with_capacity(facilities.len());
        for f in facilities {
            let occupied = occupied_count(&self.db, f.id).await.map_err(db_err)?;
            result.push(FacilityOccupancy {
                facility: facility_to_domain(f),
                occupied: occupied as u32,
            });
        }
        Ok(result)
    }

    async fn resize_facility(&self, id: i32, new_capacity: u32) -> DomainResult<()> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let existing = facility::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(DomainError::FacilityNotFound(id))?;
        let current = existing.capacity.max(0) as u32;

        if new_capacity == current {
            return Ok(());
        }

        let now = Utc::now();
        // Dropping the transaction on error rolls it back untouched.
        apply_resize(&txn, id, current, new_capacity, now).await?;

        let mut active: facility::ActiveModel = existing.into();
        active.capacity = Set(new_capacity as i32);
        active.updated_at = Set(now);
        active.update(&txn).await.map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        debug!(facility_id = id, new_capacity, "Facility resized");
        Ok(())
    }

    async fn delete_facility(&self, id: i32) -> DomainResult<()> {
        let txn = self.db.begin().await.map_err(db_err)?;

        facility::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(DomainError::FacilityNotFound(id))?;

        let occupied = occupied_count(&txn, id).await.map_err(db_err)? as u32;
        if occupied > 0 {
            return Err(DomainError::FacilityHasOccupiedSpots {
                facility_id: id,
                occupied,
            });
        }

        // Spots cascade away; released reservations keep their history
        // with a nulled spot reference.
        facility::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        debug!(facility_id = id, "Facility deleted");
        Ok(())
    }

    async fn get_spot(&self, id: i32) -> DomainResult<Option<Spot>> {
        let model = spot::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(spot_to_domain))
    }

    async fn list_spots(&self, facility_id: i32) -> DomainResult<Vec<Spot>> {
        facility::Entity::find_by_id(facility_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(DomainError::FacilityNotFound(facility_id))?;

        let models = spot::Entity::find()
            .filter(spot::Column::FacilityId.eq(facility_id))
            .order_by_asc(spot::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(spot_to_domain).collect())
    }

    async fn active_reservation_for_spot(
        &self,
        spot_id: i32,
    ) -> DomainResult<Option<Reservation>> {
        let model = reservation::Entity::find()
            .filter(reservation::Column::SpotId.eq(spot_id))
            .filter(reservation::Column::Occupancy.eq(OccupancyStatus::Occupied.as_str()))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(reservation_to_domain))
    }

    async fn claim_spot(
        &self,
        facility_id: i32,
        draft: ReservationDraft,
        now: DateTime<Utc>,
    ) -> DomainResult<Reservation> {
        let txn = self.db.begin().await.map_err(db_err)?;

        facility::Entity::find_by_id(facility_id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(DomainError::FacilityNotFound(facility_id))?;

        // Lowest-id Available spot, flipped with a conditional update.
        // If another writer claimed the candidate first the update hits
        // zero rows and we re-select.
        let claimed = loop {
            let candidate = spot::Entity::find()
                .filter(spot::Column::FacilityId.eq(facility_id))
                .filter(spot::Column::Status.eq(SpotStatus::Available.as_str()))
                .order_by_asc(spot::Column::Id)
                .one(&txn)
                .await
                .map_err(db_err)?;

            let Some(candidate) = candidate else {
                return Err(DomainError::NoAvailableSpot(facility_id));
            };

            let res = spot::Entity::update_many()
                .col_expr(
                    spot::Column::Status,
                    Expr::value(SpotStatus::Occupied.as_str()),
                )
                .col_expr(spot::Column::UpdatedAt, Expr::value(now))
                .filter(spot::Column::Id.eq(candidate.id))
                .filter(spot::Column::Status.eq(SpotStatus::Available.as_str()))
                .exec(&txn)
                .await
                .map_err(db_err)?;

            if res.rows_affected == 1 {
                break candidate.id;
            }
        };

        let model = reservation::ActiveModel {
            id: NotSet,
            spot_id: Set(Some(claimed)),
            customer_id: Set(draft.customer_id),
            vehicle_number: Set(draft.vehicle_number),
            started_at: Set(now),
            expected_end_at: Set(draft.expected_end_at),
            ended_at: Set(None),
            cost: Set(None),
            payment_status: Set(PaymentStatus::Pending.as_str().to_string()),
            payment_method: Set(None),
            paid_at: Set(None),
            occupancy: Set(OccupancyStatus::Occupied.as_str().to_string()),
        };
        let inserted = model.insert(&txn).await.map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        debug!(
            facility_id,
            spot_id = claimed,
            reservation_id = inserted.id,
            "Spot claimed"
        );
        Ok(reservation_to_domain(inserted))
    }

    async fn settle_spot(
        &self,
        spot_id: i32,
        payment_method: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<Reservation> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let spot_model = spot::Entity::find_by_id(spot_id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(DomainError::SpotNotFound(spot_id))?;

        let active = reservation::Entity::find()
            .filter(reservation::Column::SpotId.eq(spot_id))
            .filter(reservation::Column::Occupancy.eq(OccupancyStatus::Occupied.as_str()))
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(DomainError::SpotNotOccupied(spot_id))?;

        let facility_model = facility::Entity::find_by_id(spot_model.facility_id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or_else(|| {
                DomainError::Persistence(format!(
                    "spot {} references missing facility {}",
                    spot_id, spot_model.facility_id
                ))
            })?;

        let mut settled = reservation_to_domain(active);
        settled.settle(now, facility_model.hourly_rate, payment_method);

        // Conditional close keyed on occupancy: a racing release loses
        // here instead of billing twice.
        let res = reservation::Entity::update_many()
            .col_expr(reservation::Column::EndedAt, Expr::value(settled.ended_at))
            .col_expr(reservation::Column::Cost, Expr::value(settled.cost))
            .col_expr(
                reservation::Column::PaymentStatus,
                Expr::value(settled.payment_status.as_str()),
            )
            .col_expr(
                reservation::Column::PaymentMethod,
                Expr::value(settled.payment_method.clone()),
            )
            .col_expr(reservation::Column::PaidAt, Expr::value(settled.paid_at))
            .col_expr(
                reservation::Column::Occupancy,
                Expr::value(OccupancyStatus::Released.as_str()),
            )
            .filter(reservation::Column::Id.eq(settled.id))
            .filter(reservation::Column::Occupancy.eq(OccupancyStatus::Occupied.as_str()))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        if res.rows_affected == 0 {
            return Err(DomainError::SpotNotOccupied(spot_id));
        }

        spot::Entity::update_many()
            .col_expr(
                spot::Column::Status,
                Expr::value(SpotStatus::Available.as_str()),
            )
            .col_expr(spot::Column::UpdatedAt, Expr::value(now))
            .filter(spot::Column::Id.eq(spot_id))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        debug!(
            spot_id,
            reservation_id = settled.id,
            cost = %settled.cost.unwrap_or_default(),
            "Spot released"
        );
        Ok(settled)
    }

    async fn insert_customer(&self, new: NewCustomer) -> DomainResult<Customer> {
        let existing = customer::Entity::find()
            .filter(customer::Column::Email.eq(&new.email))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if existing.is_some() {
            return Err(DomainError::Conflict(format!(
                "email already registered: {}",
                new.email
            )));
        }

        let model = customer::ActiveModel {
            id: NotSet,
            email: Set(new.email),
            password_hash: Set(new.password_hash),
            name: Set(new.name),
            address: Set(new.address),
            postal_code: Set(new.postal_code),
            role: Set(new.role.as_str().to_string()),
            created_at: Set(Utc::now()),
        };
        let inserted = model.insert(&self.db).await.map_err(db_err)?;
        Ok(customer_to_domain(inserted))
    }

    async fn find_customer(&self, id: i32) -> DomainResult<Option<Customer>> {
        let model = customer::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(customer_to_domain))
    }

    async fn find_customer_by_email(&self, email: &str) -> DomainResult<Option<Customer>> {
        let model = customer::Entity::find()
            .filter(customer::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(customer_to_domain))
    }

    async fn update_customer_profile(
        &self,
        id: i32,
        update: ProfileUpdate,
    ) -> DomainResult<Customer> {
        let existing = customer::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(DomainError::NotFound {
                entity: "Customer",
                field: "id",
                value: id.to_string(),
            })?;

        let mut active: customer::ActiveModel = existing.into();
        active.name = Set(update.name);
        active.address = Set(update.address);
        active.postal_code = Set(update.postal_code);

        let updated = active.update(&self.db).await.map_err(db_err)?;
        Ok(customer_to_domain(updated))
    }

    async fn update_customer_password(&self, id: i32, password_hash: &str) -> DomainResult<()> {
        let existing = customer::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(DomainError::NotFound {
                entity: "Customer",
                field: "id",
                value: id.to_string(),
            })?;

        let mut active: customer::ActiveModel = existing.into();
        active.password_hash = Set(password_hash.to_string());
        active.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn list_customers(&self) -> DomainResult<Vec<Customer>> {
        let models = customer::Entity::find()
            .order_by_asc(customer::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(customer_to_domain).collect())
    }

    async fn delete_customer(&self, id: i32) -> DomainResult<()> {
        let txn = self.db.begin().await.map_err(db_err)?;

        customer::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(DomainError::NotFound {
                entity: "Customer",
                field: "id",
                value: id.to_string(),
            })?;

        // Free any spot the customer still occupies before their
        // reservations cascade away.
        let active_spot_ids: Vec<i32> = reservation::Entity::find()
            .filter(reservation::Column::CustomerId.eq(id))
            .filter(reservation::Column::Occupancy.eq(OccupancyStatus::Occupied.as_str()))
            .all(&txn)
            .await
            .map_err(db_err)?
            .into_iter()
            .filter_map(|r| r.spot_id)
            .collect();

        if !active_spot_ids.is_empty() {
            spot::Entity::update_many()
                .col_expr(
                    spot::Column::Status,
                    Expr::value(SpotStatus::Available.as_str()),
                )
                .col_expr(spot::Column::UpdatedAt, Expr::value(Utc::now()))
                .filter(spot::Column::Id.is_in(active_spot_ids))
                .exec(&txn)
                .await
                .map_err(db_err)?;
        }

        customer::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        debug!(customer_id = id, "Customer deleted");
        Ok(())
    }

    async fn count_admins(&self) -> DomainResult<u64> {
        customer::Entity::find()
            .filter(customer::Column::Role.eq(CustomerRole::Admin.as_str()))
            .count(&self.db)
            .await
            .map_err(db_err)
    }

    async fn get_reservation(&self, id: i32) -> DomainResult<Option<Reservation>> {
        let model = reservation::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(reservation_to_domain))
    }

    async fn list_reservations(&self) -> DomainResult<Vec<Reservation>> {
        let models = reservation::Entity::find()
            .order_by_desc(reservation::Column::StartedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(reservation_to_domain).collect())
    }

    async fn list_reservations_for_customer(
        &self,
        customer_id: i32,
    ) -> DomainResult<Vec<Reservation>> {
        let models = reservation::Entity::find()
            .filter(reservation::Column::CustomerId.eq(customer_id))
            .order_by_desc(reservation::Column::StartedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(reservation_to_domain).collect())
    }
}
