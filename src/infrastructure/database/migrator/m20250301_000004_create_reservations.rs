//! Create reservations table
//!
//! Billing history is retained when spots are deleted: the spot
//! reference is nulled rather than cascading the row away. Deleting a
//! customer removes their reservations.

use sea_orm_migration::prelude::*;

use super::m20250301_000001_create_customers::Customers;
use super::m20250301_000003_create_spots::Spots;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reservations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reservations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reservations::SpotId).integer())
                    .col(
                        ColumnDef::new(Reservations::CustomerId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reservations::VehicleNumber)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reservations::StartedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Reservations::ExpectedEndAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Reservations::EndedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Reservations::Cost).decimal_len(16, 2))
                    .col(
                        ColumnDef::new(Reservations::PaymentStatus)
                            .string()
                            .not_null()
                            .default("Pending"),
                    )
                    .col(ColumnDef::new(Reservations::PaymentMethod).string())
                    .col(ColumnDef::new(Reservations::PaidAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Reservations::Occupancy)
                            .string()
                            .not_null()
                            .default("Occupied"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservations_spot")
                            .from(Reservations::Table, Reservations::SpotId)
                            .to(Spots::Table, Spots::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservations_customer")
                            .from(Reservations::Table, Reservations::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_spot")
                    .table(Reservations::Table)
                    .col(Reservations::SpotId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_customer")
                    .table(Reservations::Table)
                    .col(Reservations::CustomerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_occupancy")
                    .table(Reservations::Table)
                    .col(Reservations::Occupancy)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reservations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Reservations {
    Table,
    Id,
    SpotId,
    CustomerId,
    VehicleNumber,
    StartedAt,
    ExpectedEndAt,
    EndedAt,
    Cost,
    PaymentStatus,
    PaymentMethod,
    PaidAt,
    Occupancy,
}
