//! Create spots table
//!
//! One row per unit of facility capacity. Deleting a facility removes
//! its spots.

use sea_orm_migration::prelude::*;

use super::m20250301_000002_create_facilities::Facilities;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Spots::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Spots::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Spots::FacilityId).integer().not_null())
                    .col(
                        ColumnDef::new(Spots::Status)
                            .string()
                            .not_null()
                            .default("Available"),
                    )
                    .col(
                        ColumnDef::new(Spots::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_spots_facility")
                            .from(Spots::Table, Spots::FacilityId)
                            .to(Facilities::Table, Facilities::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_spots_facility")
                    .table(Spots::Table)
                    .col(Spots::FacilityId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_spots_status")
                    .table(Spots::Table)
                    .col(Spots::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Spots::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Spots {
    Table,
    Id,
    FacilityId,
    Status,
    UpdatedAt,
}
