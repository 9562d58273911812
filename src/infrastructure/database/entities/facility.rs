//! Facility entity

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "facilities")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    /// Price per hour of occupancy
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub hourly_rate: Decimal,

    pub address: String,
    pub postal_code: String,

    /// Number of spot rows this facility owns
    pub capacity: i32,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::spot::Entity")]
    Spots,
}

impl Related<super::spot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Spots.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
