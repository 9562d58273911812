//! Reservation entity

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reservations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Null only for history rows whose spot was deleted after release
    #[sea_orm(nullable)]
    pub spot_id: Option<i32>,

    pub customer_id: i32,

    pub vehicle_number: String,

    pub started_at: DateTimeUtc,

    #[sea_orm(nullable)]
    pub expected_end_at: Option<DateTimeUtc>,

    #[sea_orm(nullable)]
    pub ended_at: Option<DateTimeUtc>,

    /// Final charge; null while the reservation is active
    #[sea_orm(column_type = "Decimal(Some((16, 2)))", nullable)]
    pub cost: Option<Decimal>,

    /// Payment status: Pending, Paid
    pub payment_status: String,

    #[sea_orm(nullable)]
    pub payment_method: Option<String>,

    #[sea_orm(nullable)]
    pub paid_at: Option<DateTimeUtc>,

    /// Occupancy status: Occupied, Released
    pub occupancy: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::spot::Entity",
        from = "Column::SpotId",
        to = "super::spot::Column::Id"
    )]
    Spot,
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::CustomerId",
        to = "super::customer::Column::Id"
    )]
    Customer,
}

impl Related<super::spot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Spot.def()
    }
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
