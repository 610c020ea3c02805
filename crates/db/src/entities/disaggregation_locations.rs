//! `SeaORM` Entity for disaggregation_locations table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Planned targets per disaggregation.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "disaggregation_locations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub target_location_id: Uuid,
    pub disaggregation_id: Uuid,
    pub target: i64,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::target_locations::Entity",
        from = "Column::TargetLocationId",
        to = "super::target_locations::Column::Id",
        on_delete = "Cascade"
    )]
    TargetLocations,
    #[sea_orm(
        belongs_to = "super::disaggregations::Entity",
        from = "Column::DisaggregationId",
        to = "super::disaggregations::Column::Id",
        on_delete = "Restrict"
    )]
    Disaggregations,
}

impl Related<super::target_locations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TargetLocations.def()
    }
}

impl Related<super::disaggregations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Disaggregations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
