//! `SeaORM` Entity for indicator_activity_types table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Activity types an indicator is measured under.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "indicator_activity_types")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub indicator_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub activity_type_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::indicators::Entity",
        from = "Column::IndicatorId",
        to = "super::indicators::Column::Id",
        on_delete = "Cascade"
    )]
    Indicators,
    #[sea_orm(
        belongs_to = "super::activity_types::Entity",
        from = "Column::ActivityTypeId",
        to = "super::activity_types::Column::Id",
        on_delete = "Cascade"
    )]
    ActivityTypes,
}

impl Related<super::indicators::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Indicators.def()
    }
}

impl Related<super::activity_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ActivityTypes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
