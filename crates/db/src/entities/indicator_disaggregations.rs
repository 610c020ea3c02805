//! `SeaORM` Entity for indicator_disaggregations table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Configured disaggregations of an indicator.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "indicator_disaggregations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub indicator_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub disaggregation_id: Uuid,
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
        belongs_to = "super::disaggregations::Entity",
        from = "Column::DisaggregationId",
        to = "super::disaggregations::Column::Id",
        on_delete = "Cascade"
    )]
    Disaggregations,
}

impl Related<super::indicators::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Indicators.def()
    }
}

impl Related<super::disaggregations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Disaggregations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
