//! `SeaORM` Entity for disaggregation_location_reports table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Reported values per disaggregation.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "disaggregation_location_reports")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub target_location_report_id: Uuid,
    pub disaggregation_id: Uuid,
    pub target: i64,
    pub target_required: i64,
    pub reached: i64,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::target_location_reports::Entity",
        from = "Column::TargetLocationReportId",
        to = "super::target_location_reports::Column::Id",
        on_delete = "Cascade"
    )]
    TargetLocationReports,
    #[sea_orm(
        belongs_to = "super::disaggregations::Entity",
        from = "Column::DisaggregationId",
        to = "super::disaggregations::Column::Id",
        on_delete = "Restrict"
    )]
    Disaggregations,
}

impl Related<super::target_location_reports::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TargetLocationReports.def()
    }
}

impl Related<super::disaggregations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Disaggregations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
