//! `SeaORM` Entity for activity_plan_reports table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Reported progress of one activity plan.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "activity_plan_reports")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub monthly_report_id: Uuid,
    pub activity_plan_id: Uuid,
    pub indicator_id: Uuid,
    pub target_achieved: i64,
    #[sea_orm(column_type = "JsonBinary")]
    pub response_types: Json,
    pub units: Option<i64>,
    pub no_of_transfers: Option<i32>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub report_fields: Option<Json>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::project_monthly_reports::Entity",
        from = "Column::MonthlyReportId",
        to = "super::project_monthly_reports::Column::Id",
        on_delete = "Cascade"
    )]
    ProjectMonthlyReports,
    #[sea_orm(
        belongs_to = "super::activity_plans::Entity",
        from = "Column::ActivityPlanId",
        to = "super::activity_plans::Column::Id",
        on_delete = "Cascade"
    )]
    ActivityPlans,
    #[sea_orm(
        belongs_to = "super::indicators::Entity",
        from = "Column::IndicatorId",
        to = "super::indicators::Column::Id",
        on_delete = "Restrict"
    )]
    Indicators,
}

impl Related<super::project_monthly_reports::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProjectMonthlyReports.def()
    }
}

impl Related<super::activity_plans::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ActivityPlans.def()
    }
}

impl Related<super::indicators::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Indicators.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
