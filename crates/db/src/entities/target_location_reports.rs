//! `SeaORM` Entity for target_location_reports table.

use super::sea_orm_active_enums::BeneficiaryStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Reported progress at one location.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "target_location_reports")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub activity_plan_report_id: Uuid,
    pub target_location_id: Option<Uuid>,
    pub country_id: Uuid,
    pub province_id: Uuid,
    pub district_id: Uuid,
    pub zone_id: Option<Uuid>,
    pub location_type_id: Option<Uuid>,
    pub facility_site_type_id: Option<Uuid>,
    pub beneficiary_status: BeneficiaryStatus,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::activity_plan_reports::Entity",
        from = "Column::ActivityPlanReportId",
        to = "super::activity_plan_reports::Column::Id",
        on_delete = "Cascade"
    )]
    ActivityPlanReports,
    #[sea_orm(
        belongs_to = "super::target_locations::Entity",
        from = "Column::TargetLocationId",
        to = "super::target_locations::Column::Id",
        on_delete = "SetNull"
    )]
    TargetLocations,
    #[sea_orm(
        belongs_to = "super::locations::Entity",
        from = "Column::CountryId",
        to = "super::locations::Column::Id",
        on_delete = "Restrict"
    )]
    Country,
    #[sea_orm(
        belongs_to = "super::locations::Entity",
        from = "Column::ProvinceId",
        to = "super::locations::Column::Id",
        on_delete = "Restrict"
    )]
    Province,
    #[sea_orm(
        belongs_to = "super::locations::Entity",
        from = "Column::DistrictId",
        to = "super::locations::Column::Id",
        on_delete = "Restrict"
    )]
    District,
    #[sea_orm(
        belongs_to = "super::locations::Entity",
        from = "Column::ZoneId",
        to = "super::locations::Column::Id",
        on_delete = "SetNull"
    )]
    Zone,
}

impl Related<super::activity_plan_reports::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ActivityPlanReports.def()
    }
}

impl Related<super::target_locations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TargetLocations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
