//! `SeaORM` Entity for target_locations table.

use super::sea_orm_active_enums::ProjectState;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Planned target locations of an activity plan.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "target_locations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub project_id: Uuid,
    pub activity_plan_id: Uuid,
    pub country_id: Uuid,
    pub province_id: Uuid,
    pub district_id: Uuid,
    pub zone_id: Option<Uuid>,
    pub location_type_id: Option<Uuid>,
    pub implementing_partner_id: Option<Uuid>,
    pub facility_site_type_id: Option<Uuid>,
    pub facility_monitoring: bool,
    pub facility_name: Option<String>,
    pub facility_id: Option<String>,
    pub facility_lat: Option<String>,
    pub facility_long: Option<String>,
    pub nhs_code: Option<String>,
    pub state: ProjectState,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::projects::Entity",
        from = "Column::ProjectId",
        to = "super::projects::Column::Id",
        on_delete = "Cascade"
    )]
    Projects,
    #[sea_orm(
        belongs_to = "super::activity_plans::Entity",
        from = "Column::ActivityPlanId",
        to = "super::activity_plans::Column::Id",
        on_delete = "Cascade"
    )]
    ActivityPlans,
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
    #[sea_orm(
        belongs_to = "super::organizations::Entity",
        from = "Column::ImplementingPartnerId",
        to = "super::organizations::Column::Id",
        on_delete = "SetNull"
    )]
    ImplementingPartner,
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Projects.def()
    }
}

impl Related<super::activity_plans::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ActivityPlans.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
