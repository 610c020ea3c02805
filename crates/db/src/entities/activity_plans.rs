//! `SeaORM` Entity for activity_plans table.

use super::sea_orm_active_enums::ProjectState;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Planned activities of a project.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "activity_plans")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub project_id: Uuid,
    pub activity_domain_id: Uuid,
    pub activity_type_id: Uuid,
    pub activity_detail_id: Option<Uuid>,
    pub indicator_id: Uuid,
    pub beneficiary_id: Option<Uuid>,
    pub hrp_beneficiary_id: Option<Uuid>,
    pub beneficiary_category: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
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
        belongs_to = "super::activity_domains::Entity",
        from = "Column::ActivityDomainId",
        to = "super::activity_domains::Column::Id",
        on_delete = "Restrict"
    )]
    ActivityDomains,
    #[sea_orm(
        belongs_to = "super::activity_types::Entity",
        from = "Column::ActivityTypeId",
        to = "super::activity_types::Column::Id",
        on_delete = "Restrict"
    )]
    ActivityTypes,
    #[sea_orm(
        belongs_to = "super::activity_details::Entity",
        from = "Column::ActivityDetailId",
        to = "super::activity_details::Column::Id",
        on_delete = "SetNull"
    )]
    ActivityDetails,
    #[sea_orm(
        belongs_to = "super::indicators::Entity",
        from = "Column::IndicatorId",
        to = "super::indicators::Column::Id",
        on_delete = "Restrict"
    )]
    Indicators,
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Projects.def()
    }
}

impl Related<super::activity_domains::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ActivityDomains.def()
    }
}

impl Related<super::activity_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ActivityTypes.def()
    }
}

impl Related<super::activity_details::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ActivityDetails.def()
    }
}

impl Related<super::indicators::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Indicators.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
