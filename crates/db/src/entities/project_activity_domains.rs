//! `SeaORM` Entity for project_activity_domains table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Activity domains selected on a project.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "project_activity_domains")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub project_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub activity_domain_id: Uuid,
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

impl ActiveModelBehavior for ActiveModel {}
