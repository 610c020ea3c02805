//! `SeaORM` Entity for activity_types table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Activity types, optionally carrying a report field schema.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "activity_types")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub activity_domain_id: Uuid,
    pub code: String,
    pub name: String,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub fields: Option<Json>,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::activity_domains::Entity",
        from = "Column::ActivityDomainId",
        to = "super::activity_domains::Column::Id",
        on_delete = "Cascade"
    )]
    ActivityDomains,
}

impl Related<super::activity_domains::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ActivityDomains.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
