//! `SeaORM` Entity for activity_details table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Activity details.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "activity_details")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub activity_type_id: Uuid,
    pub code: String,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::activity_types::Entity",
        from = "Column::ActivityTypeId",
        to = "super::activity_types::Column::Id",
        on_delete = "Cascade"
    )]
    ActivityTypes,
}

impl Related<super::activity_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ActivityTypes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
