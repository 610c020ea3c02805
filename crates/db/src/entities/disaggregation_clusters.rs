//! `SeaORM` Entity for disaggregation_clusters table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Clusters a disaggregation is used by.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "disaggregation_clusters")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub disaggregation_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub cluster_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::disaggregations::Entity",
        from = "Column::DisaggregationId",
        to = "super::disaggregations::Column::Id",
        on_delete = "Cascade"
    )]
    Disaggregations,
    #[sea_orm(
        belongs_to = "super::clusters::Entity",
        from = "Column::ClusterId",
        to = "super::clusters::Column::Id",
        on_delete = "Cascade"
    )]
    Clusters,
}

impl Related<super::disaggregations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Disaggregations.def()
    }
}

impl Related<super::clusters::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clusters.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
