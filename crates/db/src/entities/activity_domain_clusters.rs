//! `SeaORM` Entity for activity_domain_clusters table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Clusters an activity domain belongs to.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "activity_domain_clusters")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub activity_domain_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub cluster_id: Uuid,
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
    #[sea_orm(
        belongs_to = "super::clusters::Entity",
        from = "Column::ClusterId",
        to = "super::clusters::Column::Id",
        on_delete = "Cascade"
    )]
    Clusters,
}

impl Related<super::activity_domains::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ActivityDomains.def()
    }
}

impl Related<super::clusters::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clusters.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
