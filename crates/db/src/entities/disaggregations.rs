//! `SeaORM` Entity for disaggregations table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Disaggregation categories.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "disaggregations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub gender: Option<String>,
    pub lower_limit: Option<i32>,
    pub upper_limit: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
