//! Location repository for the administrative tree.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use reporthub_core::location::{AdminLevel, LocationError, LocationNode, LocationService};
use reporthub_shared::types::LocationId;

use crate::entities::locations;

/// Input for creating a location.
#[derive(Debug, Clone)]
pub struct CreateLocationInput {
    /// Parent pcode, `None` for a country.
    pub parent_code: Option<String>,
    /// Level, 0 (country) to 3 (zone).
    pub level: i16,
    /// Unique pcode.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Region name.
    pub region_name: Option<String>,
    /// Free-text location type (urban, rural, ...).
    pub location_type: Option<String>,
    /// Latitude, stored as text.
    pub lat: Option<String>,
    /// Longitude, stored as text.
    pub long: Option<String>,
}

/// Converts a location row into the domain node.
///
/// # Errors
///
/// Returns `InvalidLevel` when the stored level is outside 0..=3.
pub fn to_node(model: &locations::Model) -> Result<LocationNode, LocationError> {
    Ok(LocationNode {
        id: LocationId::from_uuid(model.id),
        parent_id: model.parent_id.map(LocationId::from_uuid),
        level: AdminLevel::from_i16(model.level)?,
        code: model.code.clone(),
        name: model.name.clone(),
    })
}

fn db(e: sea_orm::DbErr) -> LocationError {
    LocationError::Database(e.to_string())
}

/// Location repository.
#[derive(Debug, Clone)]
pub struct LocationRepository {
    db: DatabaseConnection,
}

impl LocationRepository {
    /// Creates a new location repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a location by pcode.
    pub async fn find_by_code(&self, code: &str) -> Result<Option<locations::Model>, LocationError> {
        locations::Entity::find()
            .filter(locations::Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(db)
    }

    /// Lists the direct children of a location, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the parent code is unknown.
    pub async fn children(&self, code: &str) -> Result<Vec<locations::Model>, LocationError> {
        let parent = self
            .find_by_code(code)
            .await?
            .ok_or_else(|| LocationError::NotFound(code.to_string()))?;

        locations::Entity::find()
            .filter(locations::Column::ParentId.eq(parent.id))
            .order_by_asc(locations::Column::Name)
            .all(&self.db)
            .await
            .map_err(db)
    }

    /// Lists countries.
    pub async fn countries(&self) -> Result<Vec<locations::Model>, LocationError> {
        locations::Entity::find()
            .filter(locations::Column::Level.eq(AdminLevel::Country.as_i16()))
            .order_by_asc(locations::Column::Name)
            .all(&self.db)
            .await
            .map_err(db)
    }

    /// Loads locations by id as domain nodes.
    pub async fn nodes(&self, ids: &[Uuid]) -> Result<Vec<LocationNode>, LocationError> {
        let models = locations::Entity::find()
            .filter(locations::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(db)?;

        models.iter().map(to_node).collect()
    }

    /// Creates a location after checking its level against its parent.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The parent code is unknown
    /// - The level does not sit directly under the parent's level
    /// - The code is already taken
    pub async fn create(&self, input: CreateLocationInput) -> Result<locations::Model, LocationError> {
        let parent = match input.parent_code.as_deref() {
            Some(code) => Some(
                self.find_by_code(code)
                    .await?
                    .ok_or_else(|| LocationError::NotFound(code.to_string()))?,
            ),
            None => None,
        };
        let parent_node = parent.as_ref().map(to_node).transpose()?;

        let level = LocationService::validate_placement(input.level, parent_node.as_ref())?;

        let taken = locations::Entity::find()
            .filter(locations::Column::Code.eq(&input.code))
            .count(&self.db)
            .await
            .map_err(db)?;
        if taken > 0 {
            return Err(LocationError::DuplicateCode(input.code));
        }

        let location = locations::ActiveModel {
            id: Set(Uuid::now_v7()),
            parent_id: Set(parent.map(|p| p.id)),
            level: Set(level.as_i16()),
            code: Set(input.code),
            name: Set(input.name),
            region_name: Set(input.region_name),
            location_type: Set(input.location_type),
            lat: Set(input.lat),
            long: Set(input.long),
            created_at: Set(Utc::now().into()),
        };

        let created = location.insert(&self.db).await.map_err(db)?;
        tracing::info!(location_id = %created.id, code = %created.code, level = %level, "Location created");
        Ok(created)
    }
}
