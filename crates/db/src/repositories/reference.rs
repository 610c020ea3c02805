//! Reference data repository.
//!
//! Loads the taxonomy used to resolve uploaded rows and the configured
//! disaggregations of indicators.

use std::collections::HashMap;

use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QuerySelect,
    sea_query::{Expr, Func},
};
use uuid::Uuid;

use reporthub_core::fields::FieldSchema;
use reporthub_core::import::{ActivityTypeRef, AliasKind, IndicatorRef, ReferenceIndex};
use reporthub_core::reporting::DisaggregationRef;
use reporthub_shared::types::DisaggregationId;

use crate::entities::{
    activity_details, activity_domains, activity_types, beneficiary_types, clusters,
    disaggregations, facility_site_types, import_aliases, indicator_activity_types,
    indicator_disaggregations, indicators, location_types, locations, organizations,
};
use crate::repositories::location::to_node;

/// Reference data repository.
#[derive(Debug, Clone)]
pub struct ReferenceRepository {
    db: DatabaseConnection,
}

impl ReferenceRepository {
    /// Creates a new reference repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Builds the lookup index used by both imports.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn load_index(&self) -> Result<ReferenceIndex, DbErr> {
        load_index(&self.db).await
    }

    /// Configured disaggregations of an indicator, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn configured_disaggregations(
        &self,
        indicator_id: Uuid,
    ) -> Result<Vec<DisaggregationRef>, DbErr> {
        let by_indicator = disaggregations_by_indicator(&self.db, &[indicator_id]).await?;
        Ok(by_indicator.get(&indicator_id).cloned().unwrap_or_default())
    }

    /// Field schema of an activity type. An absent schema is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails. A stored schema that
    /// cannot be interpreted is logged and treated as empty.
    pub async fn field_schema(&self, activity_type_id: Uuid) -> Result<FieldSchema, DbErr> {
        field_schema(&self.db, activity_type_id).await
    }

    /// Finds a cluster by code, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_cluster(&self, code: &str) -> Result<Option<clusters::Model>, DbErr> {
        clusters::Entity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(clusters::Column::Code)))
                    .eq(code.trim().to_lowercase()),
            )
            .one(&self.db)
            .await
    }

    /// Finds an organization by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_organization(
        &self,
        code: &str,
    ) -> Result<Option<organizations::Model>, DbErr> {
        organizations::Entity::find()
            .filter(organizations::Column::Code.eq(code.trim()))
            .one(&self.db)
            .await
    }
}

/// Builds the import lookup index from every reference table.
pub(crate) async fn load_index<C: ConnectionTrait>(conn: &C) -> Result<ReferenceIndex, DbErr> {
    let mut index = ReferenceIndex::new();

    for alias in import_aliases::Entity::find().all(conn).await? {
        match AliasKind::parse(&alias.kind) {
            Some(kind) => index.add_alias(kind, &alias.alias, alias.entity_id),
            None => tracing::warn!(alias_id = %alias.id, kind = %alias.kind, "Unknown import alias kind"),
        }
    }

    for domain in activity_domains::Entity::find()
        .filter(activity_domains::Column::IsActive.eq(true))
        .all(conn)
        .await?
    {
        index.add_activity_domain(domain.id, &domain.code, &domain.name);
    }

    for activity_type in activity_types::Entity::find()
        .filter(activity_types::Column::IsActive.eq(true))
        .all(conn)
        .await?
    {
        index.add_activity_type(
            &activity_type.code,
            ActivityTypeRef {
                id: activity_type.id,
                activity_domain_id: activity_type.activity_domain_id,
                name: activity_type.name,
            },
        );
    }

    for detail in activity_details::Entity::find().all(conn).await? {
        index.add_activity_detail(detail.id, &detail.code);
    }

    let mut types_by_indicator: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for link in indicator_activity_types::Entity::find().all(conn).await? {
        types_by_indicator
            .entry(link.indicator_id)
            .or_default()
            .push(link.activity_type_id);
    }
    for indicator in indicators::Entity::find().all(conn).await? {
        index.add_indicator(IndicatorRef {
            id: indicator.id,
            activity_type_ids: types_by_indicator.remove(&indicator.id).unwrap_or_default(),
            name: indicator.name,
        });
    }

    for location in locations::Entity::find().all(conn).await? {
        match to_node(&location) {
            Ok(node) => index.add_location(node),
            Err(e) => tracing::warn!(location_id = %location.id, error = %e, "Skipping location"),
        }
    }

    for row in location_types::Entity::find().all(conn).await? {
        index.add_location_type(row.id, &row.name);
    }
    for row in facility_site_types::Entity::find().all(conn).await? {
        index.add_facility_site_type(row.id, &row.name);
    }
    for row in beneficiary_types::Entity::find().all(conn).await? {
        index.add_beneficiary_type(row.id, &row.name);
    }
    for row in organizations::Entity::find().all(conn).await? {
        index.add_organization(row.id, &row.code);
    }

    Ok(index)
}

/// Configured disaggregations per indicator, each list ordered by name.
pub(crate) async fn disaggregations_by_indicator<C: ConnectionTrait>(
    conn: &C,
    indicator_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<DisaggregationRef>>, DbErr> {
    let links: Vec<(Uuid, Uuid)> = indicator_disaggregations::Entity::find()
        .select_only()
        .column(indicator_disaggregations::Column::IndicatorId)
        .column(indicator_disaggregations::Column::DisaggregationId)
        .filter(indicator_disaggregations::Column::IndicatorId.is_in(indicator_ids.iter().copied()))
        .into_tuple()
        .all(conn)
        .await?;

    let names: HashMap<Uuid, String> = disaggregations::Entity::find()
        .filter(disaggregations::Column::Id.is_in(links.iter().map(|(_, d)| *d)))
        .all(conn)
        .await?
        .into_iter()
        .map(|d| (d.id, d.name))
        .collect();

    let mut by_indicator: HashMap<Uuid, Vec<DisaggregationRef>> = HashMap::new();
    for (indicator_id, disaggregation_id) in links {
        if let Some(name) = names.get(&disaggregation_id) {
            by_indicator
                .entry(indicator_id)
                .or_default()
                .push(DisaggregationRef {
                    id: DisaggregationId::from_uuid(disaggregation_id),
                    name: name.clone(),
                });
        }
    }
    for list in by_indicator.values_mut() {
        list.sort_by(|a, b| a.name.cmp(&b.name));
    }

    Ok(by_indicator)
}

/// Disaggregation names by id.
pub(crate) async fn disaggregation_names<C: ConnectionTrait>(
    conn: &C,
    ids: impl IntoIterator<Item = Uuid>,
) -> Result<HashMap<Uuid, String>, DbErr> {
    Ok(disaggregations::Entity::find()
        .filter(disaggregations::Column::Id.is_in(ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|d| (d.id, d.name))
        .collect())
}

/// Field schema of an activity type.
pub(crate) async fn field_schema<C: ConnectionTrait>(
    conn: &C,
    activity_type_id: Uuid,
) -> Result<FieldSchema, DbErr> {
    let fields = activity_types::Entity::find_by_id(activity_type_id)
        .one(conn)
        .await?
        .and_then(|t| t.fields);

    let Some(fields) = fields else {
        return Ok(FieldSchema::default());
    };

    match FieldSchema::from_json(&fields) {
        Ok(schema) => Ok(schema),
        Err(e) => {
            tracing::warn!(activity_type_id = %activity_type_id, error = %e, "Ignoring invalid field schema");
            Ok(FieldSchema::default())
        }
    }
}
