//! Organization and cluster membership queries.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{clusters, organization_clusters, organizations};

/// Organization repository.
#[derive(Debug, Clone)]
pub struct OrganizationRepository {
    db: DatabaseConnection,
}

impl OrganizationRepository {
    /// Creates a new organization repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds an organization by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<organizations::Model>, DbErr> {
        organizations::Entity::find_by_id(id).one(&self.db).await
    }

    /// Finds an organization by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_code(&self, code: &str) -> Result<Option<organizations::Model>, DbErr> {
        organizations::Entity::find()
            .filter(organizations::Column::Code.eq(code))
            .one(&self.db)
            .await
    }

    /// Codes of the clusters an organization belongs to, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn cluster_codes(&self, organization_id: Uuid) -> Result<Vec<String>, DbErr> {
        let cluster_ids: Vec<Uuid> = organization_clusters::Entity::find()
            .select_only()
            .column(organization_clusters::Column::ClusterId)
            .filter(organization_clusters::Column::OrganizationId.eq(organization_id))
            .into_tuple()
            .all(&self.db)
            .await?;

        clusters::Entity::find()
            .select_only()
            .column(clusters::Column::Code)
            .filter(clusters::Column::Id.is_in(cluster_ids))
            .order_by_asc(clusters::Column::Code)
            .into_tuple()
            .all(&self.db)
            .await
    }

    /// Creates an organization and links it to clusters.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        code: &str,
        name: &str,
        org_type: Option<&str>,
        cluster_ids: &[Uuid],
    ) -> Result<organizations::Model, DbErr> {
        let txn = self.db.begin().await?;

        let org = organizations::ActiveModel {
            id: Set(Uuid::now_v7()),
            code: Set(code.to_string()),
            name: Set(name.to_string()),
            org_type: Set(org_type.map(str::to_string)),
            created_at: Set(chrono::Utc::now().into()),
        }
        .insert(&txn)
        .await?;

        for cluster_id in cluster_ids {
            organization_clusters::ActiveModel {
                organization_id: Set(org.id),
                cluster_id: Set(*cluster_id),
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;
        Ok(org)
    }
}
