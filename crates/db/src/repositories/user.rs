//! User repository for database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{user_groups, users};

/// User repository.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(&self.db).await
    }

    /// Group names of a user, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn groups(&self, user_id: Uuid) -> Result<Vec<String>, DbErr> {
        user_groups::Entity::find()
            .select_only()
            .column(user_groups::Column::GroupName)
            .filter(user_groups::Column::UserId.eq(user_id))
            .order_by_asc(user_groups::Column::GroupName)
            .into_tuple()
            .all(&self.db)
            .await
    }

    /// Creates a user together with its group memberships.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        email: &str,
        full_name: &str,
        organization_id: Option<Uuid>,
        is_superuser: bool,
        groups: &[String],
    ) -> Result<users::Model, DbErr> {
        let txn = self.db.begin().await?;

        let user = users::ActiveModel {
            id: Set(Uuid::now_v7()),
            email: Set(email.to_string()),
            full_name: Set(full_name.to_string()),
            organization_id: Set(organization_id),
            is_superuser: Set(is_superuser),
            created_at: Set(chrono::Utc::now().into()),
        }
        .insert(&txn)
        .await?;

        for group in groups {
            user_groups::ActiveModel {
                user_id: Set(user.id),
                group_name: Set(group.clone()),
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;
        Ok(user)
    }
}
