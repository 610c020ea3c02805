//! Project repository for the planned tree.
//!
//! Covers project creation, the lifecycle cascades to activity plans and
//! target locations, and the three copy operations.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Serialize;
use uuid::Uuid;

use reporthub_core::access::ProjectScope;
use reporthub_core::location::{LocationError, LocationPath, LocationService};
use reporthub_core::planning::{
    CopyRules, PlanSummary, PlanningError, ProjectLifecycle, ProjectState as CoreProjectState,
    ProjectTransition,
};
use reporthub_shared::types::{ActivityPlanId, OrganizationId, PageRequest, UserId};

use crate::entities::{
    activity_plans, activity_types, clusters, disaggregation_locations, indicator_activity_types,
    locations, project_activity_domains, project_clusters, project_donors,
    project_implementing_partners, project_monthly_reports, projects,
    sea_orm_active_enums::{ProjectState, ReportState},
    target_locations,
};
use crate::repositories::location::to_node;

/// Input for creating a project.
#[derive(Debug, Clone)]
pub struct CreateProjectInput {
    /// Organization running the project.
    pub organization_id: Uuid,
    /// Creating user.
    pub user_id: Uuid,
    /// Unique code.
    pub code: String,
    /// Title, at least six characters.
    pub title: String,
    /// HRP code.
    pub hrp_code: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Budget amount.
    pub budget: Option<Decimal>,
    /// Budget currency.
    pub budget_currency: Option<String>,
    /// Start date.
    pub start_date: NaiveDate,
    /// End date.
    pub end_date: NaiveDate,
    /// Clusters.
    pub cluster_ids: Vec<Uuid>,
    /// Activity domains.
    pub activity_domain_ids: Vec<Uuid>,
    /// Donors.
    pub donor_ids: Vec<Uuid>,
    /// Implementing partner organizations.
    pub implementing_partner_ids: Vec<Uuid>,
}

/// Input for adding an activity plan to a project.
#[derive(Debug, Clone)]
pub struct CreateActivityPlanInput {
    /// Activity domain.
    pub activity_domain_id: Uuid,
    /// Activity type, must belong to the domain.
    pub activity_type_id: Uuid,
    /// Optional activity detail.
    pub activity_detail_id: Option<Uuid>,
    /// Indicator, must be measured under the activity type.
    pub indicator_id: Uuid,
    /// Beneficiary type.
    pub beneficiary_id: Option<Uuid>,
    /// HRP beneficiary type.
    pub hrp_beneficiary_id: Option<Uuid>,
    /// Beneficiary category.
    pub beneficiary_category: Option<String>,
    /// Description.
    pub description: Option<String>,
}

/// Input for adding a target location to an activity plan.
#[derive(Debug, Clone, Default)]
pub struct CreateTargetLocationInput {
    /// Country.
    pub country_id: Uuid,
    /// Province inside the country.
    pub province_id: Uuid,
    /// District inside the province.
    pub district_id: Uuid,
    /// Optional zone inside the district.
    pub zone_id: Option<Uuid>,
    /// Location type.
    pub location_type_id: Option<Uuid>,
    /// Implementing partner organization.
    pub implementing_partner_id: Option<Uuid>,
    /// Facility site type.
    pub facility_site_type_id: Option<Uuid>,
    /// Facility monitoring flag.
    pub facility_monitoring: bool,
    /// Facility name.
    pub facility_name: Option<String>,
    /// Facility id.
    pub facility_id: Option<String>,
    /// Facility latitude.
    pub facility_lat: Option<String>,
    /// Facility longitude.
    pub facility_long: Option<String>,
    /// NHS code.
    pub nhs_code: Option<String>,
    /// Planned target per disaggregation.
    pub targets: Vec<(Uuid, i64)>,
}

/// A target location with its planned targets.
#[derive(Debug, Clone, Serialize)]
pub struct TargetLocationTree {
    /// The target location.
    #[serde(flatten)]
    pub location: target_locations::Model,
    /// Planned targets.
    pub disaggregations: Vec<disaggregation_locations::Model>,
}

/// An activity plan with its target locations.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityPlanTree {
    /// The activity plan.
    #[serde(flatten)]
    pub plan: activity_plans::Model,
    /// Target locations.
    pub target_locations: Vec<TargetLocationTree>,
}

/// A project with its links and planned tree.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDetail {
    /// The project.
    #[serde(flatten)]
    pub project: projects::Model,
    /// Cluster ids.
    pub cluster_ids: Vec<Uuid>,
    /// Activity domain ids.
    pub activity_domain_ids: Vec<Uuid>,
    /// Donor ids.
    pub donor_ids: Vec<Uuid>,
    /// Implementing partner ids.
    pub implementing_partner_ids: Vec<Uuid>,
    /// Planned activities.
    pub activity_plans: Vec<ActivityPlanTree>,
}

fn db(e: DbErr) -> PlanningError {
    PlanningError::Database(e.to_string())
}

/// Project repository.
#[derive(Debug, Clone)]
pub struct ProjectRepository {
    db: DatabaseConnection,
}

impl ProjectRepository {
    /// Creates a new project repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a project by ID.
    ///
    /// # Errors
    ///
    /// Returns `ProjectNotFound` if the project does not exist.
    pub async fn find(&self, project_id: Uuid) -> Result<projects::Model, PlanningError> {
        find_project(&self.db, project_id).await
    }

    /// Returns `ActivityPlanNotFound` if the plan does not exist.
    pub async fn find_activity_plan(
        &self,
        activity_plan_id: Uuid,
    ) -> Result<activity_plans::Model, PlanningError> {
        find_plan(&self.db, activity_plan_id).await
    }

    /// Returns `TargetLocationNotFound` if the target location does not exist.
    pub async fn find_target_location(
        &self,
        target_location_id: Uuid,
    ) -> Result<target_locations::Model, PlanningError> {
        target_locations::Entity::find_by_id(target_location_id)
            .one(&self.db)
            .await
            .map_err(db)?
            .ok_or(PlanningError::TargetLocationNotFound(target_location_id))
    }

    /// Lists the projects of an organization, newest first.
    pub async fn list(
        &self,
        organization_id: Uuid,
        page: &PageRequest,
    ) -> Result<(Vec<projects::Model>, u64), PlanningError> {
        let page = page.normalized();
        let paginator = projects::Entity::find()
            .filter(projects::Column::OrganizationId.eq(organization_id))
            .order_by_desc(projects::Column::CreatedAt)
            .paginate(&self.db, page.limit());

        let total = paginator.num_items().await.map_err(db)?;
        let items = paginator.fetch_page(page.page_index()).await.map_err(db)?;
        Ok((items, total))
    }

    /// Ownership data used by the access rules.
    pub async fn scope(&self, project_id: Uuid) -> Result<ProjectScope, PlanningError> {
        let project = self.find(project_id).await?;
        let cluster_ids: Vec<Uuid> = project_clusters::Entity::find()
            .select_only()
            .column(project_clusters::Column::ClusterId)
            .filter(project_clusters::Column::ProjectId.eq(project_id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db)?;

        let cluster_codes: Vec<String> = clusters::Entity::find()
            .select_only()
            .column(clusters::Column::Code)
            .filter(clusters::Column::Id.is_in(cluster_ids))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db)?;

        Ok(ProjectScope {
            owner_id: project.user_id.map(UserId::from_uuid),
            organization_id: OrganizationId::from_uuid(project.organization_id),
            cluster_codes,
        })
    }

    /// Loads a project with its links and full planned tree.
    pub async fn detail(&self, project_id: Uuid) -> Result<ProjectDetail, PlanningError> {
        let project = self.find(project_id).await?;

        let cluster_ids = project_clusters::Entity::find()
            .filter(project_clusters::Column::ProjectId.eq(project_id))
            .all(&self.db)
            .await
            .map_err(db)?
            .into_iter()
            .map(|l| l.cluster_id)
            .collect();
        let activity_domain_ids = project_activity_domains::Entity::find()
            .filter(project_activity_domains::Column::ProjectId.eq(project_id))
            .all(&self.db)
            .await
            .map_err(db)?
            .into_iter()
            .map(|l| l.activity_domain_id)
            .collect();
        let donor_ids = project_donors::Entity::find()
            .filter(project_donors::Column::ProjectId.eq(project_id))
            .all(&self.db)
            .await
            .map_err(db)?
            .into_iter()
            .map(|l| l.donor_id)
            .collect();
        let implementing_partner_ids = project_implementing_partners::Entity::find()
            .filter(project_implementing_partners::Column::ProjectId.eq(project_id))
            .all(&self.db)
            .await
            .map_err(db)?
            .into_iter()
            .map(|l| l.organization_id)
            .collect();

        let plans = activity_plans::Entity::find()
            .filter(activity_plans::Column::ProjectId.eq(project_id))
            .order_by_asc(activity_plans::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db)?;
        let locations = target_locations::Entity::find()
            .filter(target_locations::Column::ProjectId.eq(project_id))
            .order_by_asc(target_locations::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db)?;
        let mut targets: HashMap<Uuid, Vec<disaggregation_locations::Model>> = HashMap::new();
        for row in disaggregation_locations::Entity::find()
            .filter(
                disaggregation_locations::Column::TargetLocationId
                    .is_in(locations.iter().map(|l| l.id)),
            )
            .all(&self.db)
            .await
            .map_err(db)?
        {
            targets.entry(row.target_location_id).or_default().push(row);
        }

        let mut by_plan: HashMap<Uuid, Vec<TargetLocationTree>> = HashMap::new();
        for location in locations {
            let disaggregations = targets.remove(&location.id).unwrap_or_default();
            by_plan
                .entry(location.activity_plan_id)
                .or_default()
                .push(TargetLocationTree {
                    location,
                    disaggregations,
                });
        }

        let activity_plans = plans
            .into_iter()
            .map(|plan| ActivityPlanTree {
                target_locations: by_plan.remove(&plan.id).unwrap_or_default(),
                plan,
            })
            .collect();

        Ok(ProjectDetail {
            project,
            cluster_ids,
            activity_domain_ids,
            donor_ids,
            implementing_partner_ids,
            activity_plans,
        })
    }

    /// Creates a draft project with its links.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The title is shorter than six characters
    /// - The end date is before the start date
    /// - The code is already taken
    /// - Database operation fails
    pub async fn create(&self, input: CreateProjectInput) -> Result<projects::Model, PlanningError> {
        ProjectLifecycle::validate_details(&input.title, input.start_date, input.end_date)?;

        if code_taken(&self.db, &input.code).await.map_err(db)? {
            return Err(PlanningError::DuplicateCode(input.code));
        }

        let txn = self.db.begin().await.map_err(db)?;
        let now = Utc::now().into();

        let project = projects::ActiveModel {
            id: Set(Uuid::now_v7()),
            organization_id: Set(input.organization_id),
            user_id: Set(Some(input.user_id)),
            code: Set(input.code),
            title: Set(input.title.trim().to_string()),
            hrp_code: Set(input.hrp_code),
            description: Set(input.description),
            budget: Set(input.budget),
            budget_currency: Set(input.budget_currency),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            state: Set(ProjectState::Draft),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(db)?;

        insert_links(
            &txn,
            project.id,
            &ProjectLinks {
                cluster_ids: input.cluster_ids,
                activity_domain_ids: input.activity_domain_ids,
                donor_ids: input.donor_ids,
                implementing_partner_ids: input.implementing_partner_ids,
            },
        )
        .await
        .map_err(db)?;

        txn.commit().await.map_err(db)?;

        tracing::info!(project_id = %project.id, code = %project.code, "Project created");
        Ok(project)
    }

    /// Adds an activity plan to an editable project.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The project is not found or not editable
    /// - The activity type is outside the domain, or the indicator outside the type
    /// - Database operation fails
    pub async fn create_activity_plan(
        &self,
        project_id: Uuid,
        input: CreateActivityPlanInput,
    ) -> Result<activity_plans::Model, PlanningError> {
        let project = self.find(project_id).await?;
        ProjectLifecycle::ensure_editable(project.state.into())?;

        let activity_type = activity_types::Entity::find_by_id(input.activity_type_id)
            .one(&self.db)
            .await
            .map_err(db)?
            .filter(|t| t.activity_domain_id == input.activity_domain_id)
            .ok_or_else(|| {
                PlanningError::ActivityMismatch(
                    "Activity type does not belong to the activity domain".to_string(),
                )
            })?;

        let measured = indicator_activity_types::Entity::find()
            .filter(indicator_activity_types::Column::IndicatorId.eq(input.indicator_id))
            .filter(indicator_activity_types::Column::ActivityTypeId.eq(activity_type.id))
            .count(&self.db)
            .await
            .map_err(db)?;
        if measured == 0 {
            return Err(PlanningError::ActivityMismatch(
                "Indicator is not measured under the activity type".to_string(),
            ));
        }

        let now = Utc::now().into();
        let plan = activity_plans::ActiveModel {
            id: Set(Uuid::now_v7()),
            project_id: Set(project_id),
            activity_domain_id: Set(input.activity_domain_id),
            activity_type_id: Set(input.activity_type_id),
            activity_detail_id: Set(input.activity_detail_id),
            indicator_id: Set(input.indicator_id),
            beneficiary_id: Set(input.beneficiary_id),
            hrp_beneficiary_id: Set(input.hrp_beneficiary_id),
            beneficiary_category: Set(input.beneficiary_category),
            description: Set(input.description),
            state: Set(project.state),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(db)?;

        Ok(plan)
    }

    /// Adds a target location with its planned targets to an activity plan.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The plan is not found or its project is not editable
    /// - The locations do not form a country, province, district (zone) chain
    /// - A target is negative
    /// - Database operation fails
    pub async fn create_target_location(
        &self,
        activity_plan_id: Uuid,
        input: CreateTargetLocationInput,
    ) -> Result<TargetLocationTree, PlanningError> {
        let plan = find_plan(&self.db, activity_plan_id).await?;
        let project = self.find(plan.project_id).await?;
        ProjectLifecycle::ensure_editable(project.state.into())?;

        if input.targets.iter().any(|(_, target)| *target < 0) {
            return Err(PlanningError::NegativeTarget);
        }
        self.validate_locations(&input).await?;

        let txn = self.db.begin().await.map_err(db)?;
        let now = Utc::now().into();

        let location = target_locations::ActiveModel {
            id: Set(Uuid::now_v7()),
            project_id: Set(plan.project_id),
            activity_plan_id: Set(plan.id),
            country_id: Set(input.country_id),
            province_id: Set(input.province_id),
            district_id: Set(input.district_id),
            zone_id: Set(input.zone_id),
            location_type_id: Set(input.location_type_id),
            implementing_partner_id: Set(input.implementing_partner_id),
            facility_site_type_id: Set(input.facility_site_type_id),
            facility_monitoring: Set(input.facility_monitoring),
            facility_name: Set(input.facility_name),
            facility_id: Set(input.facility_id),
            facility_lat: Set(input.facility_lat),
            facility_long: Set(input.facility_long),
            nhs_code: Set(input.nhs_code),
            state: Set(plan.state),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(db)?;

        let mut disaggregations = Vec::with_capacity(input.targets.len());
        for (disaggregation_id, target) in input.targets {
            let row = disaggregation_locations::ActiveModel {
                id: Set(Uuid::now_v7()),
                target_location_id: Set(location.id),
                disaggregation_id: Set(disaggregation_id),
                target: Set(target),
                created_at: Set(now),
            }
            .insert(&txn)
            .await
            .map_err(db)?;
            disaggregations.push(row);
        }

        txn.commit().await.map_err(db)?;

        Ok(TargetLocationTree {
            location,
            disaggregations,
        })
    }

    /// Submits a draft project and cascades `in-progress` to its tree.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The project is not a draft
    /// - It has no activity plans, or a plan has no target locations
    /// - Database operation fails
    pub async fn submit(&self, project_id: Uuid) -> Result<projects::Model, PlanningError> {
        let project = self.find(project_id).await?;
        let plans = self.plan_summaries(project_id).await?;
        let transition = ProjectLifecycle::submit(project.state.into(), &plans)?;
        self.apply(project_id, transition).await
    }

    /// Archives a project and its tree.
    pub async fn archive(&self, project_id: Uuid) -> Result<projects::Model, PlanningError> {
        let project = self.find(project_id).await?;
        let transition = ProjectLifecycle::archive(project.state.into())?;
        self.apply(project_id, transition).await
    }

    /// Brings an archived project back as a draft.
    pub async fn unarchive(&self, project_id: Uuid) -> Result<projects::Model, PlanningError> {
        let project = self.find(project_id).await?;
        let transition = ProjectLifecycle::unarchive(project.state.into())?;
        self.apply(project_id, transition).await
    }

    /// Completes an in-progress project once no report is pending or under review.
    pub async fn complete(&self, project_id: Uuid) -> Result<projects::Model, PlanningError> {
        let project = self.find(project_id).await?;
        let open_reports = project_monthly_reports::Entity::find()
            .filter(project_monthly_reports::Column::ProjectId.eq(project_id))
            .filter(
                project_monthly_reports::Column::State
                    .is_in([ReportState::Pending, ReportState::Submitted]),
            )
            .count(&self.db)
            .await
            .map_err(db)?;

        let transition = ProjectLifecycle::complete(project.state.into(), open_reports)?;
        self.apply(project_id, transition).await
    }

    /// Deletes a project and everything under it.
    ///
    /// # Errors
    ///
    /// Returns `CannotDeleteArchived` for archived projects.
    pub async fn delete(&self, project_id: Uuid) -> Result<(), PlanningError> {
        let project = self.find(project_id).await?;
        ProjectLifecycle::ensure_deletable(project.state.into())?;

        projects::Entity::delete_by_id(project_id)
            .exec(&self.db)
            .await
            .map_err(db)?;

        tracing::info!(project_id = %project_id, "Project deleted");
        Ok(())
    }

    /// Duplicates a project with its links and planned tree.
    ///
    /// The copy is an active draft owned by `user_id`, with `DUPLICATED-`
    /// in front of its title and code.
    pub async fn copy_project(
        &self,
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<projects::Model, PlanningError> {
        let source = self.find(project_id).await?;
        let links = self.links(project_id).await?;

        let txn = self.db.begin().await.map_err(db)?;

        let mut attempt = 0;
        let code = loop {
            let candidate = CopyRules::duplicate_code(&source.code, attempt);
            if !code_taken(&txn, &candidate).await.map_err(db)? {
                break candidate;
            }
            attempt += 1;
        };

        let copied = CopyRules::copied_row();
        let now = Utc::now().into();
        let mut project: projects::ActiveModel = source.clone().into();
        project = project.reset_all();
        project.id = Set(Uuid::now_v7());
        project.user_id = Set(Some(user_id));
        project.code = Set(code);
        project.title = Set(CopyRules::duplicate_title(&source.title));
        project.state = Set(copied.new_state.into());
        project.is_active = Set(copied.is_active);
        project.created_at = Set(now);
        project.updated_at = Set(now);
        let project = project.insert(&txn).await.map_err(db)?;

        insert_links(&txn, project.id, &links).await.map_err(db)?;

        let plans = activity_plans::Entity::find()
            .filter(activity_plans::Column::ProjectId.eq(project_id))
            .order_by_asc(activity_plans::Column::CreatedAt)
            .all(&txn)
            .await
            .map_err(db)?;
        for plan in &plans {
            copy_plan_tree(&txn, plan, project.id).await.map_err(db)?;
        }

        txn.commit().await.map_err(db)?;

        tracing::info!(
            source_id = %project_id,
            project_id = %project.id,
            activity_plans = plans.len(),
            "Project copied"
        );
        Ok(project)
    }

    /// Duplicates an activity plan and its target locations inside its project.
    pub async fn copy_activity_plan(
        &self,
        activity_plan_id: Uuid,
    ) -> Result<activity_plans::Model, PlanningError> {
        let plan = find_plan(&self.db, activity_plan_id).await?;
        let project = self.find(plan.project_id).await?;
        ProjectLifecycle::ensure_editable(project.state.into())?;

        let txn = self.db.begin().await.map_err(db)?;
        let copy = copy_plan_tree(&txn, &plan, plan.project_id)
            .await
            .map_err(db)?;
        txn.commit().await.map_err(db)?;

        tracing::info!(source_id = %activity_plan_id, activity_plan_id = %copy.id, "Activity plan copied");
        Ok(copy)
    }

    /// Duplicates a target location and its targets inside its activity plan.
    pub async fn copy_target_location(
        &self,
        target_location_id: Uuid,
    ) -> Result<target_locations::Model, PlanningError> {
        let location = target_locations::Entity::find_by_id(target_location_id)
            .one(&self.db)
            .await
            .map_err(db)?
            .ok_or(PlanningError::TargetLocationNotFound(target_location_id))?;
        let project = self.find(location.project_id).await?;
        ProjectLifecycle::ensure_editable(project.state.into())?;

        let txn = self.db.begin().await.map_err(db)?;
        let copy = copy_location_tree(
            &txn,
            &location,
            location.activity_plan_id,
            location.project_id,
        )
        .await
        .map_err(db)?;
        txn.commit().await.map_err(db)?;

        tracing::info!(source_id = %target_location_id, target_location_id = %copy.id, "Target location copied");
        Ok(copy)
    }

    // ========================================================================
    // Helper methods
    // ========================================================================

    /// Target location count of every activity plan of a project.
    async fn plan_summaries(&self, project_id: Uuid) -> Result<Vec<PlanSummary>, PlanningError> {
        let plan_ids: Vec<Uuid> = activity_plans::Entity::find()
            .select_only()
            .column(activity_plans::Column::Id)
            .filter(activity_plans::Column::ProjectId.eq(project_id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db)?;

        let location_plans: Vec<Uuid> = target_locations::Entity::find()
            .select_only()
            .column(target_locations::Column::ActivityPlanId)
            .filter(target_locations::Column::ProjectId.eq(project_id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db)?;

        let mut counts: HashMap<Uuid, usize> = HashMap::new();
        for plan_id in location_plans {
            *counts.entry(plan_id).or_default() += 1;
        }

        Ok(plan_ids
            .into_iter()
            .map(|id| PlanSummary {
                activity_plan_id: ActivityPlanId::from_uuid(id),
                target_locations: counts.get(&id).copied().unwrap_or(0),
            })
            .collect())
    }

    /// Writes a transition to the project, its plans and its target locations.
    async fn apply(
        &self,
        project_id: Uuid,
        transition: ProjectTransition,
    ) -> Result<projects::Model, PlanningError> {
        let state: ProjectState = transition.new_state.into();
        let txn = self.db.begin().await.map_err(db)?;

        activity_plans::Entity::update_many()
            .set(activity_plans::ActiveModel {
                state: Set(state),
                is_active: Set(transition.is_active),
                ..Default::default()
            })
            .filter(activity_plans::Column::ProjectId.eq(project_id))
            .exec(&txn)
            .await
            .map_err(db)?;

        target_locations::Entity::update_many()
            .set(target_locations::ActiveModel {
                state: Set(state),
                is_active: Set(transition.is_active),
                ..Default::default()
            })
            .filter(target_locations::Column::ProjectId.eq(project_id))
            .exec(&txn)
            .await
            .map_err(db)?;

        let project = projects::ActiveModel {
            id: Set(project_id),
            state: Set(state),
            is_active: Set(transition.is_active),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .update(&txn)
        .await
        .map_err(db)?;

        txn.commit().await.map_err(db)?;

        tracing::info!(project_id = %project_id, state = %CoreProjectState::from(state), "Project state changed");
        Ok(project)
    }

    async fn links(&self, project_id: Uuid) -> Result<ProjectLinks, PlanningError> {
        let detail_links = ProjectLinks {
            cluster_ids: project_clusters::Entity::find()
                .select_only()
                .column(project_clusters::Column::ClusterId)
                .filter(project_clusters::Column::ProjectId.eq(project_id))
                .into_tuple()
                .all(&self.db)
                .await
                .map_err(db)?,
            activity_domain_ids: project_activity_domains::Entity::find()
                .select_only()
                .column(project_activity_domains::Column::ActivityDomainId)
                .filter(project_activity_domains::Column::ProjectId.eq(project_id))
                .into_tuple()
                .all(&self.db)
                .await
                .map_err(db)?,
            donor_ids: project_donors::Entity::find()
                .select_only()
                .column(project_donors::Column::DonorId)
                .filter(project_donors::Column::ProjectId.eq(project_id))
                .into_tuple()
                .all(&self.db)
                .await
                .map_err(db)?,
            implementing_partner_ids: project_implementing_partners::Entity::find()
                .select_only()
                .column(project_implementing_partners::Column::OrganizationId)
                .filter(project_implementing_partners::Column::ProjectId.eq(project_id))
                .into_tuple()
                .all(&self.db)
                .await
                .map_err(db)?,
        };
        Ok(detail_links)
    }

    async fn validate_locations(
        &self,
        input: &CreateTargetLocationInput,
    ) -> Result<(), PlanningError> {
        let mut ids = vec![input.country_id, input.province_id, input.district_id];
        ids.extend(input.zone_id);

        let models = locations::Entity::find()
            .filter(locations::Column::Id.is_in(ids))
            .all(&self.db)
            .await
            .map_err(db)?;
        let nodes = models
            .iter()
            .map(|m| to_node(m).map(|n| (m.id, n)))
            .collect::<Result<HashMap<_, _>, _>>()?;

        let node = |id: Uuid| {
            nodes
                .get(&id)
                .ok_or_else(|| LocationError::NotFound(id.to_string()))
        };

        LocationService::validate_path(&LocationPath {
            country: node(input.country_id)?,
            province: node(input.province_id)?,
            district: node(input.district_id)?,
            zone: input.zone_id.map(node).transpose()?,
        })?;
        Ok(())
    }
}

/// Links copied together with a project.
#[derive(Debug, Clone, Default)]
struct ProjectLinks {
    cluster_ids: Vec<Uuid>,
    activity_domain_ids: Vec<Uuid>,
    donor_ids: Vec<Uuid>,
    implementing_partner_ids: Vec<Uuid>,
}

async fn insert_links<C: ConnectionTrait>(
    conn: &C,
    project_id: Uuid,
    links: &ProjectLinks,
) -> Result<(), DbErr> {
    for cluster_id in &links.cluster_ids {
        project_clusters::ActiveModel {
            project_id: Set(project_id),
            cluster_id: Set(*cluster_id),
        }
        .insert(conn)
        .await?;
    }
    for activity_domain_id in &links.activity_domain_ids {
        project_activity_domains::ActiveModel {
            project_id: Set(project_id),
            activity_domain_id: Set(*activity_domain_id),
        }
        .insert(conn)
        .await?;
    }
    for donor_id in &links.donor_ids {
        project_donors::ActiveModel {
            project_id: Set(project_id),
            donor_id: Set(*donor_id),
        }
        .insert(conn)
        .await?;
    }
    for organization_id in &links.implementing_partner_ids {
        project_implementing_partners::ActiveModel {
            project_id: Set(project_id),
            organization_id: Set(*organization_id),
        }
        .insert(conn)
        .await?;
    }
    Ok(())
}

pub(crate) async fn find_project<C: ConnectionTrait>(
    conn: &C,
    project_id: Uuid,
) -> Result<projects::Model, PlanningError> {
    projects::Entity::find_by_id(project_id)
        .one(conn)
        .await
        .map_err(db)?
        .ok_or(PlanningError::ProjectNotFound(project_id))
}

async fn find_plan<C: ConnectionTrait>(
    conn: &C,
    activity_plan_id: Uuid,
) -> Result<activity_plans::Model, PlanningError> {
    activity_plans::Entity::find_by_id(activity_plan_id)
        .one(conn)
        .await
        .map_err(db)?
        .ok_or(PlanningError::ActivityPlanNotFound(activity_plan_id))
}

async fn code_taken<C: ConnectionTrait>(conn: &C, code: &str) -> Result<bool, DbErr> {
    let count = projects::Entity::find()
        .filter(projects::Column::Code.eq(code))
        .count(conn)
        .await?;
    Ok(count > 0)
}

/// Copies an activity plan, its target locations and their targets under `project_id`.
async fn copy_plan_tree<C: ConnectionTrait>(
    conn: &C,
    plan: &activity_plans::Model,
    project_id: Uuid,
) -> Result<activity_plans::Model, DbErr> {
    let copied = CopyRules::copied_row();
    let now = Utc::now().into();

    let mut active: activity_plans::ActiveModel = plan.clone().into();
    active = active.reset_all();
    active.id = Set(Uuid::now_v7());
    active.project_id = Set(project_id);
    active.state = Set(copied.new_state.into());
    active.is_active = Set(copied.is_active);
    active.created_at = Set(now);
    active.updated_at = Set(now);
    let new_plan = active.insert(conn).await?;

    let locations = target_locations::Entity::find()
        .filter(target_locations::Column::ActivityPlanId.eq(plan.id))
        .order_by_asc(target_locations::Column::CreatedAt)
        .all(conn)
        .await?;
    for location in &locations {
        copy_location_tree(conn, location, new_plan.id, project_id).await?;
    }

    Ok(new_plan)
}

/// Copies a target location and its targets under `activity_plan_id`.
async fn copy_location_tree<C: ConnectionTrait>(
    conn: &C,
    location: &target_locations::Model,
    activity_plan_id: Uuid,
    project_id: Uuid,
) -> Result<target_locations::Model, DbErr> {
    let copied = CopyRules::copied_row();
    let now = Utc::now().into();

    let mut active: target_locations::ActiveModel = location.clone().into();
    active = active.reset_all();
    active.id = Set(Uuid::now_v7());
    active.activity_plan_id = Set(activity_plan_id);
    active.project_id = Set(project_id);
    active.state = Set(copied.new_state.into());
    active.is_active = Set(copied.is_active);
    active.created_at = Set(now);
    active.updated_at = Set(now);
    let new_location = active.insert(conn).await?;

    let targets = disaggregation_locations::Entity::find()
        .filter(disaggregation_locations::Column::TargetLocationId.eq(location.id))
        .all(conn)
        .await?;
    for target in targets {
        disaggregation_locations::ActiveModel {
            id: Set(Uuid::now_v7()),
            target_location_id: Set(new_location.id),
            disaggregation_id: Set(target.disaggregation_id),
            target: Set(target.target),
            created_at: Set(now),
        }
        .insert(conn)
        .await?;
    }

    Ok(new_location)
}
