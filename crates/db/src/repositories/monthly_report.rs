//! Monthly report repository.
//!
//! Handles the report lifecycle, copy-forward from the last approved
//! report and generation of one report per reporting month.

use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Serialize;
use uuid::Uuid;

use reporthub_core::planning::ProjectState as CoreProjectState;
use reporthub_core::reporting::{
    CarryOver, DisaggregationValues, PlanReportCompleteness, ReportAction, ReportError,
    ReportLifecycle, ReportState as CoreReportState, ReportingPeriod, ReportingPolicy,
};
use reporthub_shared::types::{ActivityPlanReportId, PageRequest};

use crate::entities::{
    activity_plan_reports, disaggregation_location_reports, project_monthly_reports, projects,
    sea_orm_active_enums::{BeneficiaryStatus, ReportState},
    target_location_reports,
};
use crate::repositories::report_entry::recompute_target_achieved;

/// Input for creating a monthly report.
#[derive(Debug, Clone, Default)]
pub struct CreateMonthlyReportInput {
    /// First day covered, defaults to the first day of `to_date`'s month.
    pub from_date: Option<NaiveDate>,
    /// Last day covered, defaults to the last day of the current month.
    pub to_date: Option<NaiveDate>,
    /// Description.
    pub description: Option<String>,
}

/// A target location report with its values.
#[derive(Debug, Clone, Serialize)]
pub struct LocationReportTree {
    /// The target location report.
    #[serde(flatten)]
    pub location_report: target_location_reports::Model,
    /// Values per disaggregation.
    pub disaggregations: Vec<disaggregation_location_reports::Model>,
}

/// An activity plan report with its location reports.
#[derive(Debug, Clone, Serialize)]
pub struct PlanReportTree {
    /// The activity plan report.
    #[serde(flatten)]
    pub plan_report: activity_plan_reports::Model,
    /// Location reports.
    pub location_reports: Vec<LocationReportTree>,
}

/// A monthly report with its full tree.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyReportTree {
    /// The report.
    #[serde(flatten)]
    pub report: project_monthly_reports::Model,
    /// Display title such as `March, 2024 Report`.
    pub title: Option<String>,
    /// Activity plan reports.
    pub plan_reports: Vec<PlanReportTree>,
}

/// Result of generating reporting periods.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncOutcome {
    /// Reports created for months without one.
    pub created: usize,
    /// Empty reports removed because they fall outside the project dates.
    pub deleted: usize,
}

fn db(e: DbErr) -> ReportError {
    ReportError::Database(e.to_string())
}

/// Monthly report repository.
#[derive(Debug, Clone)]
pub struct MonthlyReportRepository {
    db: DatabaseConnection,
    policy: ReportingPolicy,
}

impl MonthlyReportRepository {
    /// Creates a new monthly report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, policy: ReportingPolicy) -> Self {
        Self { db, policy }
    }

    /// Finds a report by ID.
    ///
    /// # Errors
    ///
    /// Returns `ReportNotFound` if the report does not exist.
    pub async fn find(&self, report_id: Uuid) -> Result<project_monthly_reports::Model, ReportError> {
        find_report(&self.db, report_id).await
    }

    /// Lists the reports of a project, latest period first.
    pub async fn list(
        &self,
        project_id: Uuid,
        state: Option<CoreReportState>,
        page: &PageRequest,
    ) -> Result<(Vec<project_monthly_reports::Model>, u64), ReportError> {
        let page = page.normalized();
        let mut query = project_monthly_reports::Entity::find()
            .filter(project_monthly_reports::Column::ProjectId.eq(project_id));
        if let Some(state) = state {
            query = query.filter(project_monthly_reports::Column::State.eq(ReportState::from(state)));
        }

        let paginator = query
            .order_by_desc(project_monthly_reports::Column::FromDate)
            .order_by_desc(project_monthly_reports::Column::CreatedAt)
            .paginate(&self.db, page.limit());

        let total = paginator.num_items().await.map_err(db)?;
        let items = paginator.fetch_page(page.page_index()).await.map_err(db)?;
        Ok((items, total))
    }

    /// Loads a report with its plan reports, location reports and values.
    pub async fn tree(&self, report_id: Uuid) -> Result<MonthlyReportTree, ReportError> {
        let report = self.find(report_id).await?;

        let plan_reports = activity_plan_reports::Entity::find()
            .filter(activity_plan_reports::Column::MonthlyReportId.eq(report_id))
            .order_by_asc(activity_plan_reports::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db)?;
        let location_reports = target_location_reports::Entity::find()
            .filter(
                target_location_reports::Column::ActivityPlanReportId
                    .is_in(plan_reports.iter().map(|p| p.id)),
            )
            .order_by_asc(target_location_reports::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db)?;

        let mut values: HashMap<Uuid, Vec<disaggregation_location_reports::Model>> = HashMap::new();
        for row in disaggregation_location_reports::Entity::find()
            .filter(
                disaggregation_location_reports::Column::TargetLocationReportId
                    .is_in(location_reports.iter().map(|l| l.id)),
            )
            .all(&self.db)
            .await
            .map_err(db)?
        {
            values.entry(row.target_location_report_id).or_default().push(row);
        }

        let mut by_plan_report: HashMap<Uuid, Vec<LocationReportTree>> = HashMap::new();
        for location_report in location_reports {
            let disaggregations = values.remove(&location_report.id).unwrap_or_default();
            by_plan_report
                .entry(location_report.activity_plan_report_id)
                .or_default()
                .push(LocationReportTree {
                    location_report,
                    disaggregations,
                });
        }

        let plan_reports = plan_reports
            .into_iter()
            .map(|plan_report| PlanReportTree {
                location_reports: by_plan_report.remove(&plan_report.id).unwrap_or_default(),
                plan_report,
            })
            .collect();

        Ok(MonthlyReportTree {
            title: ReportingPeriod::title(report.from_date, report.to_date),
            report,
            plan_reports,
        })
    }

    /// Opens a report for an in-progress project.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The project is not found or not in progress
    /// - The period ends before it starts
    /// - Database operation fails
    pub async fn create(
        &self,
        project_id: Uuid,
        input: CreateMonthlyReportInput,
    ) -> Result<project_monthly_reports::Model, ReportError> {
        let project = find_project(&self.db, project_id).await?;
        let state = ReportLifecycle::initial_state(&self.policy, project.state.into())?;
        let (from_date, to_date) =
            ReportingPeriod::resolve(input.from_date, input.to_date, Utc::now().date_naive())?;

        let report = insert_report(
            &self.db,
            project_id,
            state.into(),
            from_date,
            to_date,
            input.description,
        )
        .await
        .map_err(db)?;

        tracing::info!(
            report_id = %report.id,
            project_id = %project_id,
            from_date = %from_date,
            state = %state,
            "Monthly report created"
        );
        Ok(report)
    }

    /// Submits a report.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The report is not in `todo`, `pending` or `rejected`
    /// - It has no activity plan reports, or one of them has no location reports
    /// - Database operation fails
    pub async fn submit(&self, report_id: Uuid) -> Result<project_monthly_reports::Model, ReportError> {
        let report = self.find(report_id).await?;
        let completeness = self.completeness(report_id).await?;
        let action = ReportLifecycle::submit(&self.policy, report.state.into(), &completeness)?;
        self.apply(report_id, action).await
    }

    /// Approves a submitted report.
    pub async fn approve(&self, report_id: Uuid) -> Result<project_monthly_reports::Model, ReportError> {
        let report = self.find(report_id).await?;
        let action = ReportLifecycle::approve(report.state.into())?;
        self.apply(report_id, action).await
    }

    /// Sends a submitted or completed report back with a reason.
    pub async fn reject(
        &self,
        report_id: Uuid,
        reason: &str,
    ) -> Result<project_monthly_reports::Model, ReportError> {
        let report = self.find(report_id).await?;
        let action = ReportLifecycle::reject(report.state.into(), reason)?;
        self.apply(report_id, action).await
    }

    /// Archives a report.
    pub async fn archive(&self, report_id: Uuid) -> Result<project_monthly_reports::Model, ReportError> {
        let report = self.find(report_id).await?;
        let action = ReportLifecycle::archive(report.state.into())?;
        self.apply(report_id, action).await
    }

    /// Reopens an archived report as `todo`.
    pub async fn unarchive(&self, report_id: Uuid) -> Result<project_monthly_reports::Model, ReportError> {
        let report = self.find(report_id).await?;
        let action = ReportLifecycle::unarchive(report.state.into())?;
        self.apply(report_id, action).await
    }

    /// Deletes a report and its entries.
    ///
    /// # Errors
    ///
    /// Returns `CannotDeleteArchived` for archived reports.
    pub async fn delete(&self, report_id: Uuid) -> Result<(), ReportError> {
        let report = self.find(report_id).await?;
        ReportLifecycle::ensure_deletable(report.state.into())?;

        project_monthly_reports::Entity::delete_by_id(report_id)
            .exec(&self.db)
            .await
            .map_err(db)?;

        tracing::info!(report_id = %report_id, "Monthly report deleted");
        Ok(())
    }

    /// Replaces the entries of a report with a copy of the last approved report.
    ///
    /// The source is the project's completed report with the latest
    /// `approved_on`. Values are carried over according to the configured
    /// policy, copied locations count as existing beneficiaries and the
    /// report goes back to `pending`. Everything runs in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The report is not editable
    /// - No other completed report exists (`NoApprovedSource`)
    /// - Database operation fails
    pub async fn copy_forward(
        &self,
        report_id: Uuid,
    ) -> Result<project_monthly_reports::Model, ReportError> {
        let target = self.find(report_id).await?;
        ReportLifecycle::ensure_copy_target(target.state.into())?;

        let source = project_monthly_reports::Entity::find()
            .filter(project_monthly_reports::Column::ProjectId.eq(target.project_id))
            .filter(project_monthly_reports::Column::State.eq(ReportState::Completed))
            .filter(project_monthly_reports::Column::Id.ne(report_id))
            .filter(project_monthly_reports::Column::ApprovedOn.is_not_null())
            .order_by_desc(project_monthly_reports::Column::ApprovedOn)
            .one(&self.db)
            .await
            .map_err(db)?
            .ok_or(ReportError::NoApprovedSource)?;

        let txn = self.db.begin().await.map_err(db)?;

        activity_plan_reports::Entity::delete_many()
            .filter(activity_plan_reports::Column::MonthlyReportId.eq(report_id))
            .exec(&txn)
            .await
            .map_err(db)?;

        let source_plans = activity_plan_reports::Entity::find()
            .filter(activity_plan_reports::Column::MonthlyReportId.eq(source.id))
            .order_by_asc(activity_plan_reports::Column::CreatedAt)
            .all(&txn)
            .await
            .map_err(db)?;

        let mut copied_locations = 0usize;
        for source_plan in &source_plans {
            let plan_report = copy_plan_report(&txn, source_plan, report_id).await.map_err(db)?;
            copied_locations += self
                .copy_location_reports(&txn, source_plan.id, plan_report.id)
                .await
                .map_err(db)?;
            recompute_target_achieved(&txn, plan_report.id).await.map_err(db)?;
        }

        let report = project_monthly_reports::ActiveModel {
            id: Set(report_id),
            state: Set(ReportLifecycle::copy_forward_state().into()),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .update(&txn)
        .await
        .map_err(db)?;

        txn.commit().await.map_err(db)?;

        tracing::info!(
            report_id = %report_id,
            source_id = %source.id,
            plan_reports = source_plans.len(),
            location_reports = copied_locations,
            carry_over = ?self.policy.carry_over,
            "Monthly report copied forward"
        );
        Ok(report)
    }

    /// Creates one report per calendar month of a project up to `today`.
    ///
    /// Months that already have a report are left alone. Empty reports
    /// that no longer overlap the project dates are removed.
    ///
    /// # Errors
    ///
    /// Returns `ProjectNotInProgress` unless the project is in progress.
    pub async fn sync_reporting_periods(
        &self,
        project_id: Uuid,
        today: NaiveDate,
    ) -> Result<SyncOutcome, ReportError> {
        let project = find_project(&self.db, project_id).await?;
        let project_state: CoreProjectState = project.state.into();
        if project_state != CoreProjectState::InProgress {
            return Err(ReportError::ProjectNotInProgress(project_state));
        }

        let existing = project_monthly_reports::Entity::find()
            .filter(project_monthly_reports::Column::ProjectId.eq(project_id))
            .all(&self.db)
            .await
            .map_err(db)?;

        let with_entries: HashSet<Uuid> = activity_plan_reports::Entity::find()
            .select_only()
            .column(activity_plan_reports::Column::MonthlyReportId)
            .filter(
                activity_plan_reports::Column::MonthlyReportId.is_in(existing.iter().map(|r| r.id)),
            )
            .into_tuple::<Uuid>()
            .all(&self.db)
            .await
            .map_err(db)?
            .into_iter()
            .collect();

        // A report covers the month it starts in, wherever in the month it starts.
        let covered: HashSet<NaiveDate> = existing
            .iter()
            .filter_map(|r| r.from_date)
            .map(ReportingPeriod::first_day_of_month)
            .collect();

        let txn = self.db.begin().await.map_err(db)?;
        let mut outcome = SyncOutcome::default();

        for month in ReportingPeriod::months(project.start_date, project.end_date, today) {
            if covered.contains(&month.from_date) {
                continue;
            }
            insert_report(
                &txn,
                project_id,
                month.state.into(),
                month.from_date,
                month.to_date,
                None,
            )
            .await
            .map_err(db)?;
            outcome.created += 1;
        }

        let stale: Vec<Uuid> = existing
            .iter()
            .filter(|r| r.state != ReportState::Archived && !with_entries.contains(&r.id))
            .filter(|r| match (r.from_date, r.to_date) {
                (Some(from), Some(to)) => !ReportingPeriod::overlaps_project(
                    from,
                    to,
                    project.start_date,
                    project.end_date,
                ),
                _ => false,
            })
            .map(|r| r.id)
            .collect();
        if !stale.is_empty() {
            let result = project_monthly_reports::Entity::delete_many()
                .filter(project_monthly_reports::Column::Id.is_in(stale))
                .exec(&txn)
                .await
                .map_err(db)?;
            outcome.deleted = usize::try_from(result.rows_affected).unwrap_or(usize::MAX);
        }

        txn.commit().await.map_err(db)?;

        tracing::info!(
            project_id = %project_id,
            created = outcome.created,
            deleted = outcome.deleted,
            "Reporting periods synchronised"
        );
        Ok(outcome)
    }

    // ========================================================================
    // Helper methods
    // ========================================================================

    async fn completeness(&self, report_id: Uuid) -> Result<Vec<PlanReportCompleteness>, ReportError> {
        let plan_report_ids: Vec<Uuid> = activity_plan_reports::Entity::find()
            .select_only()
            .column(activity_plan_reports::Column::Id)
            .filter(activity_plan_reports::Column::MonthlyReportId.eq(report_id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db)?;

        let parents: Vec<Uuid> = target_location_reports::Entity::find()
            .select_only()
            .column(target_location_reports::Column::ActivityPlanReportId)
            .filter(
                target_location_reports::Column::ActivityPlanReportId
                    .is_in(plan_report_ids.iter().copied()),
            )
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db)?;

        let mut counts: HashMap<Uuid, usize> = HashMap::new();
        for parent in parents {
            *counts.entry(parent).or_default() += 1;
        }

        Ok(plan_report_ids
            .into_iter()
            .map(|id| PlanReportCompleteness {
                plan_report_id: ActivityPlanReportId::from_uuid(id),
                location_reports: counts.get(&id).copied().unwrap_or(0),
            })
            .collect())
    }

    /// Persists a validated action in a single update.
    async fn apply(
        &self,
        report_id: Uuid,
        action: ReportAction,
    ) -> Result<project_monthly_reports::Model, ReportError> {
        let mut active = project_monthly_reports::ActiveModel {
            id: Set(report_id),
            state: Set(action.new_state().into()),
            is_active: Set(action.is_active()),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        };

        match &action {
            ReportAction::Submit {
                submitted_on,
                approved_on,
                ..
            } => {
                active.submitted_on = Set(Some((*submitted_on).into()));
                active.approved_on = Set(approved_on.map(Into::into));
            }
            ReportAction::Approve { approved_on, .. } => {
                active.approved_on = Set(Some((*approved_on).into()));
            }
            ReportAction::Reject {
                rejected_on, reason, ..
            } => {
                active.rejected_on = Set(Some((*rejected_on).into()));
                active.comments = Set(Some(reason.clone()));
            }
            ReportAction::Archive { .. } | ReportAction::Unarchive { .. } => {}
        }

        let report = active.update(&self.db).await.map_err(db)?;

        tracing::info!(report_id = %report_id, state = %action.new_state(), "Monthly report state changed");
        Ok(report)
    }

    /// Copies the location reports of one plan report under another.
    async fn copy_location_reports<C: ConnectionTrait>(
        &self,
        conn: &C,
        source_plan_report_id: Uuid,
        plan_report_id: Uuid,
    ) -> Result<usize, DbErr> {
        let location_reports = target_location_reports::Entity::find()
            .filter(target_location_reports::Column::ActivityPlanReportId.eq(source_plan_report_id))
            .order_by_asc(target_location_reports::Column::CreatedAt)
            .all(conn)
            .await?;
        let status: BeneficiaryStatus = CarryOver::beneficiary_status().into();
        let now = Utc::now().into();

        for source in &location_reports {
            let mut active: target_location_reports::ActiveModel = source.clone().into();
            active = active.reset_all();
            active.id = Set(Uuid::now_v7());
            active.activity_plan_report_id = Set(plan_report_id);
            active.beneficiary_status = Set(status);
            active.created_at = Set(now);
            let location_report = active.insert(conn).await?;

            let values = disaggregation_location_reports::Entity::find()
                .filter(
                    disaggregation_location_reports::Column::TargetLocationReportId.eq(source.id),
                )
                .all(conn)
                .await?;
            for value in values {
                let carried = CarryOver::values(
                    self.policy.carry_over,
                    DisaggregationValues {
                        target: value.target,
                        target_required: value.target_required,
                        reached: value.reached,
                    },
                );
                disaggregation_location_reports::ActiveModel {
                    id: Set(Uuid::now_v7()),
                    target_location_report_id: Set(location_report.id),
                    disaggregation_id: Set(value.disaggregation_id),
                    target: Set(carried.target),
                    target_required: Set(carried.target_required),
                    reached: Set(carried.reached),
                    created_at: Set(now),
                }
                .insert(conn)
                .await?;
            }
        }

        Ok(location_reports.len())
    }
}

pub(crate) async fn find_report<C: ConnectionTrait>(
    conn: &C,
    report_id: Uuid,
) -> Result<project_monthly_reports::Model, ReportError> {
    project_monthly_reports::Entity::find_by_id(report_id)
        .one(conn)
        .await
        .map_err(db)?
        .ok_or(ReportError::ReportNotFound(report_id))
}

async fn find_project<C: ConnectionTrait>(
    conn: &C,
    project_id: Uuid,
) -> Result<projects::Model, ReportError> {
    projects::Entity::find_by_id(project_id)
        .one(conn)
        .await
        .map_err(db)?
        .ok_or(ReportError::ProjectNotFound(project_id))
}

async fn insert_report<C: ConnectionTrait>(
    conn: &C,
    project_id: Uuid,
    state: ReportState,
    from_date: NaiveDate,
    to_date: NaiveDate,
    description: Option<String>,
) -> Result<project_monthly_reports::Model, DbErr> {
    let now = Utc::now().into();
    project_monthly_reports::ActiveModel {
        id: Set(Uuid::now_v7()),
        project_id: Set(project_id),
        state: Set(state),
        from_date: Set(Some(from_date)),
        to_date: Set(Some(to_date)),
        description: Set(description),
        comments: Set(None),
        is_active: Set(true),
        submitted_on: Set(None),
        approved_on: Set(None),
        rejected_on: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
}

async fn copy_plan_report<C: ConnectionTrait>(
    conn: &C,
    source: &activity_plan_reports::Model,
    report_id: Uuid,
) -> Result<activity_plan_reports::Model, DbErr> {
    let now = Utc::now().into();
    let mut active: activity_plan_reports::ActiveModel = source.clone().into();
    active = active.reset_all();
    active.id = Set(Uuid::now_v7());
    active.monthly_report_id = Set(report_id);
    active.target_achieved = Set(0);
    active.created_at = Set(now);
    active.updated_at = Set(now);
    active.insert(conn).await
}
