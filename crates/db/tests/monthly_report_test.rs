//! Integration tests for the monthly report lifecycle and copy-forward.

mod common;

use chrono::NaiveDate;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect};
use uuid::Uuid;

use common::{Fixture, connect, policy};
use reporthub_core::location::LocationError;
use reporthub_core::reporting::{BeneficiaryStatus, EntryInput, ReportError, ReportingPolicy};
use reporthub_db::{
    MonthlyReportRepository, ProjectRepository, ReportEntryRepository,
    entities::{
        activity_plan_reports, disaggregation_location_reports, project_monthly_reports,
        sea_orm_active_enums::{BeneficiaryStatus as DbBeneficiaryStatus, ReportState},
        target_location_reports,
    },
    repositories::{AddLocationReportInput, AddPlanReportInput, CreateMonthlyReportInput},
};
use reporthub_shared::CarryOverMode;

fn month(m: u32) -> CreateMonthlyReportInput {
    CreateMonthlyReportInput {
        from_date: NaiveDate::from_ymd_opt(2026, m, 1),
        to_date: NaiveDate::from_ymd_opt(2026, m, 28),
        description: None,
    }
}

fn plan_report_input(fixture: &Fixture) -> AddPlanReportInput {
    AddPlanReportInput {
        activity_plan_id: fixture.activity_plan_id,
        response_types: vec!["Emergency".to_string()],
        units: None,
        no_of_transfers: None,
        report_fields: None,
    }
}

fn location_input(fixture: &Fixture, girls: i64, boys: i64) -> AddLocationReportInput {
    AddLocationReportInput {
        target_location_id: Some(fixture.target_location_id),
        country_id: None,
        province_id: None,
        district_id: None,
        zone_id: None,
        location_type_id: None,
        facility_site_type_id: None,
        beneficiary_status: BeneficiaryStatus::NewBeneficiary,
        values: vec![
            EntryInput {
                disaggregation_id: fixture.girls_id.into(),
                target: 10,
                target_required: 4,
                reached: girls,
            },
            EntryInput {
                disaggregation_id: fixture.boys_id.into(),
                target: 20,
                target_required: 6,
                reached: boys,
            },
        ],
    }
}

/// Creates a report for the month and fills it with one location report.
async fn filled_report(
    reports: &MonthlyReportRepository,
    entries: &ReportEntryRepository,
    fixture: &Fixture,
    m: u32,
) -> Uuid {
    let report = reports
        .create(fixture.project_id, month(m))
        .await
        .expect("Failed to create report");
    let plan_report = entries
        .add_plan_report(report.id, plan_report_input(fixture))
        .await
        .expect("Failed to add plan report");
    entries
        .add_location_report(plan_report.id, location_input(fixture, 3, 2))
        .await
        .expect("Failed to add location report");
    report.id
}

async fn plan_report_count(db: &sea_orm::DatabaseConnection, report_id: Uuid) -> u64 {
    activity_plan_reports::Entity::find()
        .filter(activity_plan_reports::Column::MonthlyReportId.eq(report_id))
        .count(db)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_report_lifecycle() {
    let db = connect().await;
    let fixture = Fixture::in_progress(&db).await;
    let reports = MonthlyReportRepository::new(db.clone(), policy());
    let entries = ReportEntryRepository::new(db.clone());

    let report = reports
        .create(fixture.project_id, month(2))
        .await
        .expect("Failed to create report");
    assert_eq!(report.state, ReportState::Pending);

    // Nothing to submit yet
    let err = reports.submit(report.id).await.unwrap_err();
    assert!(matches!(err, ReportError::NoActivityReports));

    let plan_report = entries
        .add_plan_report(report.id, plan_report_input(&fixture))
        .await
        .unwrap();

    // A plan report without locations blocks submission
    let err = reports.submit(report.id).await.unwrap_err();
    assert!(matches!(err, ReportError::ActivityWithoutLocations(_)));

    entries
        .add_location_report(plan_report.id, location_input(&fixture, 3, 2))
        .await
        .unwrap();

    let submitted = reports.submit(report.id).await.unwrap();
    assert_eq!(submitted.state, ReportState::Completed);
    assert!(submitted.submitted_on.is_some());
    assert!(submitted.approved_on.is_some());

    // Completed reports are read-only
    let err = entries
        .add_plan_report(report.id, plan_report_input(&fixture))
        .await
        .unwrap_err();
    assert!(matches!(err, ReportError::NotEditable(_)));

    let err = reports.reject(report.id, "   ").await.unwrap_err();
    assert!(matches!(err, ReportError::RejectionReasonRequired));

    let rejected = reports.reject(report.id, "Wrong district").await.unwrap();
    assert_eq!(rejected.state, ReportState::Rejected);
    assert_eq!(rejected.comments.as_deref(), Some("Wrong district"));
    assert!(rejected.rejected_on.is_some());

    let archived = reports.archive(report.id).await.unwrap();
    assert_eq!(archived.state, ReportState::Archived);
    assert!(!archived.is_active);

    let err = reports.delete(report.id).await.unwrap_err();
    assert!(matches!(err, ReportError::CannotDeleteArchived));

    let reopened = reports.unarchive(report.id).await.unwrap();
    assert_eq!(reopened.state, ReportState::Todo);
    assert!(reopened.is_active);

    reports.delete(report.id).await.unwrap();
    assert!(matches!(
        reports.find(report.id).await,
        Err(ReportError::ReportNotFound(_))
    ));

    fixture.cleanup(&db).await;
}

#[tokio::test]
async fn test_report_requires_project_in_progress() {
    let db = connect().await;
    let fixture = Fixture::draft(&db).await;
    let reports = MonthlyReportRepository::new(db.clone(), policy());

    let err = reports
        .create(fixture.project_id, month(1))
        .await
        .unwrap_err();
    assert!(matches!(err, ReportError::ProjectNotInProgress(_)));

    fixture.cleanup(&db).await;
}

#[tokio::test]
async fn test_copy_forward_without_source_changes_nothing() {
    let db = connect().await;
    let fixture = Fixture::in_progress(&db).await;
    let reports = MonthlyReportRepository::new(db.clone(), policy());
    let entries = ReportEntryRepository::new(db.clone());

    let target = filled_report(&reports, &entries, &fixture, 3).await;
    let before = plan_report_count(&db, target).await;

    let err = reports.copy_forward(target).await.unwrap_err();
    assert!(matches!(err, ReportError::NoApprovedSource));

    assert_eq!(plan_report_count(&db, target).await, before);
    let report = reports.find(target).await.unwrap();
    assert_eq!(report.state, ReportState::Pending);

    fixture.cleanup(&db).await;
}

#[tokio::test]
async fn test_copy_forward_copies_approved_report() {
    let db = connect().await;
    let fixture = Fixture::in_progress(&db).await;
    let reports = MonthlyReportRepository::new(db.clone(), policy());
    let entries = ReportEntryRepository::new(db.clone());

    let source = filled_report(&reports, &entries, &fixture, 1).await;
    reports.submit(source).await.unwrap();

    // Target already has entries of its own; they are replaced
    let target = filled_report(&reports, &entries, &fixture, 2).await;
    entries
        .add_location_report(
            activity_plan_reports::Entity::find()
                .filter(activity_plan_reports::Column::MonthlyReportId.eq(target))
                .one(&db)
                .await
                .unwrap()
                .unwrap()
                .id,
            location_input(&fixture, 1, 1),
        )
        .await
        .unwrap();

    let copied = reports.copy_forward(target).await.unwrap();
    assert_eq!(copied.state, ReportState::Pending);

    let tree = reports.tree(target).await.unwrap();
    assert_eq!(tree.plan_reports.len(), 1);
    let plan_report = &tree.plan_reports[0];
    assert_eq!(plan_report.plan_report.activity_plan_id, fixture.activity_plan_id);
    assert_eq!(plan_report.plan_report.target_achieved, 30);
    assert_eq!(plan_report.location_reports.len(), 1);

    let location = &plan_report.location_reports[0];
    assert_eq!(
        location.location_report.beneficiary_status,
        DbBeneficiaryStatus::ExistingBeneficiaries
    );
    assert_eq!(
        location.location_report.target_location_id,
        Some(fixture.target_location_id)
    );
    assert_eq!(location.disaggregations.len(), 2);
    for value in &location.disaggregations {
        assert_eq!(value.reached, 0);
        assert_eq!(value.target_required, 0);
    }
    let girls = location
        .disaggregations
        .iter()
        .find(|v| v.disaggregation_id == fixture.girls_id)
        .unwrap();
    assert_eq!(girls.target, 10);

    // The source keeps its entries
    let source_tree = reports.tree(source).await.unwrap();
    assert_eq!(source_tree.plan_reports.len(), 1);
    assert_eq!(
        source_tree.plan_reports[0].location_reports[0]
            .location_report
            .beneficiary_status,
        DbBeneficiaryStatus::NewBeneficiary
    );

    fixture.cleanup(&db).await;
}

#[tokio::test]
async fn test_copy_forward_rejects_completed_target() {
    let db = connect().await;
    let fixture = Fixture::in_progress(&db).await;
    let reports = MonthlyReportRepository::new(db.clone(), policy());
    let entries = ReportEntryRepository::new(db.clone());

    let first = filled_report(&reports, &entries, &fixture, 1).await;
    reports.submit(first).await.unwrap();
    let second = filled_report(&reports, &entries, &fixture, 2).await;
    reports.submit(second).await.unwrap();

    let err = reports.copy_forward(second).await.unwrap_err();
    assert!(matches!(err, ReportError::NotEditable(_)));

    fixture.cleanup(&db).await;
}

#[tokio::test]
async fn test_target_achieved_follows_entries() {
    let db = connect().await;
    let fixture = Fixture::in_progress(&db).await;
    let reports = MonthlyReportRepository::new(db.clone(), policy());
    let entries = ReportEntryRepository::new(db.clone());

    let report = reports.create(fixture.project_id, month(4)).await.unwrap();
    let plan_report = entries
        .add_plan_report(report.id, plan_report_input(&fixture))
        .await
        .unwrap();
    let first = entries
        .add_location_report(plan_report.id, location_input(&fixture, 1, 1))
        .await
        .unwrap();
    entries
        .add_location_report(plan_report.id, location_input(&fixture, 1, 1))
        .await
        .unwrap();

    let stored = activity_plan_reports::Entity::find_by_id(plan_report.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.target_achieved, 60);

    entries
        .replace_values(
            first.id,
            vec![EntryInput {
                disaggregation_id: fixture.girls_id.into(),
                target: 5,
                target_required: 0,
                reached: 5,
            }],
        )
        .await
        .unwrap();
    let stored = activity_plan_reports::Entity::find_by_id(plan_report.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.target_achieved, 35);

    entries.delete_location_report(first.id).await.unwrap();
    let stored = activity_plan_reports::Entity::find_by_id(plan_report.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.target_achieved, 30);

    let remaining = target_location_reports::Entity::find()
        .filter(target_location_reports::Column::ActivityPlanReportId.eq(plan_report.id))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(remaining, 1);

    fixture.cleanup(&db).await;
}

#[tokio::test]
async fn test_reached_counts_new_beneficiaries_only() {
    let db = connect().await;
    let fixture = Fixture::in_progress(&db).await;
    let reports = MonthlyReportRepository::new(db.clone(), policy());
    let entries = ReportEntryRepository::new(db.clone());

    let report = reports.create(fixture.project_id, month(5)).await.unwrap();
    let plan_report = entries
        .add_plan_report(report.id, plan_report_input(&fixture))
        .await
        .unwrap();

    entries
        .add_location_report(plan_report.id, location_input(&fixture, 5, 0))
        .await
        .unwrap();
    entries
        .add_location_report(
            plan_report.id,
            AddLocationReportInput {
                beneficiary_status: BeneficiaryStatus::ExistingBeneficiaries,
                ..location_input(&fixture, 7, 0)
            },
        )
        .await
        .unwrap();

    let figures = entries
        .target_and_reached(fixture.target_location_id, fixture.girls_id)
        .await
        .unwrap();
    assert_eq!(figures.target, 10);
    assert_eq!(figures.reached, 5);

    fixture.cleanup(&db).await;
}

#[tokio::test]
async fn test_values_outside_indicator_rejected() {
    let db = connect().await;
    let fixture = Fixture::in_progress(&db).await;
    let reports = MonthlyReportRepository::new(db.clone(), policy());
    let entries = ReportEntryRepository::new(db.clone());

    let report = reports.create(fixture.project_id, month(6)).await.unwrap();
    let plan_report = entries
        .add_plan_report(report.id, plan_report_input(&fixture))
        .await
        .unwrap();

    let mut input = location_input(&fixture, 1, 1);
    input.values[0].reached = -1;
    let err = entries
        .add_location_report(plan_report.id, input)
        .await
        .unwrap_err();
    assert!(matches!(err, ReportError::NegativeValue { .. }));

    let values = disaggregation_location_reports::Entity::find()
        .inner_join(target_location_reports::Entity)
        .filter(target_location_reports::Column::ActivityPlanReportId.eq(plan_report.id))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(values, 0);

    fixture.cleanup(&db).await;
}

#[tokio::test]
async fn test_sync_reporting_periods() {
    let db = connect().await;
    let fixture = Fixture::in_progress(&db).await;
    let reports = MonthlyReportRepository::new(db.clone(), policy());
    let today = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();

    let outcome = reports
        .sync_reporting_periods(fixture.project_id, today)
        .await
        .unwrap();
    assert_eq!(outcome.created, 3);
    assert_eq!(outcome.deleted, 0);

    let current = project_monthly_reports::Entity::find()
        .filter(project_monthly_reports::Column::ProjectId.eq(fixture.project_id))
        .filter(project_monthly_reports::Column::FromDate.eq(NaiveDate::from_ymd_opt(2026, 3, 1)))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(current.state, ReportState::Todo);

    let again = reports
        .sync_reporting_periods(fixture.project_id, today)
        .await
        .unwrap();
    assert_eq!(again.created, 0);

    fixture.cleanup(&db).await;
}

#[tokio::test]
async fn test_sync_keeps_mid_month_report() {
    let db = connect().await;
    let fixture = Fixture::in_progress(&db).await;
    let reports = MonthlyReportRepository::new(db.clone(), policy());

    reports
        .create(
            fixture.project_id,
            CreateMonthlyReportInput {
                from_date: NaiveDate::from_ymd_opt(2026, 3, 15),
                to_date: NaiveDate::from_ymd_opt(2026, 3, 31),
                description: None,
            },
        )
        .await
        .unwrap();

    let outcome = reports
        .sync_reporting_periods(fixture.project_id, NaiveDate::from_ymd_opt(2026, 3, 20).unwrap())
        .await
        .unwrap();
    // January and February only
    assert_eq!(outcome.created, 2);

    let march = project_monthly_reports::Entity::find()
        .filter(project_monthly_reports::Column::ProjectId.eq(fixture.project_id))
        .filter(
            project_monthly_reports::Column::FromDate
                .between(NaiveDate::from_ymd_opt(2026, 3, 1), NaiveDate::from_ymd_opt(2026, 3, 31)),
        )
        .count(&db)
        .await
        .unwrap();
    assert_eq!(march, 1);

    fixture.cleanup(&db).await;
}

#[tokio::test]
async fn test_unlinked_location_report_joins_planned_location() {
    let db = connect().await;
    let fixture = Fixture::in_progress(&db).await;
    let reports = MonthlyReportRepository::new(db.clone(), policy());
    let entries = ReportEntryRepository::new(db.clone());

    let report = reports.create(fixture.project_id, month(3)).await.unwrap();
    let plan_report = entries
        .add_plan_report(report.id, plan_report_input(&fixture))
        .await
        .unwrap();

    let location_report = entries
        .add_location_report(
            plan_report.id,
            AddLocationReportInput {
                target_location_id: None,
                country_id: Some(fixture.country.id),
                province_id: Some(fixture.province.id),
                district_id: Some(fixture.district.id),
                values: vec![EntryInput {
                    disaggregation_id: fixture.girls_id.into(),
                    target: 10,
                    target_required: 0,
                    reached: 5,
                }],
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(
        location_report.target_location_id,
        Some(fixture.target_location_id)
    );

    let figures = entries
        .target_and_reached(fixture.target_location_id, fixture.girls_id)
        .await
        .unwrap();
    assert_eq!(figures.target, 10);
    assert_eq!(figures.reached, 5);

    fixture.cleanup(&db).await;
}

#[tokio::test]
async fn test_location_report_rejects_swapped_levels() {
    let db = connect().await;
    let fixture = Fixture::in_progress(&db).await;
    let reports = MonthlyReportRepository::new(db.clone(), policy());
    let entries = ReportEntryRepository::new(db.clone());

    let report = reports.create(fixture.project_id, month(3)).await.unwrap();
    let plan_report = entries
        .add_plan_report(report.id, plan_report_input(&fixture))
        .await
        .unwrap();

    let err = entries
        .add_location_report(
            plan_report.id,
            AddLocationReportInput {
                target_location_id: None,
                country_id: Some(fixture.district.id),
                province_id: Some(fixture.province.id),
                district_id: Some(fixture.country.id),
                ..location_input(&fixture, 1, 1)
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ReportError::Location(LocationError::WrongLevel { .. })
    ));

    let stored = target_location_reports::Entity::find()
        .filter(target_location_reports::Column::ActivityPlanReportId.eq(plan_report.id))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(stored, 0);

    fixture.cleanup(&db).await;
}

#[tokio::test]
async fn test_copy_forward_keeps_each_plan_with_its_locations() {
    let db = connect().await;
    let fixture = Fixture::draft(&db).await;
    let (second_plan_id, second_target_id) = fixture.add_activity_plan(&db, 4, 6).await;
    ProjectRepository::new(db.clone())
        .submit(fixture.project_id)
        .await
        .unwrap();

    let reports = MonthlyReportRepository::new(db.clone(), policy());
    let entries = ReportEntryRepository::new(db.clone());

    let source = reports.create(fixture.project_id, month(1)).await.unwrap();
    let first = entries
        .add_plan_report(source.id, plan_report_input(&fixture))
        .await
        .unwrap();
    let second = entries
        .add_plan_report(
            source.id,
            AddPlanReportInput {
                activity_plan_id: second_plan_id,
                ..plan_report_input(&fixture)
            },
        )
        .await
        .unwrap();

    // Two location reports per plan: 30 + 30 planned for the first, 10 + 10 for the second
    for reached in [3, 1] {
        entries
            .add_location_report(first.id, location_input(&fixture, reached, reached))
            .await
            .unwrap();
    }
    for reached in [2, 4] {
        entries
            .add_location_report(
                second.id,
                AddLocationReportInput {
                    target_location_id: Some(second_target_id),
                    values: vec![
                        EntryInput {
                            disaggregation_id: fixture.girls_id.into(),
                            target: 4,
                            target_required: 1,
                            reached,
                        },
                        EntryInput {
                            disaggregation_id: fixture.boys_id.into(),
                            target: 6,
                            target_required: 1,
                            reached,
                        },
                    ],
                    ..Default::default()
                },
            )
            .await
            .unwrap();
    }
    reports.submit(source.id).await.unwrap();

    let target = reports.create(fixture.project_id, month(2)).await.unwrap();
    reports.copy_forward(target.id).await.unwrap();

    let tree = reports.tree(target.id).await.unwrap();
    assert_eq!(tree.plan_reports.len(), 2);

    let copied_first = tree
        .plan_reports
        .iter()
        .find(|p| p.plan_report.activity_plan_id == fixture.activity_plan_id)
        .unwrap();
    assert_eq!(copied_first.location_reports.len(), 2);
    assert_eq!(copied_first.plan_report.target_achieved, 60);
    assert!(copied_first.location_reports.iter().all(|l| {
        l.location_report.target_location_id == Some(fixture.target_location_id)
            && l.location_report.activity_plan_report_id == copied_first.plan_report.id
    }));

    let copied_second = tree
        .plan_reports
        .iter()
        .find(|p| p.plan_report.activity_plan_id == second_plan_id)
        .unwrap();
    assert_eq!(copied_second.location_reports.len(), 2);
    assert_eq!(copied_second.plan_report.target_achieved, 20);
    assert!(copied_second.location_reports.iter().all(|l| {
        l.location_report.target_location_id == Some(second_target_id)
            && l.location_report.activity_plan_report_id == copied_second.plan_report.id
            && l.disaggregations.len() == 2
    }));

    // Source untouched
    let source_tree = reports.tree(source.id).await.unwrap();
    assert_eq!(source_tree.plan_reports.len(), 2);
    assert!(
        source_tree
            .plan_reports
            .iter()
            .all(|p| p.location_reports.len() == 2)
    );

    fixture.cleanup(&db).await;
}

#[tokio::test]
async fn test_copy_forward_seed_keeps_reached() {
    let db = connect().await;
    let fixture = Fixture::in_progress(&db).await;
    let reports = MonthlyReportRepository::new(
        db.clone(),
        ReportingPolicy {
            carry_over: CarryOverMode::Seed,
            ..policy()
        },
    );
    let entries = ReportEntryRepository::new(db.clone());

    let source = filled_report(&reports, &entries, &fixture, 1).await;
    reports.submit(source).await.unwrap();
    let target = reports.create(fixture.project_id, month(2)).await.unwrap();

    reports.copy_forward(target.id).await.unwrap();

    let tree = reports.tree(target.id).await.unwrap();
    let location = &tree.plan_reports[0].location_reports[0];
    assert_eq!(
        location.location_report.beneficiary_status,
        DbBeneficiaryStatus::ExistingBeneficiaries
    );
    let girls = location
        .disaggregations
        .iter()
        .find(|v| v.disaggregation_id == fixture.girls_id)
        .unwrap();
    assert_eq!(girls.target, 10);
    assert_eq!(girls.target_required, 4);
    assert_eq!(girls.reached, 3);
    assert_eq!(tree.plan_reports[0].plan_report.target_achieved, 30);

    fixture.cleanup(&db).await;
}
