//! Integration tests for CSV imports and exports.

mod common;

use chrono::NaiveDate;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

use common::{Fixture, connect, policy};
use reporthub_db::{
    ExportRepository, ImportRepository, MonthlyReportRepository,
    entities::{activity_plans, target_locations},
    repositories::CreateMonthlyReportInput,
};

const MAX_ROWS: usize = 100;

fn header(fixture: &Fixture, extra: &str) -> String {
    format!(
        "indicator,activity_domain,activity_type,admin0pcode,admin1pcode,admin2pcode{extra},{},{}\n",
        fixture.girls_name, fixture.boys_name
    )
}

fn activity_cells(fixture: &Fixture) -> String {
    format!(
        "{},{},{}",
        fixture.indicator_name, fixture.activity_domain_code, fixture.activity_type_code
    )
}

#[tokio::test]
async fn test_report_import_skips_rows_without_province() {
    let db = connect().await;
    let fixture = Fixture::in_progress(&db).await;
    let reports = MonthlyReportRepository::new(db.clone(), policy());
    let report = reports
        .create(
            fixture.project_id,
            CreateMonthlyReportInput {
                from_date: NaiveDate::from_ymd_opt(2026, 2, 1),
                to_date: NaiveDate::from_ymd_opt(2026, 2, 28),
                description: None,
            },
        )
        .await
        .unwrap();

    let csv = format!(
        "{}{},{},{},{},4,6\n{},{},,{},1,1\n",
        header(&fixture, ""),
        activity_cells(&fixture),
        fixture.country.code,
        fixture.province.code,
        fixture.district.code,
        activity_cells(&fixture),
        fixture.country.code,
        fixture.district.code,
    );

    let repo = ImportRepository::new(db.clone(), MAX_ROWS);
    let summary = repo.import_report(report.id, csv.as_bytes()).await.unwrap();

    assert_eq!(summary.imported_rows, 1);
    assert_eq!(summary.skipped_rows, 1);
    assert_eq!(summary.errors.len(), 1);
    assert_eq!(summary.errors[0].row, 3);
    assert!(summary.errors[0].message.contains("Admin1pcode is missing"));

    let tree = reports.tree(report.id).await.unwrap();
    assert_eq!(tree.plan_reports.len(), 1);
    let plan_report = &tree.plan_reports[0];
    assert_eq!(plan_report.plan_report.activity_plan_id, fixture.activity_plan_id);
    assert_eq!(plan_report.plan_report.target_achieved, 10);
    assert_eq!(plan_report.location_reports.len(), 1);
    let location = &plan_report.location_reports[0];
    assert_eq!(location.location_report.province_id, fixture.province.id);
    let girls = location
        .disaggregations
        .iter()
        .find(|v| v.disaggregation_id == fixture.girls_id)
        .unwrap();
    assert_eq!(girls.reached, 4);
    assert_eq!(girls.target, 4);
    assert_eq!(girls.target_required, 0);

    // The imported rows show up in the export
    let exported = ExportRepository::new(db.clone())
        .report_csv(report.id)
        .await
        .unwrap();
    let text = String::from_utf8(exported).unwrap();
    assert_eq!(text.lines().count(), 2);
    assert!(text.contains(&fixture.district.code) || text.contains(&fixture.district.name));

    fixture.cleanup(&db).await;
}

#[tokio::test]
async fn test_plan_import_reuses_matching_plan() {
    let db = connect().await;
    let fixture = Fixture::draft(&db).await;

    // Blank zone cell
    let csv = format!(
        "{}{},{},{},{},,15,25\n",
        header(&fixture, ",zone"),
        activity_cells(&fixture),
        fixture.country.code,
        fixture.province.code,
        fixture.district.code,
    );

    let repo = ImportRepository::new(db.clone(), MAX_ROWS);
    let summary = repo
        .import_plans(fixture.project_id, csv.as_bytes())
        .await
        .unwrap();
    assert_eq!(summary.imported_rows, 1, "{:?}", summary.errors);
    assert!(summary.errors.is_empty());

    let plans = activity_plans::Entity::find()
        .filter(activity_plans::Column::ProjectId.eq(fixture.project_id))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(plans, 1);

    let locations = target_locations::Entity::find()
        .filter(target_locations::Column::ActivityPlanId.eq(fixture.activity_plan_id))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(locations, 2);

    fixture.cleanup(&db).await;
}

#[tokio::test]
async fn test_plan_import_is_all_or_nothing() {
    let db = connect().await;
    let fixture = Fixture::draft(&db).await;

    let csv = format!(
        "{}{},{},{},{},15,25\n{},{},{},UNKNOWN-DISTRICT,1,1\n",
        header(&fixture, ""),
        activity_cells(&fixture),
        fixture.country.code,
        fixture.province.code,
        fixture.district.code,
        activity_cells(&fixture),
        fixture.country.code,
        fixture.province.code,
    );

    let repo = ImportRepository::new(db.clone(), MAX_ROWS);
    let summary = repo
        .import_plans(fixture.project_id, csv.as_bytes())
        .await
        .unwrap();
    assert_eq!(summary.imported_rows, 0);
    assert_eq!(summary.skipped_rows, 2);
    assert!(summary.errors.iter().all(|e| e.row == 3));

    let locations = target_locations::Entity::find()
        .filter(target_locations::Column::ProjectId.eq(fixture.project_id))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(locations, 1);

    fixture.cleanup(&db).await;
}
