//! Monthly report routes: periods, lifecycle and copy-forward.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    AppState,
    error::{error_response, validation_response},
    middleware::AuthUser,
    routes::{editable_project, editable_report},
};
use reporthub_core::access::AccessPolicy;
use reporthub_core::reporting::ReportState;
use reporthub_db::{MonthlyReportRepository, repositories::CreateMonthlyReportInput};
use reporthub_shared::types::{PageRequest, PageResponse};

/// Creates the monthly report routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/projects/{id}/monthly-reports",
            get(list_reports).post(create_report),
        )
        .route("/projects/{id}/monthly-reports/sync", post(sync_periods))
        .route("/monthly-reports/{id}", get(get_report).delete(delete_report))
        .route("/monthly-reports/{id}/submit", post(submit_report))
        .route("/monthly-reports/{id}/approve", post(approve_report))
        .route("/monthly-reports/{id}/reject", post(reject_report))
        .route("/monthly-reports/{id}/archive", post(archive_report))
        .route("/monthly-reports/{id}/unarchive", post(unarchive_report))
        .route("/monthly-reports/{id}/copy-forward", post(copy_forward))
}

// ============================================================================
// Request Types
// ============================================================================

/// State filter for listing reports.
#[derive(Debug, Deserialize)]
pub struct ReportStateFilter {
    /// Only reports in this state.
    pub state: Option<ReportState>,
}

/// Request body for creating a report.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateReportRequest {
    /// First day covered.
    pub from_date: Option<NaiveDate>,
    /// Last day covered.
    pub to_date: Option<NaiveDate>,
    /// Free text.
    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    pub description: Option<String>,
}

/// Request body for rejecting a report.
#[derive(Debug, Deserialize)]
pub struct RejectReportRequest {
    /// Why the report is sent back.
    pub reason: String,
}

// ============================================================================
// Handlers
// ============================================================================

fn reports(state: &AppState) -> MonthlyReportRepository {
    MonthlyReportRepository::new((*state.db).clone(), state.reporting)
}

async fn list_reports(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<Uuid>,
    Query(filter): Query<ReportStateFilter>,
    Query(page): Query<PageRequest>,
) -> Result<impl IntoResponse, Response> {
    editable_project(&state, auth.actor(), project_id).await?;
    let page = page.normalized();
    let (items, total) = reports(&state)
        .list(project_id, filter.state, &page)
        .await
        .map_err(error_response)?;
    Ok(Json(PageResponse::new(items, &page, total)))
}

async fn create_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<Uuid>,
    Json(payload): Json<CreateReportRequest>,
) -> Result<impl IntoResponse, Response> {
    payload.validate().map_err(|e| validation_response(&e))?;
    editable_project(&state, auth.actor(), project_id).await?;

    let report = reports(&state)
        .create(
            project_id,
            CreateMonthlyReportInput {
                from_date: payload.from_date,
                to_date: payload.to_date,
                description: payload.description,
            },
        )
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(report)))
}

async fn sync_periods(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<Uuid>,
) -> Result<impl IntoResponse, Response> {
    editable_project(&state, auth.actor(), project_id).await?;
    let outcome = reports(&state)
        .sync_reporting_periods(project_id, Utc::now().date_naive())
        .await
        .map_err(error_response)?;
    Ok(Json(outcome))
}

async fn get_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, Response> {
    editable_report(&state, auth.actor(), id).await?;
    let tree = reports(&state).tree(id).await.map_err(error_response)?;
    Ok(Json(tree))
}

async fn submit_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, Response> {
    editable_report(&state, auth.actor(), id).await?;
    let report = reports(&state).submit(id).await.map_err(error_response)?;
    Ok(Json(report))
}

async fn approve_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, Response> {
    let (_, scope) = editable_report(&state, auth.actor(), id).await?;
    AccessPolicy::ensure_can_review(auth.actor(), &scope).map_err(error_response)?;
    let report = reports(&state).approve(id).await.map_err(error_response)?;
    Ok(Json(report))
}

async fn reject_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<RejectReportRequest>,
) -> Result<impl IntoResponse, Response> {
    let (_, scope) = editable_report(&state, auth.actor(), id).await?;
    AccessPolicy::ensure_can_review(auth.actor(), &scope).map_err(error_response)?;
    let report = reports(&state)
        .reject(id, &payload.reason)
        .await
        .map_err(error_response)?;
    Ok(Json(report))
}

async fn archive_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, Response> {
    editable_report(&state, auth.actor(), id).await?;
    let report = reports(&state).archive(id).await.map_err(error_response)?;
    Ok(Json(report))
}

async fn unarchive_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, Response> {
    editable_report(&state, auth.actor(), id).await?;
    let report = reports(&state).unarchive(id).await.map_err(error_response)?;
    Ok(Json(report))
}

async fn copy_forward(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, Response> {
    editable_report(&state, auth.actor(), id).await?;
    let report = reports(&state)
        .copy_forward(id)
        .await
        .map_err(error_response)?;
    Ok(Json(report))
}

async fn delete_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, Response> {
    editable_report(&state, auth.actor(), id).await?;
    reports(&state).delete(id).await.map_err(error_response)?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_accepts_empty_body() {
        let payload: CreateReportRequest = serde_json::from_str("{}").unwrap();
        assert!(payload.from_date.is_none());
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_state_filter_uses_lowercase_names() {
        let filter: ReportStateFilter =
            serde_json::from_value(serde_json::json!({ "state": "submitted" })).unwrap();
        assert_eq!(filter.state, Some(ReportState::Submitted));
    }
}
