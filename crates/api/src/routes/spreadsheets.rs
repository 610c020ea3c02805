//! CSV import, export and import template routes.

use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use bytes::Bytes;
use uuid::Uuid;

use crate::{
    AppState,
    error::error_response,
    middleware::AuthUser,
    routes::{editable_project, editable_report},
};
use reporthub_core::import::ImportError;
use reporthub_db::{ExportRepository, ImportRepository};

/// Multipart field carrying the uploaded file.
const FILE_FIELD: &str = "file";

/// Creates the spreadsheet routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/monthly-reports/{id}/import", post(import_report))
        .route("/monthly-reports/{id}/export.csv", get(export_report))
        .route(
            "/monthly-reports/{id}/import-template.csv",
            get(import_template),
        )
        .route("/projects/{id}/reports/export.csv", get(export_project))
}

/// Reads the `file` part of a multipart upload.
pub(crate) async fn read_upload(mut multipart: Multipart) -> Result<Bytes, Response> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(IntoResponse::into_response)?
    {
        if field.name() == Some(FILE_FIELD) {
            let data = field.bytes().await.map_err(IntoResponse::into_response)?;
            if data.is_empty() {
                break;
            }
            return Ok(data);
        }
    }
    Err(error_response(ImportError::NoFile))
}

fn csv_response(filename: &str, body: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response()
}

async fn import_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(report_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<impl IntoResponse, Response> {
    editable_report(&state, auth.actor(), report_id).await?;
    let file = read_upload(multipart).await?;

    let summary = ImportRepository::new((*state.db).clone(), state.import_max_rows)
        .import_report(report_id, &file[..])
        .await
        .map_err(error_response)?;
    Ok(Json(summary))
}

async fn export_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(report_id): Path<Uuid>,
) -> Result<impl IntoResponse, Response> {
    editable_report(&state, auth.actor(), report_id).await?;
    let body = ExportRepository::new((*state.db).clone())
        .report_csv(report_id)
        .await
        .map_err(error_response)?;
    Ok(csv_response(&format!("report-{report_id}.csv"), body))
}

async fn export_project(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<Uuid>,
) -> Result<impl IntoResponse, Response> {
    editable_project(&state, auth.actor(), project_id).await?;
    let body = ExportRepository::new((*state.db).clone())
        .project_csv(project_id)
        .await
        .map_err(error_response)?;
    Ok(csv_response(&format!("project-{project_id}-reports.csv"), body))
}

async fn import_template(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(report_id): Path<Uuid>,
) -> Result<impl IntoResponse, Response> {
    editable_report(&state, auth.actor(), report_id).await?;
    let body = ExportRepository::new((*state.db).clone())
        .import_template_csv(report_id)
        .await
        .map_err(error_response)?;
    Ok(csv_response(&format!("import-template-{report_id}.csv"), body))
}
