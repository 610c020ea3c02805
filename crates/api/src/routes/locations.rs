//! Location tree routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use validator::Validate;

use crate::{
    AppState,
    error::{error_response, validation_response},
    middleware::AuthUser,
};
use reporthub_core::access::AccessPolicy;
use reporthub_db::{LocationRepository, repositories::CreateLocationInput};

/// Creates the location routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/locations", get(list_countries).post(create_location))
        .route("/locations/{code}/children", get(list_children))
}

/// Request body for creating a location.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLocationRequest {
    /// Pcode of the parent, absent for countries.
    pub parent_code: Option<String>,
    /// 0 country, 1 province, 2 district, 3 zone.
    #[validate(range(min = 0, max = 3, message = "must be between 0 and 3"))]
    pub level: i16,
    /// Pcode.
    #[validate(length(min = 1, max = 32, message = "must be 1 to 32 characters"))]
    pub code: String,
    /// Display name.
    #[validate(length(min = 1, max = 200, message = "must be 1 to 200 characters"))]
    pub name: String,
    /// Region the location belongs to.
    pub region_name: Option<String>,
    /// Urban, rural, ...
    pub location_type: Option<String>,
    /// Latitude.
    pub lat: Option<String>,
    /// Longitude.
    pub long: Option<String>,
}

async fn list_countries(State(state): State<AppState>) -> Result<impl IntoResponse, Response> {
    let countries = LocationRepository::new((*state.db).clone())
        .countries()
        .await
        .map_err(error_response)?;
    Ok(Json(countries))
}

async fn list_children(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, Response> {
    let children = LocationRepository::new((*state.db).clone())
        .children(&code)
        .await
        .map_err(error_response)?;
    Ok(Json(children))
}

async fn create_location(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateLocationRequest>,
) -> Result<impl IntoResponse, Response> {
    AccessPolicy::ensure_superuser(auth.actor()).map_err(error_response)?;
    payload.validate().map_err(|e| validation_response(&e))?;

    let location = LocationRepository::new((*state.db).clone())
        .create(CreateLocationInput {
            parent_code: payload.parent_code,
            level: payload.level,
            code: payload.code.trim().to_string(),
            name: payload.name.trim().to_string(),
            region_name: payload.region_name,
            location_type: payload.location_type,
            lat: payload.lat,
            long: payload.long,
        })
        .await
        .map_err(error_response)?;

    Ok((StatusCode::CREATED, Json(location)))
}
