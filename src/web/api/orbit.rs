use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::geometry::OrbitalPosition;
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::server::AppState;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrbitQuery {
    /// Evaluation instant (RFC3339), defaults to now
    #[serde(default)]
    pub at: Option<DateTime<Utc>>,
}

#[utoipa::path(
    get,
    path = "/api/orbit/{satellite_id}",
    params(
        ("satellite_id" = String, Path, description = "Satellite registry id"),
        OrbitQuery
    ),
    responses(
        (status = 200, description = "Inertial position", body = OrbitalPosition),
        (status = 400, description = "Satellite has no usable Keplerian elements", body = ErrorResponse),
        (status = 404, description = "Unknown satellite", body = ErrorResponse)
    ),
    tag = "orbit"
)]
pub async fn position(
    State(state): State<AppState>,
    Path(satellite_id): Path<String>,
    Query(query): Query<OrbitQuery>,
) -> ApiResult<Json<OrbitalPosition>> {
    let satellite = state.catalog.satellite(&satellite_id)?;
    let elements = satellite.keplerian().ok_or_else(|| {
        ApiError::Validation(format!("{} has no Keplerian elements", satellite_id))
    })?;
    let position = elements.propagate(
        query.at.unwrap_or_else(Utc::now),
        &state.config.analysis.kepler,
    )?;
    Ok(Json(position))
}
