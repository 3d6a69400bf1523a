use axum::{extract::State, Json};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::compliance::{check_threshold as verdict_for, ComplianceVerdict};
use crate::link_budget::{compute_ci_at, LinkBudgetResult};
use crate::ngso::{
    simulate_interference, CancelToken, InterferenceSeries, SimulationParams, Summation,
};
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::server::AppState;

const DEFAULT_STEP_SECONDS: f64 = 1.0;
const DEFAULT_DURATION_SECONDS: f64 = 86_400.0;
/// Upper bound on samples per HTTP sweep.
pub const MAX_SAMPLES: f64 = 1_000_000.0;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ComputeCiRequest {
    pub station_id: String,
    pub serving_satellite_id: String,
    pub interfering_satellite_id: String,
    #[serde(default)]
    pub reuse: Option<bool>,
    /// Evaluation instant, defaults to now.
    #[serde(default)]
    pub at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ComputeCiResponse {
    pub result: LinkBudgetResult,
    pub verdict: ComplianceVerdict,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckThresholdRequest {
    pub result: LinkBudgetResult,
    #[serde(default)]
    pub reuse: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct NgsoRequest {
    #[serde(default)]
    pub step_seconds: Option<f64>,
    #[serde(default)]
    pub duration_seconds: Option<f64>,
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub summation: Option<Summation>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub stations: usize,
    pub satellites: usize,
    pub antennas: usize,
}

#[utoipa::path(
    post,
    path = "/api/compute_ci",
    request_body = ComputeCiRequest,
    responses(
        (status = 200, description = "Link budget and compliance verdict", body = ComputeCiResponse),
        (status = 400, description = "Invalid parameters", body = ErrorResponse),
        (status = 404, description = "Unknown station, satellite or antenna", body = ErrorResponse)
    ),
    tag = "interference"
)]
pub async fn compute_ci(
    State(state): State<AppState>,
    Json(request): Json<ComputeCiRequest>,
) -> ApiResult<Json<ComputeCiResponse>> {
    let catalog = &state.catalog;
    let station = catalog.station(&request.station_id)?;
    let serving = catalog.satellite(&request.serving_satellite_id)?;
    let interferer = catalog.satellite(&request.interfering_satellite_id)?;

    let result = compute_ci_at(
        station,
        serving,
        interferer,
        &catalog.antennas,
        request.at.unwrap_or_else(Utc::now),
        &state.config.analysis.kepler,
    )?;
    let reuse = request.reuse.unwrap_or(state.config.analysis.reuse);

    Ok(Json(ComputeCiResponse {
        result,
        verdict: verdict_for(&result, reuse),
    }))
}

#[utoipa::path(
    post,
    path = "/api/check_threshold",
    request_body = CheckThresholdRequest,
    responses(
        (status = 200, description = "Compliance verdict", body = ComplianceVerdict),
        (status = 400, description = "Malformed result", body = ErrorResponse)
    ),
    tag = "interference"
)]
pub async fn check_threshold(
    State(state): State<AppState>,
    Json(request): Json<CheckThresholdRequest>,
) -> Json<ComplianceVerdict> {
    let reuse = request.reuse.unwrap_or(state.config.analysis.reuse);
    Json(verdict_for(&request.result, reuse))
}

/// Cancels the sweep when the request future is dropped.
struct CancelOnDrop(CancelToken);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.cancel();
    }
}

fn seconds(name: &str, value: f64) -> ApiResult<Duration> {
    if !value.is_finite() || value < 0.0 {
        return Err(ApiError::Validation(format!(
            "{} must be a non-negative number of seconds, got {}",
            name, value
        )));
    }
    Ok(Duration::microseconds((value * 1e6).round() as i64))
}

#[utoipa::path(
    post,
    path = "/api/ngso",
    request_body = NgsoRequest,
    responses(
        (status = 200, description = "Aggregate interference time series", body = InterferenceSeries),
        (status = 400, description = "Invalid parameters", body = ErrorResponse)
    ),
    tag = "interference"
)]
pub async fn ngso(
    State(state): State<AppState>,
    Json(request): Json<NgsoRequest>,
) -> ApiResult<Json<InterferenceSeries>> {
    let step_seconds = request.step_seconds.unwrap_or(DEFAULT_STEP_SECONDS);
    let duration_seconds = request.duration_seconds.unwrap_or(DEFAULT_DURATION_SECONDS);
    if step_seconds > 0.0 && duration_seconds / step_seconds > MAX_SAMPLES {
        return Err(ApiError::Validation(format!(
            "window of {} s at {} s steps exceeds {} samples",
            duration_seconds, step_seconds, MAX_SAMPLES
        )));
    }

    let mut params = SimulationParams::new(
        request.start.unwrap_or_else(Utc::now),
        seconds("step_seconds", step_seconds)?,
        seconds("duration_seconds", duration_seconds)?,
    );
    params.summation = request.summation.unwrap_or(state.config.analysis.summation);
    params.solver = state.config.analysis.kepler;

    let guard = CancelOnDrop(CancelToken::new());
    let token = guard.0.clone();
    let catalog = state.catalog.clone();
    let series = tokio::task::spawn_blocking(move || {
        simulate_interference(&catalog.satellites, &catalog.stations, &params, Some(&token))
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok(Json(series))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    tag = "interference"
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        stations: state.catalog.stations.len(),
        satellites: state.catalog.satellites.len(),
        antennas: state.catalog.antennas.len(),
    })
}
