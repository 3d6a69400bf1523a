use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::catalog::CatalogError;
use crate::geometry::GeometryError;
use crate::link_budget::LinkBudgetError;
use crate::ngso::SimulationError;

#[derive(Debug)]
pub enum ApiError {
    Validation(String),
    NotFound(String),
    Internal(String),
}

impl From<CatalogError> for ApiError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::UnknownStation(_) | CatalogError::UnknownSatellite(_) => {
                ApiError::NotFound(e.to_string())
            }
            _ => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<LinkBudgetError> for ApiError {
    fn from(e: LinkBudgetError) -> Self {
        match e {
            LinkBudgetError::UnknownAntenna(_) => ApiError::NotFound(e.to_string()),
            _ => ApiError::Validation(e.to_string()),
        }
    }
}

impl From<GeometryError> for ApiError {
    fn from(e: GeometryError) -> Self {
        ApiError::Validation(e.to_string())
    }
}

impl From<SimulationError> for ApiError {
    fn from(e: SimulationError) -> Self {
        match e {
            SimulationError::InvalidParameter { .. } => ApiError::Validation(e.to_string()),
            SimulationError::Cancelled => ApiError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::with_message("validation_failed", &msg)),
            )
                .into_response(),
            ApiError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::with_message("not_found", &msg)),
            )
                .into_response(),
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::with_message("internal_error", &msg)),
            )
                .into_response(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn with_message(error: &str, message: &str) -> Self {
        ErrorResponse {
            error: error.to_string(),
            message: Some(message.to_string()),
        }
    }
}
