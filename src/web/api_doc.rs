use utoipa::OpenApi;

use super::api::error::ErrorResponse;
use super::api::interference::{
    CheckThresholdRequest, ComputeCiRequest, ComputeCiResponse, HealthResponse, NgsoRequest,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::interference::compute_ci,
        super::api::interference::check_threshold,
        super::api::interference::ngso,
        super::api::interference::health,
        super::api::orbit::position,
    ),
    components(
        schemas(
            ComputeCiRequest,
            ComputeCiResponse,
            CheckThresholdRequest,
            NgsoRequest,
            HealthResponse,
            ErrorResponse,
            crate::link_budget::LinkBudgetResult,
            crate::compliance::ComplianceVerdict,
            crate::ngso::InterferenceSeries,
            crate::ngso::InterferenceSample,
            crate::ngso::Summation,
            crate::geometry::OrbitalPosition,
        )
    ),
    info(
        title = "Sat-O-RFI Interference API",
        description = "Link budget, compliance and NGSO interference computations",
        version = "0.1.0"
    ),
    tags(
        (name = "interference", description = "Interference computations"),
        (name = "orbit", description = "Keplerian propagation")
    )
)]
pub struct ApiDoc;
