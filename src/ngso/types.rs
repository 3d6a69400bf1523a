use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// How per-pair contributions are combined into one figure per sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Summation {
    /// Add the dB values directly.
    Decibel,
    /// Convert to linear power, add, convert back to dB.
    #[default]
    Power,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct InterferenceSample {
    pub timestamp: DateTime<Utc>,
    /// Aggregate interference in dB; `None` when nothing contributed under
    /// power summation.
    pub total_interference_db: Option<f64>,
    pub contributing_pairs: usize,
    pub skipped_pairs: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct InterferenceSeries {
    pub analysis_start: DateTime<Utc>,
    pub step_seconds: f64,
    pub summation: Summation,
    pub samples: Vec<InterferenceSample>,
    pub skipped_pairs: usize,
}
