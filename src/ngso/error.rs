use thiserror::Error;

use crate::geometry::GeometryError;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("invalid simulation parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("simulation cancelled")]
    Cancelled,
}

/// Why one satellite/station pair produced no contribution for a sample.
#[derive(Debug, Error)]
pub enum PairError {
    #[error("missing field {0}")]
    MissingField(&'static str),
    #[error("non-positive {name}: {value}")]
    NonPositive { name: &'static str, value: f64 },
    #[error("propagation failed: {0}")]
    Propagation(#[from] GeometryError),
}
