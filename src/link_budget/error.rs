use thiserror::Error;

use crate::geometry::GeometryError;

#[derive(Debug, Error)]
pub enum LinkBudgetError {
    #[error("invalid parameter {name}: {value} (must be positive)")]
    InvalidParameter { name: &'static str, value: f64 },
    #[error("station has no receive antenna")]
    MissingRxAntenna,
    #[error("unknown antenna: {0}")]
    UnknownAntenna(String),
    #[error("geometry error: {0}")]
    Geometry(#[from] GeometryError),
}
