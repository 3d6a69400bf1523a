use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use utoipa::ToSchema;

/// Antenna description as stored in the antenna registry.
///
/// When `pattern_file` is set and readable it takes precedence over the
/// parabolic parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AntennaPattern {
    #[serde(default)]
    pub diameter_m: Option<f64>,
    #[serde(default)]
    pub efficiency: Option<f64>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub pattern_file: Option<PathBuf>,
}

impl AntennaPattern {
    /// Rejects an aperture efficiency outside (0, 1].
    pub fn validate(&self) -> Result<(), String> {
        match self.efficiency {
            Some(eta) if !(eta > 0.0 && eta <= 1.0) => {
                Err(format!("efficiency must lie in (0, 1], got {}", eta))
            }
            _ => Ok(()),
        }
    }
}
