use serde::Deserialize;
use std::fs;
use std::path::Path;

use super::error::PatternError;

#[derive(Debug, Deserialize)]
struct PatternFile {
    angles_deg: Vec<f64>,
    #[serde(rename = "gains_dBi")]
    gains_dbi: Vec<f64>,
}

/// Tabulated off-axis angle to gain pairs, angles non-decreasing.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternTable {
    angles_deg: Vec<f64>,
    gains_dbi: Vec<f64>,
}

impl PatternTable {
    pub fn new(angles_deg: Vec<f64>, gains_dbi: Vec<f64>) -> Result<Self, PatternError> {
        if angles_deg.is_empty() {
            return Err(PatternError::Malformed("empty table".into()));
        }
        if angles_deg.len() != gains_dbi.len() {
            return Err(PatternError::Malformed(format!(
                "{} angles but {} gains",
                angles_deg.len(),
                gains_dbi.len()
            )));
        }
        if angles_deg.iter().chain(&gains_dbi).any(|v| !v.is_finite()) {
            return Err(PatternError::Malformed("non-finite entry".into()));
        }
        if angles_deg.windows(2).any(|w| w[1] < w[0]) {
            return Err(PatternError::Malformed("angles must be sorted".into()));
        }
        Ok(Self {
            angles_deg,
            gains_dbi,
        })
    }

    /// Load `{"angles_deg": [...], "gains_dBi": [...]}`.
    pub fn from_file(path: &Path) -> Result<Self, PatternError> {
        let content = fs::read_to_string(path)?;
        let file: PatternFile = serde_json::from_str(&content)?;
        Self::new(file.angles_deg, file.gains_dbi)
    }

    /// Piecewise-linear gain at `angle_deg`, clamped to the end values
    /// outside the tabulated range.
    pub fn interpolate(&self, angle_deg: f64) -> f64 {
        let angles = &self.angles_deg;
        let gains = &self.gains_dbi;
        let last = angles.len() - 1;

        if angle_deg.is_nan() || angle_deg <= angles[0] {
            return gains[0];
        }
        if angle_deg >= angles[last] {
            return gains[last];
        }

        let upper = angles.partition_point(|&a| a <= angle_deg);
        let lower = upper - 1;
        let (x0, x1) = (angles[lower], angles[upper]);
        let (y0, y1) = (gains[lower], gains[upper]);
        if angle_deg == x0 {
            return y0;
        }
        y0 + (y1 - y0) * (angle_deg - x0) / (x1 - x0)
    }
}
