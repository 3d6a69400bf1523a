use std::f64::consts::PI;

use super::pattern::PatternTable;
use super::types::AntennaPattern;
use crate::geometry::constants::SPEED_OF_LIGHT_M_S;

/// Returned when the aperture gain is not positive; callers treat it as
/// "effectively no gain".
pub const DEGENERATE_GAIN_DBI: f64 = -999.0;

pub const DEFAULT_DIAMETER_M: f64 = 1.0;
pub const DEFAULT_EFFICIENCY: f64 = 0.6;

/// Parabolic dish gain with a quadratic main-lobe roll-off.
///
/// On-axis gain is `eta * (pi D / lambda)^2`, the 3 dB beamwidth is taken as
/// `70 lambda / D` degrees and off-axis attenuation as
/// `12 (theta / theta_3dB)^2` dB.
pub fn parabolic_gain_dbi(diameter_m: f64, efficiency: f64, freq_hz: f64, off_axis_deg: f64) -> f64 {
    let wavelength = SPEED_OF_LIGHT_M_S / freq_hz;
    let g0_lin = efficiency * (PI * diameter_m / wavelength).powi(2);
    if !(g0_lin.is_finite() && g0_lin > 0.0) {
        return DEGENERATE_GAIN_DBI;
    }
    let g0_dbi = 10.0 * g0_lin.log10();
    if off_axis_deg <= 0.0 {
        return g0_dbi;
    }
    let theta_3db = 70.0 * wavelength / diameter_m;
    g0_dbi - 12.0 * (off_axis_deg / theta_3db).powi(2)
}

/// Resolved gain source for one antenna. Resolving reads the pattern file
/// once so repeated lookups stay off the filesystem.
#[derive(Debug, Clone, PartialEq)]
pub enum GainModel {
    Tabulated(PatternTable),
    Parabolic { diameter_m: f64, efficiency: f64 },
}

impl GainModel {
    pub fn gain_dbi(&self, off_axis_deg: f64, freq_hz: f64) -> f64 {
        match self {
            GainModel::Tabulated(table) => table.interpolate(off_axis_deg),
            GainModel::Parabolic {
                diameter_m,
                efficiency,
            } => parabolic_gain_dbi(*diameter_m, *efficiency, freq_hz, off_axis_deg),
        }
    }
}

impl AntennaPattern {
    pub fn gain_model(&self) -> GainModel {
        if let Some(path) = &self.pattern_file {
            match PatternTable::from_file(path) {
                Ok(table) => return GainModel::Tabulated(table),
                Err(e) => {
                    log::debug!(
                        "Falling back to parabolic model, pattern {} unusable: {}",
                        path.display(),
                        e
                    );
                }
            }
        }
        GainModel::Parabolic {
            diameter_m: self.diameter_m.unwrap_or(DEFAULT_DIAMETER_M),
            efficiency: self.efficiency.unwrap_or(DEFAULT_EFFICIENCY),
        }
    }
}

/// Gain of `pattern` at `off_axis_deg`. Never fails: an unusable pattern
/// file falls back to the parabolic model.
pub fn pattern_gain_dbi(pattern: &AntennaPattern, off_axis_deg: f64, freq_hz: f64) -> f64 {
    pattern.gain_model().gain_dbi(off_axis_deg, freq_hz)
}
