use chrono::{DateTime, Utc};
use nalgebra::{Rotation3, Vector3};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::constants::MU_EARTH_KM3_S2;
use super::error::GeometryError;

/// Classical two-body element set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct KeplerianElements {
    pub a_km: f64,
    pub e: f64,
    pub i_deg: f64,
    pub raan_deg: f64,
    pub argp_deg: f64,
    #[serde(rename = "M0_deg")]
    pub m0_deg: f64,
    pub epoch: DateTime<Utc>,
}

/// Fixed-point solver for Kepler's equation `E = M + e sin E`.
///
/// Without a tolerance the solver always runs `iterations` steps. Highly
/// eccentric orbits converge slowly and may need more iterations or a
/// tolerance for a usable answer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct KeplerSolver {
    pub iterations: u32,
    pub tolerance: Option<f64>,
}

impl Default for KeplerSolver {
    fn default() -> Self {
        Self {
            iterations: 10,
            tolerance: None,
        }
    }
}

impl KeplerSolver {
    pub fn eccentric_anomaly(&self, mean_anomaly: f64, e: f64) -> f64 {
        let mut ea = mean_anomaly;
        for _ in 0..self.iterations {
            let next = mean_anomaly + e * ea.sin();
            let delta = (next - ea).abs();
            ea = next;
            if self.tolerance.is_some_and(|tol| delta < tol) {
                break;
            }
        }
        ea
    }
}

/// Propagated position plus the anomalies it was derived from.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrbitalPosition {
    pub timestamp: DateTime<Utc>,
    #[schema(value_type = Vec<f64>)]
    pub position_eci_km: Vector3<f64>,
    pub radius_km: f64,
    pub eccentric_anomaly_rad: f64,
    pub true_anomaly_deg: f64,
}

impl KeplerianElements {
    pub fn validate(&self) -> Result<(), GeometryError> {
        if !(self.a_km.is_finite() && self.a_km > 0.0) {
            return Err(GeometryError::InvalidElements(format!(
                "semi-major axis must be positive, got {}",
                self.a_km
            )));
        }
        if !(0.0..1.0).contains(&self.e) {
            return Err(GeometryError::InvalidElements(format!(
                "eccentricity must satisfy 0 <= e < 1, got {}",
                self.e
            )));
        }
        let angles = [self.i_deg, self.raan_deg, self.argp_deg, self.m0_deg];
        if angles.iter().any(|a| !a.is_finite()) {
            return Err(GeometryError::InvalidElements(
                "angles must be finite".to_string(),
            ));
        }
        Ok(())
    }

    /// Mean motion in rad/s.
    pub fn mean_motion(&self) -> f64 {
        (MU_EARTH_KM3_S2 / self.a_km.powi(3)).sqrt()
    }

    pub fn propagate(
        &self,
        at: DateTime<Utc>,
        solver: &KeplerSolver,
    ) -> Result<OrbitalPosition, GeometryError> {
        self.validate()?;

        let elapsed = at - self.epoch;
        let dt = elapsed
            .num_microseconds()
            .map_or(elapsed.num_seconds() as f64, |us| us as f64 * 1e-6);

        let mean_anomaly = self.m0_deg.to_radians() + self.mean_motion() * dt;
        let e = self.e;
        let ea = solver.eccentric_anomaly(mean_anomaly, e);

        let nu = 2.0
            * ((1.0 + e).sqrt() * (ea / 2.0).sin()).atan2((1.0 - e).sqrt() * (ea / 2.0).cos());

        let r_orbital = Vector3::new(
            self.a_km * (ea.cos() - e),
            self.a_km * (1.0 - e * e).sqrt() * ea.sin(),
            0.0,
        );

        // 3-1-3 sequence: RAAN about z, inclination about x, perigee about z.
        let rotation = Rotation3::from_axis_angle(&Vector3::z_axis(), self.raan_deg.to_radians())
            * Rotation3::from_axis_angle(&Vector3::x_axis(), self.i_deg.to_radians())
            * Rotation3::from_axis_angle(&Vector3::z_axis(), self.argp_deg.to_radians());
        let position = rotation * r_orbital;

        Ok(OrbitalPosition {
            timestamp: at,
            position_eci_km: position,
            radius_km: position.norm(),
            eccentric_anomaly_rad: ea,
            true_anomaly_deg: nu.to_degrees(),
        })
    }
}

/// ECI position (km) of the element set at `at`, or now when `at` is `None`.
pub fn keplerian_to_eci(
    elements: &KeplerianElements,
    at: Option<DateTime<Utc>>,
) -> Result<Vector3<f64>, GeometryError> {
    let at = at.unwrap_or_else(Utc::now);
    Ok(elements
        .propagate(at, &KeplerSolver::default())?
        .position_eci_km)
}
