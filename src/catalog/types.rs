use chrono::{DateTime, Utc};
use nalgebra::Vector3;
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::antenna::AntennaPattern;
use crate::geometry::{
    eci_to_ecef, geodetic_to_cartesian, gmst_rad, gso_position, GeometryError, KeplerSolver,
    KeplerianElements,
};

pub type AntennaCatalog = BTreeMap<String, AntennaPattern>;

pub const DEFAULT_T_SYS_K: f64 = 500.0;
pub const DEFAULT_BANDWIDTH_HZ: f64 = 36e6;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RxSystem {
    #[serde(rename = "T_sys_K")]
    pub t_sys_k: f64,
    #[serde(rename = "bandwidth_Hz")]
    pub bandwidth_hz: f64,
    #[serde(rename = "rx_losses_dB")]
    pub rx_losses_db: f64,
}

impl Default for RxSystem {
    fn default() -> Self {
        Self {
            t_sys_k: DEFAULT_T_SYS_K,
            bandwidth_hz: DEFAULT_BANDWIDTH_HZ,
            rx_losses_db: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GroundStation {
    #[serde(alias = "latitude_deg")]
    pub lat_deg: f64,
    #[serde(alias = "longitude_deg")]
    pub lon_deg: f64,
    #[serde(default)]
    pub alt_m: f64,
    #[serde(default)]
    pub rx_antenna_id: Option<String>,
    #[serde(default)]
    pub rx_system: RxSystem,
    /// Fixed receive gain used by the NGSO sweep instead of a pattern.
    #[serde(default, rename = "antenna_gain_dB")]
    pub antenna_gain_db: Option<f64>,
}

impl GroundStation {
    pub fn position_ecef_m(&self) -> Vector3<f64> {
        geodetic_to_cartesian(self.lat_deg, self.lon_deg, self.alt_m)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Orbit {
    Gso { lon_deg: f64, incl_deg: f64 },
    Ngso(KeplerianElements),
}

impl Orbit {
    /// Earth-fixed position in metres at `at`. GSO positions do not depend
    /// on time; Keplerian positions are rotated out of the inertial frame by
    /// the sidereal angle at `at`.
    pub fn position_ecef_m(
        &self,
        at: DateTime<Utc>,
        solver: &KeplerSolver,
    ) -> Result<Vector3<f64>, GeometryError> {
        match self {
            Orbit::Gso { lon_deg, incl_deg } => Ok(gso_position(*lon_deg, *incl_deg)),
            Orbit::Ngso(elements) => {
                let eci_km = elements.propagate(at, solver)?.position_eci_km;
                Ok(eci_to_ecef(&(eci_km * 1000.0), gmst_rad(at)))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "SatelliteRecord")]
pub struct Satellite {
    pub orbit: Orbit,
    pub frequency_hz: Option<f64>,
    pub tx_eirp_dbw: Option<f64>,
    pub tx_losses_db: f64,
    pub tx_power_dbw: Option<f64>,
    pub tx_antenna_id: Option<String>,
}

impl Satellite {
    pub fn keplerian(&self) -> Option<&KeplerianElements> {
        match &self.orbit {
            Orbit::Ngso(elements) => Some(elements),
            Orbit::Gso { .. } => None,
        }
    }

    /// Explicit EIRP net of transmit losses, if the record carries one.
    pub fn net_eirp_dbw(&self) -> Option<f64> {
        self.tx_eirp_dbw.map(|eirp| eirp - self.tx_losses_db)
    }
}

/// Wire form of a satellite record. The orbit kind is chosen by the presence
/// of a `keplerian` object.
#[derive(Debug, Deserialize)]
struct SatelliteRecord {
    #[serde(default)]
    keplerian: Option<KeplerianElements>,
    #[serde(default)]
    lon_deg: Option<f64>,
    #[serde(default)]
    incl_deg: f64,
    #[serde(default, rename = "frequency_Hz")]
    frequency_hz: Option<f64>,
    #[serde(default, rename = "tx_eirp_dBW")]
    tx_eirp_dbw: Option<f64>,
    #[serde(default, rename = "tx_losses_dB")]
    tx_losses_db: f64,
    #[serde(default, rename = "tx_power_dBW")]
    tx_power_dbw: Option<f64>,
    #[serde(default)]
    tx_antenna_id: Option<String>,
}

impl TryFrom<SatelliteRecord> for Satellite {
    type Error = String;

    fn try_from(record: SatelliteRecord) -> Result<Self, Self::Error> {
        let orbit = match (record.keplerian, record.lon_deg) {
            (Some(elements), _) => Orbit::Ngso(elements),
            (None, Some(lon_deg)) => Orbit::Gso {
                lon_deg,
                incl_deg: record.incl_deg,
            },
            (None, None) => {
                return Err("satellite needs either `keplerian` elements or `lon_deg`".into())
            }
        };
        Ok(Satellite {
            orbit,
            frequency_hz: record.frequency_hz,
            tx_eirp_dbw: record.tx_eirp_dbw,
            tx_losses_db: record.tx_losses_db,
            tx_power_dbw: record.tx_power_dbw,
            tx_antenna_id: record.tx_antenna_id,
        })
    }
}
