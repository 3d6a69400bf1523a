use chrono::{DateTime, Utc};
use std::f64::consts::PI;

use super::error::LinkBudgetError;
use super::types::LinkBudgetResult;
use crate::antenna::pattern_gain_dbi;
use crate::catalog::{AntennaCatalog, GroundStation, Satellite};
use crate::geometry::constants::{BOLTZMANN_J_K, SPEED_OF_LIGHT_M_S};
use crate::geometry::{slant_range, vector_angle_deg, KeplerSolver};

pub const DEFAULT_FREQUENCY_HZ: f64 = 12e9;

fn require_positive(name: &'static str, value: f64) -> Result<f64, LinkBudgetError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(LinkBudgetError::InvalidParameter { name, value })
    }
}

/// Free-space path loss `20 log10(4 pi d f / c)` in dB.
pub fn free_space_loss_db(distance_m: f64, freq_hz: f64) -> Result<f64, LinkBudgetError> {
    let d = require_positive("distance_m", distance_m)?;
    let f = require_positive("frequency_Hz", freq_hz)?;
    Ok(20.0 * (4.0 * PI * d * f / SPEED_OF_LIGHT_M_S).log10())
}

/// Thermal noise power `10 log10(k T B)` in dBW.
pub fn noise_power_dbw(t_sys_k: f64, bandwidth_hz: f64) -> Result<f64, LinkBudgetError> {
    let t = require_positive("T_sys_K", t_sys_k)?;
    let b = require_positive("bandwidth_Hz", bandwidth_hz)?;
    Ok(10.0 * (BOLTZMANN_J_K * t * b).log10())
}

/// EIRP toward the ground. An explicit EIRP wins; otherwise transmit power
/// plus on-axis transmit gain. Transmit pointing error is not modelled.
pub fn transmit_eirp_dbw(satellite: &Satellite, antennas: &AntennaCatalog, freq_hz: f64) -> f64 {
    if let Some(eirp) = satellite.net_eirp_dbw() {
        return eirp;
    }
    let tx_gain = match satellite.tx_antenna_id.as_deref() {
        Some(id) => match antennas.get(id) {
            Some(antenna) => pattern_gain_dbi(antenna, 0.0, freq_hz),
            None => {
                log::debug!("Transmit antenna {} not in catalog, assuming 0 dBi", id);
                0.0
            }
        },
        None => 0.0,
    };
    satellite.tx_power_dbw.unwrap_or(0.0) + tx_gain - satellite.tx_losses_db
}

/// Carrier, interference and noise at `station` for a serving/interfering
/// satellite pair, evaluated at the current instant.
pub fn compute_ci(
    station: &GroundStation,
    serving: &Satellite,
    interferer: &Satellite,
    antennas: &AntennaCatalog,
) -> Result<LinkBudgetResult, LinkBudgetError> {
    compute_ci_at(
        station,
        serving,
        interferer,
        antennas,
        Utc::now(),
        &KeplerSolver::default(),
    )
}

/// As [`compute_ci`] with an explicit evaluation instant, which only matters
/// when one of the satellites is non-geostationary.
pub fn compute_ci_at(
    station: &GroundStation,
    serving: &Satellite,
    interferer: &Satellite,
    antennas: &AntennaCatalog,
    at: DateTime<Utc>,
    solver: &KeplerSolver,
) -> Result<LinkBudgetResult, LinkBudgetError> {
    let station_pos = station.position_ecef_m();
    let serving_pos = serving.orbit.position_ecef_m(at, solver)?;
    let interferer_pos = interferer.orbit.position_ecef_m(at, solver)?;

    let (distance_a, vec_a) = slant_range(&station_pos, &serving_pos);
    let (distance_b, vec_b) = slant_range(&station_pos, &interferer_pos);
    let angle_deg = vector_angle_deg(&vec_a, &vec_b);

    let freq = require_positive(
        "frequency_Hz",
        serving
            .frequency_hz
            .or(interferer.frequency_hz)
            .unwrap_or(DEFAULT_FREQUENCY_HZ),
    )?;

    let rx_id = station
        .rx_antenna_id
        .as_deref()
        .ok_or(LinkBudgetError::MissingRxAntenna)?;
    let rx_model = antennas
        .get(rx_id)
        .ok_or_else(|| LinkBudgetError::UnknownAntenna(rx_id.to_string()))?
        .gain_model();
    let g_rx_on = rx_model.gain_dbi(0.0, freq);
    let g_rx_off = rx_model.gain_dbi(angle_deg, freq);

    let eirp_a = transmit_eirp_dbw(serving, antennas, freq);
    let eirp_b = transmit_eirp_dbw(interferer, antennas, freq);

    let fsl_a = free_space_loss_db(distance_a, freq)?;
    let fsl_b = free_space_loss_db(distance_b, freq)?;

    let rx_losses = station.rx_system.rx_losses_db;
    let c_dbw = eirp_a + g_rx_on - fsl_a - rx_losses;
    let i_dbw = eirp_b + g_rx_off - fsl_b - rx_losses;

    let n_dbw = noise_power_dbw(station.rx_system.t_sys_k, station.rx_system.bandwidth_hz)?;

    Ok(LinkBudgetResult {
        angle_deg,
        distance_serving_m: distance_a,
        distance_interferer_m: distance_b,
        fsl_serving_db: fsl_a,
        fsl_interferer_db: fsl_b,
        eirp_serving_dbw: eirp_a,
        eirp_interferer_dbw: eirp_b,
        g_rx_on_axis_dbi: g_rx_on,
        g_rx_off_axis_dbi: g_rx_off,
        c_dbw,
        i_dbw,
        c_over_i_db: c_dbw - i_dbw,
        n_dbw,
        i_over_n_db: i_dbw - n_dbw,
    })
}
