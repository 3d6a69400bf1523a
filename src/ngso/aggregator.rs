use chrono::{DateTime, Duration, Utc};
use nalgebra::Vector3;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::error::{PairError, SimulationError};
use super::types::{InterferenceSample, InterferenceSeries, Summation};
use crate::catalog::{GroundStation, Satellite};
use crate::geometry::{slant_range, KeplerSolver};

/// `20 log10(4 pi / c)` folded into one constant for d in metres, f in Hz.
pub const FSL_CONSTANT_DB: f64 = 147.55;

#[derive(Debug, Clone, Copy)]
pub struct SimulationParams {
    pub analysis_start: DateTime<Utc>,
    pub step: Duration,
    pub duration: Duration,
    pub summation: Summation,
    pub solver: KeplerSolver,
}

impl SimulationParams {
    pub fn new(analysis_start: DateTime<Utc>, step: Duration, duration: Duration) -> Self {
        Self {
            analysis_start,
            step,
            duration,
            summation: Summation::default(),
            solver: KeplerSolver::default(),
        }
    }
}

/// Shared flag checked at every time-step boundary.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

pub fn ngso_path_loss_db(distance_m: f64, freq_hz: f64) -> f64 {
    20.0 * distance_m.log10() + 20.0 * freq_hz.log10() - FSL_CONSTANT_DB
}

/// Interference from one satellite into one station using the station's
/// fixed gain figure.
pub fn pair_contribution_db(
    satellite: &Satellite,
    satellite_ecef_m: &Vector3<f64>,
    station: &GroundStation,
    station_ecef_m: &Vector3<f64>,
) -> Result<f64, PairError> {
    let freq = satellite
        .frequency_hz
        .ok_or(PairError::MissingField("frequency_Hz"))?;
    if !(freq.is_finite() && freq > 0.0) {
        return Err(PairError::NonPositive {
            name: "frequency_Hz",
            value: freq,
        });
    }
    let eirp = satellite
        .net_eirp_dbw()
        .ok_or(PairError::MissingField("tx_eirp_dBW"))?;
    let gain = station
        .antenna_gain_db
        .ok_or(PairError::MissingField("antenna_gain_dB"))?;
    let (distance_m, _) = slant_range(station_ecef_m, satellite_ecef_m);
    if !(distance_m > 0.0) {
        return Err(PairError::NonPositive {
            name: "distance_m",
            value: distance_m,
        });
    }
    Ok(eirp + gain - ngso_path_loss_db(distance_m, freq))
}

struct Accumulator {
    summation: Summation,
    db_sum: f64,
    linear_sum: f64,
    contributing: usize,
    skipped: usize,
}

impl Accumulator {
    fn new(summation: Summation) -> Self {
        Self {
            summation,
            db_sum: 0.0,
            linear_sum: 0.0,
            contributing: 0,
            skipped: 0,
        }
    }

    fn add(&mut self, contribution_db: f64) {
        self.db_sum += contribution_db;
        self.linear_sum += 10f64.powf(contribution_db / 10.0);
        self.contributing += 1;
    }

    fn finish(self, timestamp: DateTime<Utc>) -> InterferenceSample {
        let total = match self.summation {
            Summation::Decibel => Some(self.db_sum),
            Summation::Power => (self.contributing > 0).then(|| 10.0 * self.linear_sum.log10()),
        };
        InterferenceSample {
            timestamp,
            total_interference_db: total,
            contributing_pairs: self.contributing,
            skipped_pairs: self.skipped,
        }
    }
}

fn sample_at(
    constellation: &[(&str, &Satellite)],
    stations: &[(&str, &GroundStation, Vector3<f64>)],
    at: DateTime<Utc>,
    params: &SimulationParams,
) -> InterferenceSample {
    let mut acc = Accumulator::new(params.summation);

    for (sat_id, satellite) in constellation {
        let position = match satellite.orbit.position_ecef_m(at, &params.solver) {
            Ok(p) => p,
            Err(e) => {
                log::debug!("{} skipped at {}: {}", sat_id, at, e);
                acc.skipped += stations.len();
                continue;
            }
        };

        for (station_id, station, station_pos) in stations {
            match pair_contribution_db(satellite, &position, station, station_pos) {
                Ok(db) => acc.add(db),
                Err(e) => {
                    log::debug!("{} -> {} skipped at {}: {}", sat_id, station_id, at, e);
                    acc.skipped += 1;
                }
            }
        }
    }

    acc.finish(at)
}

fn micros(name: &'static str, value: Duration) -> Result<i64, SimulationError> {
    value
        .num_microseconds()
        .ok_or_else(|| SimulationError::InvalidParameter {
            name,
            reason: "out of range".into(),
        })
}

/// Aggregate NGSO interference into every station over the analysis window.
///
/// Samples are taken at `analysis_start + k * step` while `k * step <
/// duration`. Only satellites carrying Keplerian elements take part. A pair
/// that cannot be evaluated is skipped for that sample and counted; it never
/// aborts the run. Time steps run on the rayon pool and the series comes
/// back in timestamp order.
pub fn simulate_interference(
    satellites: &BTreeMap<String, Satellite>,
    stations: &BTreeMap<String, GroundStation>,
    params: &SimulationParams,
    cancel: Option<&CancelToken>,
) -> Result<InterferenceSeries, SimulationError> {
    let step_us = micros("step", params.step)?;
    let duration_us = micros("duration", params.duration)?;
    if step_us <= 0 {
        return Err(SimulationError::InvalidParameter {
            name: "step",
            reason: "must be positive".into(),
        });
    }
    if duration_us < 0 {
        return Err(SimulationError::InvalidParameter {
            name: "duration",
            reason: "must not be negative".into(),
        });
    }
    let sample_count = duration_us / step_us + i64::from(duration_us % step_us != 0);
    // Offsets grow with k, so a representable last instant covers the window.
    if sample_count > 0 {
        let last_offset_us = (sample_count - 1) * step_us;
        if params
            .analysis_start
            .checked_add_signed(Duration::microseconds(last_offset_us))
            .is_none()
        {
            return Err(SimulationError::InvalidParameter {
                name: "duration",
                reason: "window runs past the representable time range".into(),
            });
        }
    }
    let sample_count = sample_count as usize;

    let constellation: Vec<(&str, &Satellite)> = satellites
        .iter()
        .filter(|(_, sat)| sat.keplerian().is_some())
        .map(|(id, sat)| (id.as_str(), sat))
        .collect();
    let station_positions: Vec<(&str, &GroundStation, Vector3<f64>)> = stations
        .iter()
        .map(|(id, station)| (id.as_str(), station, station.position_ecef_m()))
        .collect();

    log::info!(
        "NGSO sweep from {}: {} satellites x {} stations, {} samples",
        params.analysis_start,
        constellation.len(),
        station_positions.len(),
        sample_count
    );

    let samples = (0..sample_count)
        .into_par_iter()
        .map(|k| {
            if cancel.is_some_and(CancelToken::is_cancelled) {
                return Err(SimulationError::Cancelled);
            }
            let at = params.analysis_start + Duration::microseconds(k as i64 * step_us);
            Ok(sample_at(&constellation, &station_positions, at, params))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let skipped_pairs: usize = samples.iter().map(|s| s.skipped_pairs).sum();
    if skipped_pairs > 0 {
        log::warn!(
            "NGSO sweep skipped {} satellite/station pairs across {} samples",
            skipped_pairs,
            samples.len()
        );
    }

    Ok(InterferenceSeries {
        analysis_start: params.analysis_start,
        step_seconds: step_us as f64 * 1e-6,
        summation: params.summation,
        samples,
        skipped_pairs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Orbit, RxSystem};
    use crate::geometry::constants::SPEED_OF_LIGHT_M_S;
    use crate::geometry::KeplerianElements;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use chrono::TimeZone;
    use std::f64::consts::PI;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
    }

    fn ngso_sat(e: f64, eirp: Option<f64>) -> Satellite {
        Satellite {
            orbit: Orbit::Ngso(KeplerianElements {
                a_km: 6_928.0,
                e,
                i_deg: 53.0,
                raan_deg: 20.0,
                argp_deg: 0.0,
                m0_deg: 0.0,
                epoch: start(),
            }),
            frequency_hz: Some(11.7e9),
            tx_eirp_dbw: eirp,
            tx_losses_db: 0.0,
            tx_power_dbw: None,
            tx_antenna_id: None,
        }
    }

    fn station(lat_deg: f64, lon_deg: f64) -> GroundStation {
        GroundStation {
            lat_deg,
            lon_deg,
            alt_m: 0.0,
            rx_antenna_id: None,
            rx_system: RxSystem::default(),
            antenna_gain_db: Some(30.0),
        }
    }

    fn stations() -> BTreeMap<String, GroundStation> {
        BTreeMap::from([
            ("ES1".to_string(), station(31.0, 121.0)),
            ("ES2".to_string(), station(-33.9, 18.4)),
        ])
    }

    fn params(summation: Summation) -> SimulationParams {
        SimulationParams {
            summation,
            ..SimulationParams::new(start(), Duration::seconds(60), Duration::hours(1))
        }
    }

    #[test]
    fn folded_constant_matches_free_space_loss() {
        let exact = 20.0 * (4.0 * PI * 1e6 * 12e9 / SPEED_OF_LIGHT_M_S).log10();
        assert_abs_diff_eq!(ngso_path_loss_db(1e6, 12e9), exact, epsilon = 0.02);
    }

    #[test]
    fn series_is_ordered_and_end_exclusive() {
        let sats = BTreeMap::from([("S1".to_string(), ngso_sat(0.0, Some(40.0)))]);
        let series =
            simulate_interference(&sats, &stations(), &params(Summation::Power), None).unwrap();
        assert_eq!(series.samples.len(), 60);
        assert_eq!(series.samples[0].timestamp, start());
        for pair in series.samples.windows(2) {
            assert_eq!(pair[1].timestamp - pair[0].timestamp, Duration::seconds(60));
        }
        assert_eq!(series.skipped_pairs, 0);
        assert!(series.samples.iter().all(|s| s.contributing_pairs == 2));
    }

    #[test]
    fn decibel_summation_adds_contributions() {
        let sat = ngso_sat(0.0, Some(40.0));
        let sats = BTreeMap::from([("S1".to_string(), sat.clone())]);
        let stations = stations();
        let series =
            simulate_interference(&sats, &stations, &params(Summation::Decibel), None).unwrap();

        let at = series.samples[5].timestamp;
        let pos = sat
            .orbit
            .position_ecef_m(at, &KeplerSolver::default())
            .unwrap();
        let expected: f64 = stations
            .values()
            .map(|s| pair_contribution_db(&sat, &pos, s, &s.position_ecef_m()).unwrap())
            .sum();
        assert_relative_eq!(
            series.samples[5].total_interference_db.unwrap(),
            expected,
            epsilon = 1e-9
        );
    }

    #[test]
    fn power_summation_of_equal_contributions_adds_three_db() {
        let sat = ngso_sat(0.0, Some(40.0));
        let sats = BTreeMap::from([
            ("S1".to_string(), sat.clone()),
            ("S2".to_string(), sat.clone()),
        ]);
        let one_station = BTreeMap::from([("ES1".to_string(), station(0.0, 0.0))]);
        let series =
            simulate_interference(&sats, &one_station, &params(Summation::Power), None).unwrap();

        let at = series.samples[0].timestamp;
        let pos = sat
            .orbit
            .position_ecef_m(at, &KeplerSolver::default())
            .unwrap();
        let es = &one_station["ES1"];
        let single = pair_contribution_db(&sat, &pos, es, &es.position_ecef_m()).unwrap();
        assert_relative_eq!(
            series.samples[0].total_interference_db.unwrap(),
            single + 10.0 * 2f64.log10(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn bad_records_are_skipped_and_counted() {
        let mut gso = ngso_sat(0.0, Some(40.0));
        gso.orbit = Orbit::Gso {
            lon_deg: 10.0,
            incl_deg: 0.0,
        };
        let sats = BTreeMap::from([
            ("GOOD".to_string(), ngso_sat(0.0, Some(40.0))),
            ("NO_EIRP".to_string(), ngso_sat(0.0, None)),
            ("HYPERBOLIC".to_string(), ngso_sat(1.2, Some(40.0))),
            ("GSO".to_string(), gso),
        ]);
        let p = SimulationParams::new(start(), Duration::seconds(10), Duration::seconds(30));
        let series = simulate_interference(&sats, &stations(), &p, None).unwrap();

        assert_eq!(series.samples.len(), 3);
        for sample in &series.samples {
            assert_eq!(sample.contributing_pairs, 2);
            assert_eq!(sample.skipped_pairs, 4);
            assert!(sample.total_interference_db.is_some());
        }
        assert_eq!(series.skipped_pairs, 12);
    }

    #[test]
    fn station_without_gain_is_skipped() {
        let sats = BTreeMap::from([("S1".to_string(), ngso_sat(0.0, Some(40.0)))]);
        let mut bare = station(10.0, 20.0);
        bare.antenna_gain_db = None;
        let stations = BTreeMap::from([("BARE".to_string(), bare)]);
        let p = SimulationParams::new(start(), Duration::seconds(60), Duration::seconds(60));
        let series = simulate_interference(&sats, &stations, &p, None).unwrap();

        assert_eq!(series.samples.len(), 1);
        assert_eq!(series.samples[0].contributing_pairs, 0);
        assert_eq!(series.samples[0].skipped_pairs, 1);
        assert_eq!(series.samples[0].total_interference_db, None);
        assert_eq!(series.skipped_pairs, 1);
    }

    #[test]
    fn empty_constellation() {
        let sats = BTreeMap::new();
        let decibel =
            simulate_interference(&sats, &stations(), &params(Summation::Decibel), None).unwrap();
        assert_eq!(decibel.samples[0].total_interference_db, Some(0.0));
        let power =
            simulate_interference(&sats, &stations(), &params(Summation::Power), None).unwrap();
        assert_eq!(power.samples[0].total_interference_db, None);
    }

    #[test]
    fn explicit_start_is_reproducible() {
        let sats = BTreeMap::from([("S1".to_string(), ngso_sat(0.01, Some(40.0)))]);
        let a = simulate_interference(&sats, &stations(), &params(Summation::Power), None).unwrap();
        let b = simulate_interference(&sats, &stations(), &params(Summation::Power), None).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn cancelled_run_stops() {
        let sats = BTreeMap::from([("S1".to_string(), ngso_sat(0.0, Some(40.0)))]);
        let token = CancelToken::new();
        token.cancel();
        let result =
            simulate_interference(&sats, &stations(), &params(Summation::Power), Some(&token));
        assert!(matches!(result, Err(SimulationError::Cancelled)));
    }

    #[test]
    fn zero_step_is_rejected() {
        let p = SimulationParams::new(start(), Duration::zero(), Duration::hours(1));
        let result = simulate_interference(&BTreeMap::new(), &stations(), &p, None);
        assert!(matches!(
            result,
            Err(SimulationError::InvalidParameter { name: "step", .. })
        ));
    }

    #[test]
    fn zero_duration_yields_empty_series() {
        let p = SimulationParams::new(start(), Duration::seconds(1), Duration::zero());
        let series = simulate_interference(&BTreeMap::new(), &stations(), &p, None).unwrap();
        assert!(series.samples.is_empty());
    }

    #[test]
    fn window_past_the_end_of_time_is_rejected() {
        let late = DateTime::<Utc>::MAX_UTC - Duration::seconds(30);
        let p = SimulationParams::new(late, Duration::seconds(60), Duration::seconds(120));
        let sats = BTreeMap::from([("S1".to_string(), ngso_sat(0.0, Some(40.0)))]);
        let result = simulate_interference(&sats, &stations(), &p, None);
        assert!(matches!(
            result,
            Err(SimulationError::InvalidParameter {
                name: "duration",
                ..
            })
        ));
    }

    #[test]
    fn window_near_the_microsecond_limit_does_not_overflow() {
        let step = Duration::microseconds(i64::MAX / 2 + 10);
        let p = SimulationParams::new(start(), step, Duration::microseconds(i64::MAX - 5));
        let series = simulate_interference(&BTreeMap::new(), &stations(), &p, None).unwrap();
        assert_eq!(series.samples.len(), 2);
        assert_eq!(series.samples[1].timestamp, start() + step);
    }
}
