use approx::{assert_abs_diff_eq, assert_relative_eq};
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use sat_o_rfi::antenna::{parabolic_gain_dbi, pattern_gain_dbi, AntennaPattern};
use sat_o_rfi::catalog::{
    AntennaCatalog, CatalogLoader, CatalogPaths, GroundStation, Orbit, RxSystem, Satellite,
};
use sat_o_rfi::compliance::{check_i_over_n, threshold_db};
use sat_o_rfi::geometry::constants::{EARTH_RADIUS_M, GEO_RADIUS_M};
use sat_o_rfi::geometry::{vector_angle_deg, KeplerianElements};
use sat_o_rfi::link_budget::{compute_ci_at, free_space_loss_db};
use sat_o_rfi::ngso::{SimulationParams, Summation};
use sat_o_rfi::{check_threshold, compute_ci, keplerian_to_eci, simulate_interference};

fn equator_station() -> GroundStation {
    GroundStation {
        lat_deg: 0.0,
        lon_deg: 0.0,
        alt_m: 0.0,
        rx_antenna_id: Some("DISH".into()),
        rx_system: RxSystem::default(),
        antenna_gain_db: Some(35.0),
    }
}

fn gso(lon_deg: f64, eirp: f64) -> Satellite {
    Satellite {
        orbit: Orbit::Gso {
            lon_deg,
            incl_deg: 0.0,
        },
        frequency_hz: Some(12e9),
        tx_eirp_dbw: Some(eirp),
        tx_losses_db: 0.0,
        tx_power_dbw: None,
        tx_antenna_id: None,
    }
}

fn dish() -> AntennaCatalog {
    let mut antennas = AntennaCatalog::new();
    antennas.insert(
        "DISH".into(),
        AntennaPattern {
            diameter_m: Some(1.2),
            efficiency: Some(0.65),
            pattern_file: None,
        },
    );
    antennas
}

fn analysis_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 20, 12, 0, 0).unwrap()
}

fn leo(raan_deg: f64, m0_deg: f64) -> KeplerianElements {
    KeplerianElements {
        a_km: 6_928.0,
        e: 0.0,
        i_deg: 53.0,
        raan_deg,
        argp_deg: 0.0,
        m0_deg,
        epoch: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
    }
}

#[test]
fn station_under_gso_satellite() {
    let sat = gso(0.0, 50.0);
    let result = compute_ci(&equator_station(), &sat, &sat, &dish()).unwrap();

    assert_abs_diff_eq!(result.angle_deg, 0.0);
    assert_relative_eq!(
        result.distance_serving_m,
        GEO_RADIUS_M - EARTH_RADIUS_M,
        epsilon = 1e-3
    );
    assert_relative_eq!(result.distance_serving_m, 35_786_000.0, max_relative = 1e-4);
    assert_eq!(result.c_over_i_db, result.c_dbw - result.i_dbw);
    assert_eq!(result.c_over_i_db, 0.0);
}

#[test]
fn two_gso_satellites_two_degrees_apart() {
    let station = equator_station();
    let (a, b) = (gso(0.0, 50.0), gso(2.0, 50.0));
    let first = compute_ci(&station, &a, &b, &dish()).unwrap();
    let second = compute_ci(&station, &a, &b, &dish()).unwrap();

    // Topocentric separation exceeds the geocentric 2 degrees.
    assert!(first.angle_deg > 2.0 && first.angle_deg < 2.5);
    assert_eq!(first, second);
    assert_eq!(first.c_over_i_db, first.c_dbw - first.i_dbw);
    assert!(first.g_rx_off_axis_dbi < first.g_rx_on_axis_dbi);
    assert!(first.c_over_i_db > 0.0);
}

#[test]
fn identical_vectors_and_opposite_vectors() {
    let v = nalgebra::Vector3::new(1.0, -2.0, 3.0);
    assert_abs_diff_eq!(vector_angle_deg(&v, &v), 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(vector_angle_deg(&v, &-v), 180.0, epsilon = 1e-6);
}

#[test]
fn free_space_loss_grows_with_distance_and_frequency() {
    let base = free_space_loss_db(1_000_000.0, 12e9).unwrap();
    assert!(free_space_loss_db(2_000_000.0, 12e9).unwrap() > base);
    assert!(free_space_loss_db(1_000_000.0, 14e9).unwrap() > base);
}

#[test]
fn parabolic_gain_falls_off_axis() {
    let gains: Vec<f64> = (0..=40)
        .map(|i| parabolic_gain_dbi(1.2, 0.65, 12e9, i as f64 * 0.25))
        .collect();
    assert!(gains.windows(2).all(|w| w[1] <= w[0]));
}

#[test]
fn tabulated_gain_is_exact_at_knots() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("pattern.json");
    fs::write(
        &file,
        r#"{"angles_deg": [0, 1, 2.5, 10], "gains_dBi": [40.0, 33.3, 21.7, 5.0]}"#,
    )
    .unwrap();
    let pattern = AntennaPattern {
        diameter_m: Some(1.2),
        efficiency: Some(0.65),
        pattern_file: Some(file),
    };

    assert_eq!(pattern_gain_dbi(&pattern, 2.5, 12e9), 21.7);
    assert_eq!(pattern_gain_dbi(&pattern, 1.0, 12e9), 33.3);
}

#[test]
fn reuse_tightens_threshold() {
    assert!(threshold_db(false) > threshold_db(true));
    assert_relative_eq!(threshold_db(false), -6.02, epsilon = 0.01);
    assert_relative_eq!(threshold_db(true), -6.99, epsilon = 0.01);
}

#[test]
fn verdict_round_trips_through_threshold() {
    let station = equator_station();
    let result = compute_ci(&station, &gso(0.0, 50.0), &gso(2.0, 45.0), &dish()).unwrap();
    for reuse in [false, true] {
        let verdict = check_threshold(&result, reuse);
        let again = check_i_over_n(verdict.i_over_n_db, reuse);
        assert_eq!(verdict.acceptable, again.acceptable);
        assert_eq!(verdict, again);
    }
}

#[test]
fn circular_orbit_radius_is_constant() {
    let elements = leo(45.0, 10.0);
    for minutes in (0..=180).step_by(15) {
        let at = elements.epoch + Duration::minutes(minutes);
        let pos = keplerian_to_eci(&elements, Some(at)).unwrap();
        assert_relative_eq!(pos.norm(), 6_928.0, epsilon = 1e-6);
    }
}

#[test]
fn serving_ngso_link_uses_explicit_instant() {
    let station = equator_station();
    let mut serving = gso(0.0, 35.0);
    serving.orbit = Orbit::Ngso(leo(0.0, 0.0));
    let interferer = gso(0.0, 50.0);
    let solver = Default::default();

    let t0 = analysis_start();
    let a = compute_ci_at(&station, &serving, &interferer, &dish(), t0, &solver).unwrap();
    let b = compute_ci_at(&station, &serving, &interferer, &dish(), t0, &solver).unwrap();
    let later = compute_ci_at(
        &station,
        &serving,
        &interferer,
        &dish(),
        t0 + Duration::minutes(10),
        &solver,
    )
    .unwrap();

    assert_eq!(a, b);
    assert_ne!(a.distance_serving_m, later.distance_serving_m);
    assert_eq!(a.distance_interferer_m, later.distance_interferer_m);
}

#[test]
fn sweep_survives_bad_records() {
    let mut satellites = BTreeMap::new();
    let mut good = gso(0.0, 35.0);
    good.orbit = Orbit::Ngso(leo(0.0, 0.0));
    satellites.insert("LEO_GOOD".to_string(), good.clone());
    let mut hyperbolic = good.clone();
    hyperbolic.orbit = Orbit::Ngso(KeplerianElements {
        e: 1.2,
        ..leo(0.0, 0.0)
    });
    satellites.insert("LEO_BAD".to_string(), hyperbolic);
    let mut no_eirp = good;
    no_eirp.tx_eirp_dbw = None;
    satellites.insert("LEO_NO_EIRP".to_string(), no_eirp);
    satellites.insert("GSO_A".to_string(), gso(0.0, 50.0));

    let mut stations = BTreeMap::new();
    stations.insert("ES1".to_string(), equator_station());
    let mut far = equator_station();
    far.lat_deg = 45.0;
    far.lon_deg = 90.0;
    stations.insert("ES2".to_string(), far);

    let params = SimulationParams::new(
        analysis_start(),
        Duration::seconds(30),
        Duration::minutes(5),
    );
    let series = simulate_interference(&satellites, &stations, &params, None).unwrap();

    assert_eq!(series.samples.len(), 10);
    for (k, sample) in series.samples.iter().enumerate() {
        assert_eq!(
            sample.timestamp,
            analysis_start() + Duration::seconds(30 * k as i64)
        );
        assert_eq!(sample.contributing_pairs, 2);
        assert_eq!(sample.skipped_pairs, 4);
        assert!(sample.total_interference_db.is_some());
    }
    assert_eq!(series.skipped_pairs, 40);
}

#[test]
fn decibel_summation_adds_contributions_directly() {
    let mut satellites = BTreeMap::new();
    for (id, m0) in [("LEO_1", 0.0), ("LEO_2", 90.0)] {
        let mut sat = gso(0.0, 35.0);
        sat.orbit = Orbit::Ngso(leo(0.0, m0));
        satellites.insert(id.to_string(), sat);
    }
    let mut stations = BTreeMap::new();
    stations.insert("ES1".to_string(), equator_station());

    let mut params =
        SimulationParams::new(analysis_start(), Duration::seconds(1), Duration::seconds(1));
    let power = simulate_interference(&satellites, &stations, &params, None).unwrap();
    params.summation = Summation::Decibel;
    let decibel = simulate_interference(&satellites, &stations, &params, None).unwrap();

    let p = power.samples[0].total_interference_db.unwrap();
    let d = decibel.samples[0].total_interference_db.unwrap();
    // Contributions are far below 0 dB, so the dB sum is much lower.
    assert!(d < p);
    assert_eq!(decibel.summation, Summation::Decibel);
}

#[test]
fn shipped_catalog_loads_and_evaluates() {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data");
    let mut loader = CatalogLoader::new(CatalogPaths {
        stations: root.join("earth_stations.json"),
        satellites: root.join("satellites.json"),
        antennas: root.join("antennas.json"),
    });
    let catalog = loader.load().unwrap();
    assert!(loader.rejected().is_empty());
    assert_eq!(catalog.stations.len(), 2);
    assert_eq!(catalog.satellites.len(), 4);

    let station = catalog.station("ES_EQUATOR").unwrap();
    let result = compute_ci(
        station,
        catalog.satellite("GSO_A").unwrap(),
        catalog.satellite("GSO_B").unwrap(),
        &catalog.antennas,
    )
    .unwrap();
    assert_eq!(result.c_over_i_db, result.c_dbw - result.i_dbw);
    // ANT_TABLE carries a pattern file, so boresight gain is the table value.
    assert_eq!(result.g_rx_on_axis_dbi, 45.0);

    let params =
        SimulationParams::new(analysis_start(), Duration::minutes(1), Duration::hours(1));
    let series =
        simulate_interference(&catalog.satellites, &catalog.stations, &params, None).unwrap();
    assert_eq!(series.samples.len(), 60);
    assert_eq!(series.skipped_pairs, 0);
    assert!(series.samples.iter().all(|s| s.contributing_pairs == 4));
    assert!(series
        .samples
        .windows(2)
        .all(|w| w[0].timestamp < w[1].timestamp));
}
