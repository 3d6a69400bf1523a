use chrono::{DateTime, Utc};
use nalgebra::Vector3;
use std::f64::consts::TAU;

use super::constants::{
    EARTH_RADIUS_M, GEO_RADIUS_M, J2000_JD, SECONDS_PER_DAY, UNIX_EPOCH_JD,
};

/// Geodetic coordinates to Earth-fixed Cartesian (m) on a spherical Earth.
pub fn geodetic_to_cartesian(lat_deg: f64, lon_deg: f64, alt_m: f64) -> Vector3<f64> {
    spherical_to_cartesian(lat_deg, lon_deg, EARTH_RADIUS_M + alt_m)
}

/// Earth-fixed position (m) of a GSO satellite at the given sub-satellite
/// longitude. A non-zero inclination is applied as a latitude offset.
pub fn gso_position(lon_deg: f64, incl_deg: f64) -> Vector3<f64> {
    spherical_to_cartesian(incl_deg, lon_deg, GEO_RADIUS_M)
}

fn spherical_to_cartesian(lat_deg: f64, lon_deg: f64, radius: f64) -> Vector3<f64> {
    let (sin_lat, cos_lat) = lat_deg.to_radians().sin_cos();
    let (sin_lon, cos_lon) = lon_deg.to_radians().sin_cos();
    Vector3::new(
        radius * cos_lat * cos_lon,
        radius * cos_lat * sin_lon,
        radius * sin_lat,
    )
}

pub fn julian_date(at: DateTime<Utc>) -> f64 {
    let seconds = at.timestamp() as f64 + f64::from(at.timestamp_subsec_nanos()) * 1e-9;
    UNIX_EPOCH_JD + seconds / SECONDS_PER_DAY
}

/// Greenwich mean sidereal time in radians (IAU-1982 polynomial).
pub fn gmst_rad(at: DateTime<Utc>) -> f64 {
    let jd = julian_date(at);
    let t = (jd - J2000_JD) / 36_525.0;
    let g = 67_310.548_41 + (8_640_184.812_866 + (0.093_104 - 6.2e-6 * t) * t) * t;
    (jd.fract() + g / SECONDS_PER_DAY).rem_euclid(1.0) * TAU
}

pub fn ecef_to_eci(pos: &Vector3<f64>, gmst: f64) -> Vector3<f64> {
    let (sin_g, cos_g) = gmst.sin_cos();
    Vector3::new(
        pos.x * cos_g - pos.y * sin_g,
        pos.x * sin_g + pos.y * cos_g,
        pos.z,
    )
}

pub fn eci_to_ecef(pos: &Vector3<f64>, gmst: f64) -> Vector3<f64> {
    let (sin_g, cos_g) = gmst.sin_cos();
    Vector3::new(
        pos.x * cos_g + pos.y * sin_g,
        -pos.x * sin_g + pos.y * cos_g,
        pos.z,
    )
}
