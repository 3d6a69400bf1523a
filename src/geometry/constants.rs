//! Physical constants shared by the geometry and link-budget code.
//!
//! Earth is modelled as a sphere of radius [`EARTH_RADIUS_M`]; this is not
//! WGS-84 exact and is not meant to be.

/// Speed of light (m/s).
pub const SPEED_OF_LIGHT_M_S: f64 = 299_792_458.0;

/// Boltzmann constant (J/K).
pub const BOLTZMANN_J_K: f64 = 1.380_648_52e-23;

/// Equatorial Earth radius used as the spherical radius (m).
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Geostationary orbit radius from the geocenter (m).
pub const GEO_RADIUS_M: f64 = 42_164_000.0;

/// Earth gravitational parameter (km^3/s^2).
pub const MU_EARTH_KM3_S2: f64 = 398_600.441_8;

/// Julian date of the J2000.0 epoch.
pub const J2000_JD: f64 = 2_451_545.0;

/// Julian date of the Unix epoch.
pub const UNIX_EPOCH_JD: f64 = 2_440_587.5;

pub const SECONDS_PER_DAY: f64 = 86_400.0;
