pub mod constants;
mod error;
mod frames;
mod kepler;
mod vector;

pub use error::GeometryError;
pub use frames::{
    ecef_to_eci, eci_to_ecef, geodetic_to_cartesian, gmst_rad, gso_position, julian_date,
};
pub use kepler::{keplerian_to_eci, KeplerSolver, KeplerianElements, OrbitalPosition};
pub use vector::{slant_range, vector_angle_deg};
