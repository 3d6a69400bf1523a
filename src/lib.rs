pub mod antenna;
pub mod catalog;
pub mod compliance;
pub mod config;
pub mod geometry;
pub mod link_budget;
pub mod ngso;
pub mod web;

pub use compliance::check_threshold;
pub use geometry::keplerian_to_eci;
pub use link_budget::compute_ci;
pub use ngso::simulate_interference;
