pub mod error;
pub mod interference;
pub mod orbit;
