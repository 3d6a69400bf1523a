mod error;
mod gain;
mod pattern;
mod types;

pub use error::PatternError;
pub use gain::{
    parabolic_gain_dbi, pattern_gain_dbi, GainModel, DEFAULT_DIAMETER_M, DEFAULT_EFFICIENCY,
    DEGENERATE_GAIN_DBI,
};
pub use pattern::PatternTable;
pub use types::AntennaPattern;
