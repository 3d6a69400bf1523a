mod aggregator;
mod error;
mod types;

pub use aggregator::{
    ngso_path_loss_db, pair_contribution_db, simulate_interference, CancelToken,
    SimulationParams, FSL_CONSTANT_DB,
};
pub use error::{PairError, SimulationError};
pub use types::{InterferenceSample, InterferenceSeries, Summation};
