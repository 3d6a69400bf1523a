mod calculator;
mod error;
mod types;

pub use calculator::{
    compute_ci, compute_ci_at, free_space_loss_db, noise_power_dbw, transmit_eirp_dbw,
    DEFAULT_FREQUENCY_HZ,
};
pub use error::LinkBudgetError;
pub use types::LinkBudgetResult;
