//! Interference-to-noise protection criterion.
//!
//! Permissible interference is 25% of system noise without frequency reuse
//! and 20% with reuse, after ITU-R S.1323.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::link_budget::LinkBudgetResult;

pub const NO_REUSE_FRACTION: f64 = 0.25;
pub const REUSE_FRACTION: f64 = 0.20;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ComplianceVerdict {
    #[serde(rename = "threshold_pct")]
    pub threshold_fraction: f64,
    #[serde(rename = "threshold_dB")]
    pub threshold_db: f64,
    #[serde(rename = "I_over_N_dB")]
    pub i_over_n_db: f64,
    pub acceptable: bool,
}

pub fn permissible_fraction(reuse: bool) -> f64 {
    if reuse {
        REUSE_FRACTION
    } else {
        NO_REUSE_FRACTION
    }
}

pub fn threshold_db(reuse: bool) -> f64 {
    10.0 * permissible_fraction(reuse).log10()
}

pub fn check_threshold(result: &LinkBudgetResult, reuse: bool) -> ComplianceVerdict {
    check_i_over_n(result.i_over_n_db, reuse)
}

/// Verdict for a bare I/N figure; acceptable when `I/N <= threshold`.
pub fn check_i_over_n(i_over_n_db: f64, reuse: bool) -> ComplianceVerdict {
    let threshold_db = threshold_db(reuse);
    ComplianceVerdict {
        threshold_fraction: permissible_fraction(reuse),
        threshold_db,
        i_over_n_db,
        acceptable: i_over_n_db <= threshold_db,
    }
}
