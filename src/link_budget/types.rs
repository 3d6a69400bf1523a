use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Every intermediate quantity of one carrier/interference evaluation.
/// `A` is the serving link, `B` the interfering one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LinkBudgetResult {
    pub angle_deg: f64,
    #[serde(rename = "distance_m_A")]
    pub distance_serving_m: f64,
    #[serde(rename = "distance_m_B")]
    pub distance_interferer_m: f64,
    #[serde(rename = "FSL_A_dB")]
    pub fsl_serving_db: f64,
    #[serde(rename = "FSL_B_dB")]
    pub fsl_interferer_db: f64,
    #[serde(rename = "EIRP_A_dBW")]
    pub eirp_serving_dbw: f64,
    #[serde(rename = "EIRP_B_dBW")]
    pub eirp_interferer_dbw: f64,
    #[serde(rename = "G_rx_on_main_dBi")]
    pub g_rx_on_axis_dbi: f64,
    #[serde(rename = "G_rx_off_interf_dBi")]
    pub g_rx_off_axis_dbi: f64,
    #[serde(rename = "C_dBW")]
    pub c_dbw: f64,
    #[serde(rename = "I_dBW")]
    pub i_dbw: f64,
    #[serde(rename = "C_over_I_dB")]
    pub c_over_i_db: f64,
    #[serde(rename = "N_dBW")]
    pub n_dbw: f64,
    #[serde(rename = "I_over_N_dB")]
    pub i_over_n_db: f64,
}
