use serde::Deserialize;
use thiserror::Error;

use crate::catalog::CatalogPaths;
use crate::geometry::KeplerSolver;
use crate::ngso::Summation;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogPaths,
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:5004".to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisConfig {
    /// Frequency reuse in effect for threshold checks.
    #[serde(default)]
    pub reuse: bool,
    #[serde(default)]
    pub summation: Summation,
    #[serde(default)]
    pub kepler: KeplerSolver,
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }
}
