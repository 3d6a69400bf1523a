use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::error::CatalogError;
use super::types::{AntennaCatalog, GroundStation, Satellite};
use crate::antenna::AntennaPattern;

/// Locations of the three JSON key-value registries.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatalogPaths {
    pub stations: PathBuf,
    pub satellites: PathBuf,
    pub antennas: PathBuf,
}

impl Default for CatalogPaths {
    fn default() -> Self {
        Self {
            stations: PathBuf::from("data/earth_stations.json"),
            satellites: PathBuf::from("data/satellites.json"),
            antennas: PathBuf::from("data/antennas.json"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub stations: BTreeMap<String, GroundStation>,
    pub satellites: BTreeMap<String, Satellite>,
    pub antennas: AntennaCatalog,
}

impl Catalog {
    pub fn station(&self, id: &str) -> Result<&GroundStation, CatalogError> {
        self.stations
            .get(id)
            .ok_or_else(|| CatalogError::UnknownStation(id.to_string()))
    }

    pub fn satellite(&self, id: &str) -> Result<&Satellite, CatalogError> {
        self.satellites
            .get(id)
            .ok_or_else(|| CatalogError::UnknownSatellite(id.to_string()))
    }
}

/// A record that could not be turned into a typed entry.
#[derive(Debug, Clone)]
pub struct RejectedRecord {
    pub registry: String,
    pub id: String,
    pub reason: String,
}

pub struct CatalogLoader {
    paths: CatalogPaths,
    rejected: Vec<RejectedRecord>,
}

impl CatalogLoader {
    pub fn new(paths: CatalogPaths) -> Self {
        Self {
            paths,
            rejected: Vec::new(),
        }
    }

    /// Load all three registries. Individual malformed records are logged
    /// and skipped; an unreadable or non-object registry file is an error.
    pub fn load(&mut self) -> Result<Catalog, CatalogError> {
        self.rejected.clear();

        let paths = self.paths.clone();
        let stations = self.load_registry::<GroundStation>(&paths.stations)?;
        let satellites = self.load_registry::<Satellite>(&paths.satellites)?;
        let mut antennas = self.load_registry::<AntennaPattern>(&paths.antennas)?;
        let registry = paths.antennas.display().to_string();
        antennas.retain(|id, antenna| match antenna.validate() {
            Ok(()) => true,
            Err(reason) => {
                log::warn!("Skipping record {} in {}: {}", id, registry, reason);
                self.rejected.push(RejectedRecord {
                    registry: registry.clone(),
                    id: id.clone(),
                    reason,
                });
                false
            }
        });

        // Pattern files are stored relative to the antenna registry.
        if let Some(base) = paths.antennas.parent() {
            for antenna in antennas.values_mut() {
                if let Some(file) = antenna.pattern_file.as_mut() {
                    if file.is_relative() {
                        *file = base.join(&*file);
                    }
                }
            }
        }

        log::info!(
            "Catalog loaded: {} stations, {} satellites, {} antennas ({} rejected)",
            stations.len(),
            satellites.len(),
            antennas.len(),
            self.rejected.len()
        );

        Ok(Catalog {
            stations,
            satellites,
            antennas,
        })
    }

    pub fn rejected(&self) -> &[RejectedRecord] {
        &self.rejected
    }

    fn load_registry<T: DeserializeOwned>(
        &mut self,
        path: &Path,
    ) -> Result<BTreeMap<String, T>, CatalogError> {
        let registry = path.display().to_string();
        if !path.exists() {
            log::warn!("Registry {} not found, treating as empty", registry);
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(path)?;
        let raw: BTreeMap<String, serde_json::Value> =
            serde_json::from_str(&content).map_err(|e| CatalogError::InvalidRegistry {
                file: registry.clone(),
                message: e.to_string(),
            })?;

        let mut records = BTreeMap::new();
        for (id, value) in raw {
            match serde_json::from_value::<T>(value) {
                Ok(record) => {
                    records.insert(id, record);
                }
                Err(e) => {
                    log::warn!("Skipping record {} in {}: {}", id, registry, e);
                    self.rejected.push(RejectedRecord {
                        registry: registry.clone(),
                        id,
                        reason: e.to_string(),
                    });
                }
            }
        }
        Ok(records)
    }
}
