use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("registry read error: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("invalid registry {file}: {message}")]
    InvalidRegistry { file: String, message: String },
    #[error("unknown station: {0}")]
    UnknownStation(String),
    #[error("unknown satellite: {0}")]
    UnknownSatellite(String),
}
