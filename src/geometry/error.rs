use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("invalid orbital elements: {0}")]
    InvalidElements(String),
}
