use thiserror::Error;

#[derive(Debug, Error)]
pub enum PatternError {
    #[error("pattern file read error: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("pattern file parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed pattern table: {0}")]
    Malformed(String),
}
