use thiserror::Error;

#[derive(Debug, Error)]
pub enum DuebellError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid mapping: {0}")]
    InvalidMapping(#[from] serde_json::Error),
}
