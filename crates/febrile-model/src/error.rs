use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ModelError>;
