use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReimburseError {
    #[error("Invalid input: {field} {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("Model unavailable at {path}: {reason}")]
    ModelUnavailable { path: String, reason: String },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type ReimburseResult<T> = Result<T, ReimburseError>;
