use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid config value for {key}: {reason}")]
    InvalidConfig { key: &'static str, reason: String },
}
