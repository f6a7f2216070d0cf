//! Error types for history persistence

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Invalid history entry {id}: {reason}")]
    InvalidEntry { id: String, reason: String },
}
