//! Error types for the estimation engine

use thiserror::Error;

/// Errors raised by the engine.
///
/// Everything here is detected before sampling starts, except `Cancelled`,
/// which is only produced between batches.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    #[error("Simulation cancelled after {completed_batches} of {total_batches} batches")]
    Cancelled {
        completed_batches: usize,
        total_batches: usize,
    },
}

pub type Result<T> = std::result::Result<T, EngineError>;
