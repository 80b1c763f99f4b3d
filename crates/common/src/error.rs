//! Error types for Hermes.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HermesError {
    #[error("Discovery error: {0}")]
    Discovery(String),

    #[error("Routing error: {0}")]
    Routing(String),

    #[error("Dispatch error: {0}")]
    Dispatch(String),

    #[error("Summarization error: {0}")]
    Summarization(String),

    #[error("Completion error: {0}")]
    Completion(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HermesError>;
