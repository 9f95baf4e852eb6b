//! Error types for proofmark

use thiserror::Error;

/// Result type alias for proofmark operations
pub type Result<T> = std::result::Result<T, ProofmarkError>;

/// Highlight engine and viewer error types
#[derive(Error, Debug)]
pub enum ProofmarkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Invalid search pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Search pattern is empty")]
    EmptyPattern,

    #[error("Cannot update tag: {0}")]
    Sink(String),

    #[error("{0}")]
    Message(String),
}
