//! Error types for the outreach crate

use thiserror::Error;

/// Result type for outreach operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for outreach operations
#[derive(Debug, Error)]
pub enum Error {
    /// Filesystem error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A page could not be fetched
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// The language model failed to produce text
    #[error("Generation error: {0}")]
    Generation(String),

    /// The edit log could not be written
    #[error("Edit log error: {0}")]
    EditLog(String),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}
