//! Error types for the model module

use std::time::Duration;

use crate::error::Error as CrateError;
use rig::completion::CompletionError;
use thiserror::Error;

/// Error type for language model calls
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GenError {
    /// The provider rejected or failed the request (auth, rate limit, network)
    #[error("{0}")]
    Completion(String),

    /// The request did not finish within the configured timeout
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The provider answered without any text
    #[error("model returned an empty response")]
    EmptyResponse,
}

impl From<CompletionError> for GenError {
    fn from(err: CompletionError) -> Self {
        Self::Completion(err.to_string())
    }
}

impl From<GenError> for CrateError {
    fn from(err: GenError) -> Self {
        CrateError::Generation(err.to_string())
    }
}
