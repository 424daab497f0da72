//! Error types for the refinement module

use crate::error::Error as CrateError;
use std::io;
use thiserror::Error;

/// Error type for edit log persistence
#[derive(Debug, Error)]
pub enum EditLogError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EditLogError {
    /// The file exists but its contents can't be read back as a log
    pub fn is_corrupt(&self) -> bool {
        match self {
            EditLogError::Json(_) => true,
            EditLogError::Io(e) => e.kind() == io::ErrorKind::InvalidData,
        }
    }
}

impl From<EditLogError> for CrateError {
    fn from(err: EditLogError) -> Self {
        match err {
            EditLogError::Io(e) => CrateError::Io(e),
            EditLogError::Json(e) => CrateError::EditLog(e.to_string()),
        }
    }
}
