//! Error types for the crawler module

use crate::error::Error as CrateError;
use thiserror::Error;

/// Error type for page fetches
///
/// During a crawl every variant means "this page contributes nothing";
/// `Client` can only occur while building the fetcher.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network failure, including timeouts
    #[error("{url} is unreachable: {source}")]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The server answered with a non-success status
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// A selector or document could not be parsed
    #[error("HTML parsing error: {0}")]
    HtmlParse(String),

    /// The URL could not be parsed
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl FetchError {
    /// Whether the request gave up after the configured timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Unreachable { source, .. } if source.is_timeout())
    }
}

impl From<FetchError> for CrateError {
    fn from(err: FetchError) -> Self {
        CrateError::Fetch(err.to_string())
    }
}
