//! # Website Crawler Module
//!
//! This module gathers what a company says about itself on its own website and
//! reduces it to a bounded summary that can be folded into an email prompt.
//!
//! ## Key Components
//!
//! - `normalize` / `NormalizedUrl`: canonical keys for the visited set and same-host checks
//! - `PageFetcher`: one GET per page, reduced to headings, paragraphs and list items
//! - `Summarizer`: per-page digests from the language model
//! - `Crawler`: bounded depth-first traversal that aggregates the digests
//! - `CompanyInfo`: the aggregated result of one crawl
//!
//! ## Crawl Budget
//!
//! - `max_depth` hops from the seed; reaching zero trips a stop flag that halts
//!   every remaining branch of the crawl, not just the current one
//! - `max_links_per_page` outbound links followed from any single page
//! - `excluded_keywords` disqualify URLs outright
//! - a fixed delay between sequential fetches keeps the crawl polite
//!
//! Fetch and summarization failures are logged and the page contributes
//! nothing; a crawl always produces a `CompanyInfo`, possibly empty.

mod config;
mod content_extraction;
mod engine;
mod error;
mod fetch;
mod normalizer;
mod summarizer;

pub use config::{CrawlerConfig, CrawlerConfigBuilder};
pub use content_extraction::{extract_page, ExtractedPage};
pub use engine::{CrawlReport, Crawler, StopFlag};
pub use error::FetchError;
pub use fetch::PageFetcher;
pub use normalizer::{normalize, NormalizedUrl};
pub use summarizer::Summarizer;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Aggregated page summaries for one crawl, in visitation order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyInfo(String);

impl CompanyInfo {
    /// Separator placed between page summaries
    pub const SEPARATOR: &'static str = "\n\n";

    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Join non-empty summaries in the order given
    pub fn from_summaries<I>(summaries: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let parts: Vec<String> = summaries
            .into_iter()
            .filter(|s| !s.trim().is_empty())
            .collect();
        Self(parts.join(Self::SEPARATOR))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for CompanyInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for CompanyInfo {
    fn from(text: String) -> Self {
        Self(text)
    }
}
