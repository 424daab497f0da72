//! # Crawler Configuration Module
//!
//! This module provides the crawl budget and politeness settings for the
//! crawler, using a builder pattern for flexible configuration.
//!
//! ## Key Components
//!
//! - `CrawlerConfig`: depth, breadth, keyword exclusion, delay and timeouts
//! - `CrawlerConfigBuilder`: Builder pattern implementation for easier configuration
//!
//! ## Features
//!
//! - Defaults suitable for polite crawling of a small company site
//! - Keyword exclusion for low-signal sections (blogs, webinars, podcasts)
//! - Bounded input and output for per-page summaries

use std::time::Duration;

/// Configuration for a crawl
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// Remaining hops from the seed; entering a page with zero left stops the crawl
    pub max_depth: u32,

    /// Outbound links followed from any single page
    pub max_links_per_page: usize,

    /// URL substrings that disqualify a page outright
    pub excluded_keywords: Vec<String>,

    /// Delay in milliseconds between sequential fetches
    pub delay_ms: u64,

    /// Timeout in seconds for a single page fetch
    pub request_timeout_secs: u64,

    /// User agent to use for requests
    pub user_agent: String,

    /// Extracted text beyond this many characters is not sent to the summarizer
    pub max_summary_input_chars: usize,

    /// Output token cap for each page summary
    pub summary_max_tokens: u64,

    /// Sampling temperature for page summaries
    pub summary_temperature: f64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 2,
            max_links_per_page: 3,
            excluded_keywords: vec![
                "webinar".to_string(),
                "podcast".to_string(),
                "blog".to_string(),
            ],
            delay_ms: 500,
            request_timeout_secs: 20,
            user_agent: format!("outreach-crawler/{}", env!("CARGO_PKG_VERSION")),
            max_summary_input_chars: 12_000,
            summary_max_tokens: 256,
            summary_temperature: 0.2,
        }
    }
}

/// Builder for CrawlerConfig
#[derive(Debug, Default)]
pub struct CrawlerConfigBuilder {
    config: CrawlerConfig,
}

impl CrawlerConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: CrawlerConfig::default(),
        }
    }

    /// Set the maximum depth to crawl
    pub fn max_depth(mut self, max_depth: u32) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    /// Set how many links are followed from each page
    pub fn max_links_per_page(mut self, max_links_per_page: usize) -> Self {
        self.config.max_links_per_page = max_links_per_page;
        self
    }

    /// Replace the excluded URL keywords
    pub fn excluded_keywords(mut self, excluded_keywords: Vec<String>) -> Self {
        self.config.excluded_keywords = excluded_keywords;
        self
    }

    /// Set the delay in milliseconds between fetches
    pub fn delay_ms(mut self, delay_ms: u64) -> Self {
        self.config.delay_ms = delay_ms;
        self
    }

    /// Set the per-fetch timeout in seconds
    pub fn request_timeout_secs(mut self, request_timeout_secs: u64) -> Self {
        self.config.request_timeout_secs = request_timeout_secs;
        self
    }

    /// Set the user agent to use for requests
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    pub fn max_summary_input_chars(mut self, max_summary_input_chars: usize) -> Self {
        self.config.max_summary_input_chars = max_summary_input_chars;
        self
    }

    pub fn summary_max_tokens(mut self, summary_max_tokens: u64) -> Self {
        self.config.summary_max_tokens = summary_max_tokens;
        self
    }

    pub fn summary_temperature(mut self, summary_temperature: f64) -> Self {
        self.config.summary_temperature = summary_temperature;
        self
    }

    /// Build the configuration
    pub fn build(self) -> CrawlerConfig {
        self.config
    }
}

impl CrawlerConfig {
    /// Create a new builder
    pub fn builder() -> CrawlerConfigBuilder {
        CrawlerConfigBuilder::new()
    }

    /// Get the inter-fetch delay as a Duration
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Get the fetch timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CrawlerConfig::default();
        assert_eq!(config.max_depth, 2);
        assert_eq!(config.max_links_per_page, 3);
        assert_eq!(config.excluded_keywords, vec!["webinar", "podcast", "blog"]);
        assert_eq!(config.delay(), Duration::from_millis(500));
        assert!(config.user_agent.starts_with("outreach-crawler/"));
    }

    #[test]
    fn test_builder_overrides() {
        let config = CrawlerConfig::builder()
            .max_depth(5)
            .max_links_per_page(4)
            .excluded_keywords(vec![])
            .delay_ms(0)
            .request_timeout_secs(3)
            .build();

        assert_eq!(config.max_depth, 5);
        assert_eq!(config.max_links_per_page, 4);
        assert!(config.excluded_keywords.is_empty());
        assert_eq!(config.delay(), Duration::ZERO);
        assert_eq!(config.request_timeout(), Duration::from_secs(3));
    }
}
