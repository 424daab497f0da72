//! Bounded depth-first traversal of a company website

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::crawler::error::FetchError;
use crate::crawler::fetch::PageFetcher;
use crate::crawler::normalizer::{normalize, NormalizedUrl};
use crate::crawler::summarizer::Summarizer;
use crate::crawler::{CompanyInfo, CrawlerConfig};
use crate::model::LanguageModel;

/// Cooperative kill switch shared by every branch of one crawl
#[derive(Debug, Clone, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trip(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_tripped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Outcome of one crawl invocation
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Aggregated page summaries in visitation order
    pub company_info: CompanyInfo,

    /// Pages successfully fetched, in the order they were visited
    pub visited: Vec<NormalizedUrl>,

    /// Fetch attempts, successful or not
    pub fetch_attempts: usize,

    /// Whether depth exhaustion halted the crawl
    pub stopped_early: bool,
}

/// State owned by a single crawl invocation
#[derive(Debug, Default)]
struct CrawlState {
    visited: HashSet<NormalizedUrl>,
    visit_order: Vec<NormalizedUrl>,
    summaries: Vec<String>,
    stop: StopFlag,
    fetch_attempts: usize,
}

/// A page whose outbound links are still being enumerated
#[derive(Debug)]
struct Frame {
    page: NormalizedUrl,
    links: Vec<NormalizedUrl>,
    cursor: usize,
    followed: usize,
    child_depth: u32,
}

impl Frame {
    /// Advance to the next same-host, unvisited, non-excluded link
    fn next_candidate(&mut self, state: &CrawlState, excluded: &[String]) -> Option<NormalizedUrl> {
        while let Some(link) = self.links.get(self.cursor) {
            self.cursor += 1;
            if !self.page.same_host(link) {
                continue;
            }
            if state.visited.contains(link) || link.contains_any(excluded) {
                continue;
            }
            return Some(link.clone());
        }
        None
    }
}

/// Crawls same-site links from a seed and aggregates per-page summaries
pub struct Crawler<M> {
    fetcher: PageFetcher,
    summarizer: Summarizer<M>,
    config: CrawlerConfig,
}

impl<M> Crawler<M>
where
    M: LanguageModel,
{
    pub fn new(model: M, config: CrawlerConfig) -> Result<Self, FetchError> {
        let fetcher = PageFetcher::new(&config)?;
        Ok(Self::with_fetcher(fetcher, model, config))
    }

    pub fn with_fetcher(fetcher: PageFetcher, model: M, config: CrawlerConfig) -> Self {
        Self {
            fetcher,
            summarizer: Summarizer::new(model, &config),
            config,
        }
    }

    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    /// Crawl from `seed` and return the aggregated company information
    pub async fn crawl(&self, seed: &str) -> CompanyInfo {
        self.crawl_with_report(seed).await.company_info
    }

    /// Crawl from `seed`, returning the aggregate along with crawl statistics
    ///
    /// Visited set and stop flag are fresh for every call.
    #[instrument(skip(self))]
    pub async fn crawl_with_report(&self, seed: &str) -> CrawlReport {
        let mut state = CrawlState::default();
        let seed = normalize(seed);
        info!("Starting crawl for {}", seed);
        debug!("Crawler config: {:?}", self.config);

        let mut stack = Vec::new();
        if let Some(frame) = self.visit(&mut state, seed, self.config.max_depth).await {
            stack.push(frame);
        }

        while let Some(frame) = stack.last_mut() {
            if state.stop.is_tripped() {
                break;
            }
            if frame.followed >= self.config.max_links_per_page {
                stack.pop();
                continue;
            }
            let Some(next) = frame.next_candidate(&state, &self.config.excluded_keywords) else {
                stack.pop();
                continue;
            };
            frame.followed += 1;
            let depth = frame.child_depth;

            if let Some(child) = self.visit(&mut state, next, depth).await {
                stack.push(child);
            }
        }

        let stopped_early = state.stop.is_tripped();
        info!(
            "Crawl finished: {} pages visited, stopped early: {}",
            state.visit_order.len(),
            stopped_early
        );

        CrawlReport {
            company_info: CompanyInfo::from_summaries(state.summaries),
            visited: state.visit_order,
            fetch_attempts: state.fetch_attempts,
            stopped_early,
        }
    }

    /// Enter one page with `depth` hops remaining.
    ///
    /// Returns the frame for its links, or `None` when the page was skipped,
    /// ended the crawl, or could not be fetched.
    async fn visit(&self, state: &mut CrawlState, url: NormalizedUrl, depth: u32) -> Option<Frame> {
        if state.stop.is_tripped()
            || state.visited.contains(&url)
            || url.contains_any(&self.config.excluded_keywords)
        {
            debug!("Skipping {}", url);
            return None;
        }
        if depth == 0 {
            debug!("Depth exhausted at {}, stopping crawl", url);
            state.stop.trip();
            return None;
        }

        if state.fetch_attempts > 0 && !self.config.delay().is_zero() {
            tokio::time::sleep(self.config.delay()).await;
        }
        state.fetch_attempts += 1;

        info!("Visiting: {}", url);
        let page = match self.fetcher.fetch_and_extract(&url).await {
            Ok(page) => page,
            Err(e) if e.is_timeout() => {
                warn!(
                    "Timed out fetching {} after {:?}",
                    url,
                    self.config.request_timeout()
                );
                return None;
            }
            Err(e) => {
                warn!("Failed to fetch {}: {}", url, e);
                return None;
            }
        };

        let summary = self.summarizer.summarize(&page.text).await;
        state.summaries.push(summary);
        state.visited.insert(url.clone());
        state.visit_order.push(url.clone());

        Some(Frame {
            page: url,
            links: page.links,
            cursor: 0,
            followed: 0,
            child_depth: depth - 1,
        })
    }
}
