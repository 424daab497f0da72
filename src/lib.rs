//! # Outreach - Website-Informed Email Drafting for Rust
//!
//! This crate crawls a company's public website, condenses what it finds into a
//! bounded summary, and drafts personalized outreach emails with a language
//! model. Edits the user makes to generated drafts are logged and fed back into
//! later prompts as a style signal.
//!
//! ## Features
//!
//! - Bounded same-site crawling with depth, breadth, and keyword limits
//! - Content-vs-boilerplate reduction to headings, paragraphs and list items
//! - Per-page summaries that degrade gracefully when the model fails
//! - Edit history recorded as unified diffs and folded into prompts
//! - Rate-limited OpenAI and Gemini clients through `rig`
//! - Async API with Tokio
//!
//! ## Example
//!
//! ```rust,no_run
//! use outreach::crawler::{Crawler, CrawlerConfig};
//! use outreach::drafting::{DraftingConfig, EmailDrafter};
//! use outreach::model::Client;
//! use outreach::refinement::RefinementEngine;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new_openai_from_env(None)?;
//!
//!     let crawler = Crawler::new(client.clone(), CrawlerConfig::default())?;
//!     let company_info = crawler.crawl("https://example.com").await;
//!
//!     let drafter = EmailDrafter::new(client, RefinementEngine::default(), DraftingConfig::default());
//!     println!("{}", drafter.draft_or_message(&company_info).await);
//!     Ok(())
//! }
//! ```

mod error;
pub mod model;

pub mod crawler;
pub mod drafting;
pub mod refinement;

pub use error::Error;

/// Re-export of commonly used types
pub mod prelude {
    pub use crate::crawler::{CompanyInfo, Crawler, CrawlerConfig};
    pub use crate::drafting::{DraftingConfig, EmailDrafter, EmailGenerator};
    pub use crate::error::Error;
    pub use crate::error::Result;
    pub use crate::model::{GenError, GenerationRequest, LanguageModel};
    pub use crate::refinement::{EditLog, EditRecord, RefinementEngine};
}
