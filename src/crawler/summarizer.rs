//! Per-page summarization backed by the language model

use tracing::{debug, instrument, trace, warn};

use crate::crawler::CrawlerConfig;
use crate::model::{GenerationRequest, LanguageModel};

const SUMMARY_ROLE: &str = "You condense company web pages into short factual notes.";

const SUMMARY_INSTRUCTION: &str = "Extract the key points from the following web page text: \
what the company does, its products, customers, market, differentiators, and any recent news. \
Ignore navigation, boilerplate, legal text, and repetition. Answer in a few concise sentences.";

/// Compresses extracted page text into a short digest
#[derive(Debug, Clone)]
pub struct Summarizer<M> {
    model: M,
    max_input_chars: usize,
    max_output_tokens: u64,
    temperature: f64,
}

impl<M> Summarizer<M>
where
    M: LanguageModel,
{
    pub fn new(model: M, config: &CrawlerConfig) -> Self {
        Self {
            model,
            max_input_chars: config.max_summary_input_chars,
            max_output_tokens: config.summary_max_tokens,
            temperature: config.summary_temperature,
        }
    }

    /// Summarize a page's text.
    ///
    /// Returns an empty string when there is nothing to summarize or the
    /// model fails; a failed summary never aborts a crawl.
    #[instrument(skip_all, fields(chars = text.len()))]
    pub async fn summarize(&self, text: &str) -> String {
        let text = text.trim();
        if text.is_empty() {
            trace!("Nothing to summarize");
            return String::new();
        }

        let input = truncate_chars(text, self.max_input_chars);
        let request = GenerationRequest::new(
            SUMMARY_ROLE,
            format!("{}\n\n{}", SUMMARY_INSTRUCTION, input),
        )
        .temperature(self.temperature)
        .max_output_tokens(self.max_output_tokens);

        match self.model.generate(request).await {
            Ok(summary) => {
                debug!("Generated summary of length {}", summary.len());
                summary.trim().to_string()
            }
            Err(e) => {
                warn!("Summarization failed, page contributes nothing: {}", e);
                String::new()
            }
        }
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GenError, MockLanguageModel};

    fn summarizer(model: MockLanguageModel) -> Summarizer<MockLanguageModel> {
        let config = CrawlerConfig::builder()
            .max_summary_input_chars(10)
            .summary_max_tokens(64)
            .summary_temperature(0.1)
            .build();
        Summarizer::new(model, &config)
    }

    #[tokio::test]
    async fn test_summarize_builds_bounded_request() {
        let model = MockLanguageModel::new();
        model.push_text("  Acme builds robots.  ").await;

        let summary = summarizer(model.clone())
            .summarize("Acme Robotics builds warehouse robots")
            .await;

        assert_eq!(summary, "Acme builds robots.");
        let requests = model.requests().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].max_output_tokens, Some(64));
        assert_eq!(requests[0].temperature, 0.1);
        assert!(requests[0].user_prompt.ends_with("Acme Robot"));
        assert!(requests[0].user_prompt.contains("Ignore navigation"));
    }

    #[tokio::test]
    async fn test_failure_yields_empty_summary() {
        let model = MockLanguageModel::new();
        model
            .push_error(GenError::Completion("rate limited".to_string()))
            .await;

        let summary = summarizer(model).summarize("Some page text").await;
        assert_eq!(summary, "");
    }

    #[tokio::test]
    async fn test_empty_text_skips_model() {
        let model = MockLanguageModel::new();
        let summary = summarizer(model.clone()).summarize("   ").await;

        assert_eq!(summary, "");
        assert_eq!(model.call_count().await, 0);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo wörld", 7), "héllo w");
        assert_eq!(truncate_chars("short", 100), "short");
    }
}
