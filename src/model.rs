//! # Language Model Client Module
//!
//! This module defines the text-generation capability the rest of the crate
//! depends on, and a rig-backed client that provides it with built-in rate
//! limiting and per-call timeouts.
//!
//! ## Key Components
//!
//! - `GenerationRequest`: system role, user prompt, temperature and output cap
//! - `LanguageModel`: the `generate(request) -> text` capability
//! - `Client`: a rate-limited wrapper around any rig `CompletionModel`
//! - `MockLanguageModel`: a scripted model for tests
//!
//! ## Features
//!
//! - OpenAI and Gemini providers via the `rig` framework
//! - Environment variable configuration for API keys
//! - Governor quotas to avoid exhausting provider limits
//! - Instrumentation with tracing spans for monitoring

use std::future::Future;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use rig::completion::{AssistantContent, CompletionModel};
use rig::providers::{gemini, openai};
use tracing::{debug, debug_span, info_span, Instrument};

mod error;
pub mod mock_model;

pub use error::GenError;
pub use mock_model::MockLanguageModel;

use crate::error::Error;

/// Default model used with the OpenAI provider
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";

/// Default model used with the Gemini provider
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Default upper bound on a single generation call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// A single request to the language model
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Instruction describing the role the model should play
    pub system_role: String,

    /// The prompt text
    pub user_prompt: String,

    /// Sampling temperature
    pub temperature: f64,

    /// Optional cap on generated tokens
    pub max_output_tokens: Option<u64>,
}

impl GenerationRequest {
    pub fn new(system_role: impl Into<String>, user_prompt: impl Into<String>) -> Self {
        Self {
            system_role: system_role.into(),
            user_prompt: user_prompt.into(),
            temperature: 0.7,
            max_output_tokens: None,
        }
    }

    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn max_output_tokens(mut self, max_output_tokens: u64) -> Self {
        self.max_output_tokens = Some(max_output_tokens);
        self
    }
}

/// Text generation capability backed by a language model
pub trait LanguageModel: Send + Sync {
    /// Generate text for the request, or fail with a human-readable message
    fn generate(
        &self,
        request: GenerationRequest,
    ) -> impl Future<Output = Result<String, GenError>> + Send;
}

/// Rate-limited language model client over a rig completion model
#[derive(Clone)]
pub struct Client<C>
where
    C: CompletionModel,
{
    completion_model: C,
    limiter: Arc<DefaultDirectRateLimiter>,
    timeout: Duration,
}

impl Client<openai::CompletionModel> {
    /// Build an OpenAI client from `OPENAI_API_KEY`
    pub fn new_openai_from_env(model: Option<&str>) -> Result<Self, Error> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            Error::Config("OPENAI_API_KEY environment variable must be set".to_string())
        })?;
        let openai_client = openai::Client::new(&api_key);
        Ok(Self::new_openai(
            openai_client,
            model.unwrap_or(DEFAULT_OPENAI_MODEL),
        ))
    }

    pub fn new_openai(openai_client: openai::Client, model: &str) -> Self {
        Self::new(openai_client.completion_model(model), 500)
    }
}

impl Client<gemini::completion::CompletionModel> {
    /// Build a Gemini client from `GEMINI_API_KEY`
    pub fn new_gemini_from_env(model: Option<&str>) -> Result<Self, Error> {
        let api_key = std::env::var("GEMINI_API_KEY").map_err(|_| {
            Error::Config("GEMINI_API_KEY environment variable must be set".to_string())
        })?;
        let gemini_client = gemini::Client::new(&api_key);
        Ok(Self::new_gemini(
            gemini_client,
            model.unwrap_or(DEFAULT_GEMINI_MODEL),
        ))
    }

    pub fn new_gemini(gemini_client: gemini::Client, model: &str) -> Self {
        Self::new(gemini_client.completion_model(model), 2000)
    }
}

impl<C> Client<C>
where
    C: CompletionModel,
{
    /// Wrap a completion model with a per-minute request quota
    pub fn new(completion_model: C, requests_per_minute: u32) -> Self {
        let quota = Quota::per_minute(NonZeroU32::new(requests_per_minute).unwrap_or(NonZeroU32::MIN));
        Self {
            completion_model,
            limiter: Arc::new(RateLimiter::direct(quota)),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the per-call timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl<C> LanguageModel for Client<C>
where
    C: CompletionModel,
{
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenError> {
        self.limiter
            .until_ready()
            .instrument(debug_span!("limiter"))
            .await;

        let mut builder = self
            .completion_model
            .completion_request(request.user_prompt)
            .preamble(request.system_role)
            .temperature(request.temperature);
        if let Some(max_tokens) = request.max_output_tokens {
            builder = builder.max_tokens(max_tokens);
        }

        let response = tokio::time::timeout(self.timeout, builder.send())
            .instrument(info_span!("completion"))
            .await
            .map_err(|_| GenError::Timeout(self.timeout))??;

        let text = response
            .choice
            .iter()
            .map(|c| match c {
                AssistantContent::Text(t) => t.text.clone(),
                _ => "".to_string(),
            })
            .collect::<Vec<String>>()
            .join("\n");

        if text.trim().is_empty() {
            return Err(GenError::EmptyResponse);
        }
        debug!("Generated {} characters", text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_request_builder() {
        let request = GenerationRequest::new("role", "prompt")
            .temperature(0.2)
            .max_output_tokens(128);

        assert_eq!(request.system_role, "role");
        assert_eq!(request.user_prompt, "prompt");
        assert_eq!(request.temperature, 0.2);
        assert_eq!(request.max_output_tokens, Some(128));
    }

    #[test]
    fn test_generation_request_defaults() {
        let request = GenerationRequest::new("role", "prompt");
        assert_eq!(request.temperature, 0.7);
        assert!(request.max_output_tokens.is_none());
    }
}
