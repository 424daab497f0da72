//! # Mock Language Model for Testing
//!
//! Provides a `MockLanguageModel` that implements the `LanguageModel` trait
//! for use in tests. Responses can be queued in order, computed by a responder
//! closure, or fall back to a fixed default, and every request is recorded so
//! tests can inspect the prompts the crate builds.

use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::{GenError, GenerationRequest, LanguageModel};

type Responder = dyn Fn(&GenerationRequest) -> Result<String, GenError> + Send + Sync;

/// A mock language model for testing purposes.
#[derive(Clone)]
pub struct MockLanguageModel {
    /// Queued responses, consumed front to back.
    queue: Arc<Mutex<VecDeque<Result<String, GenError>>>>,
    /// Used once the queue is empty.
    responder: Option<Arc<Responder>>,
    /// Every request seen, in call order.
    requests: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl MockLanguageModel {
    /// Creates a mock that answers with an empty success until told otherwise.
    pub fn new() -> Self {
        Self {
            queue: Arc::new(Mutex::new(VecDeque::new())),
            responder: None,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Creates a mock that computes each answer from the request.
    pub fn with_responder<F>(responder: F) -> Self
    where
        F: Fn(&GenerationRequest) -> Result<String, GenError> + Send + Sync + 'static,
    {
        Self {
            responder: Some(Arc::new(responder)),
            ..Self::new()
        }
    }

    /// Queue a text response.
    pub async fn push_text(&self, text: &str) {
        self.queue.lock().await.push_back(Ok(text.to_string()));
    }

    /// Queue a failure.
    pub async fn push_error(&self, error: GenError) {
        self.queue.lock().await.push_back(Err(error));
    }

    /// All requests received so far.
    pub async fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().await.clone()
    }

    /// Number of requests received so far.
    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

impl Default for MockLanguageModel {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageModel for MockLanguageModel {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenError> {
        self.requests.lock().await.push(request.clone());

        let queued = self.queue.lock().await.pop_front();
        match (queued, &self.responder) {
            (Some(result), _) => result,
            (None, Some(responder)) => responder(&request),
            (None, None) => Ok(String::new()),
        }
    }
}
