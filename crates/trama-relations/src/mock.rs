//! Mock generation backend for deterministic testing.
//!
//! Queued responses are returned in order, falling back to a default once
//! the queue drains. Failure injection turns every call into an error. All
//! calls are logged for assertion.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use trama_core::{Error, GenerationBackend, Result};

/// One recorded generation call.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub system: String,
    pub prompt: String,
}

/// Deterministic generation backend for tests.
#[derive(Clone)]
pub struct MockBackend {
    responses: Arc<Mutex<VecDeque<String>>>,
    default_response: String,
    failure: Option<String>,
    calls: Arc<Mutex<Vec<MockCall>>>,
}

impl MockBackend {
    /// Create a mock that answers `{"edges": []}` by default.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            default_response: r#"{"edges": []}"#.to_string(),
            failure: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a response; queued responses are consumed in order.
    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.responses
            .lock()
            .expect("mock queue poisoned")
            .push_back(response.into());
        self
    }

    /// Set the response used once the queue is empty.
    pub fn with_default_response(mut self, response: impl Into<String>) -> Self {
        self.default_response = response.into();
        self
    }

    /// Make every call fail with an inference error.
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// All calls recorded so far.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().expect("mock call log poisoned").clone()
    }

    fn respond(&self, system: &str, prompt: &str) -> Result<String> {
        self.calls
            .lock()
            .expect("mock call log poisoned")
            .push(MockCall {
                system: system.to_string(),
                prompt: prompt.to_string(),
            });
        if let Some(message) = &self.failure {
            return Err(Error::Inference(message.clone()));
        }
        let queued = self
            .responses
            .lock()
            .expect("mock queue poisoned")
            .pop_front();
        Ok(queued.unwrap_or_else(|| self.default_response.clone()))
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationBackend for MockBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.respond("", prompt)
    }

    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        self.respond(system, prompt)
    }

    async fn generate_json(&self, system: &str, prompt: &str) -> Result<String> {
        self.respond(system, prompt)
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}
