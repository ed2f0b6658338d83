//! OpenAI-compatible generation backend (feature `openai`).
//!
//! Speaks the chat-completions protocol, so it also covers OpenRouter and
//! other compatible gateways via `OPENAI_BASE`. Construction fails fast with
//! a configuration error when no API key is available; no network call is
//! ever attempted without a credential.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use trama_core::{defaults, Error, GenerationBackend, Result};

/// OpenAI-compatible chat-completions backend.
pub struct OpenAiBackend {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    timeout_secs: u64,
}

impl OpenAiBackend {
    /// Create a backend. Fails with a configuration error when `api_key`
    /// is absent or empty.
    pub fn new(api_key: Option<String>, base_url: String, model: String) -> Result<Self> {
        let api_key = match api_key {
            Some(key) if !key.is_empty() => key,
            _ => {
                return Err(Error::Config(
                    "OPENAI_API_KEY is required for the OpenAI backend".to_string(),
                ))
            }
        };

        let timeout_secs = std::env::var("TRAMA_GEN_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults::GEN_TIMEOUT_SECS);

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        info!("Initializing OpenAI backend: url={}, model={}", base_url, model);

        Ok(Self {
            client,
            base_url,
            api_key,
            model,
            timeout_secs,
        })
    }

    /// Create from environment variables (`OPENAI_API_KEY`, `OPENAI_BASE`,
    /// `OPENAI_GEN_MODEL`).
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").ok();
        let base_url =
            std::env::var("OPENAI_BASE").unwrap_or_else(|_| defaults::OPENAI_URL.to_string());
        let model = std::env::var("OPENAI_GEN_MODEL")
            .unwrap_or_else(|_| defaults::OPENAI_GEN_MODEL.to_string());
        Self::new(api_key, base_url, model)
    }

    /// Create from environment with an explicit model override.
    pub fn from_env_with_model(model: String) -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").ok();
        let base_url =
            std::env::var("OPENAI_BASE").unwrap_or_else(|_| defaults::OPENAI_URL.to_string());
        Self::new(api_key, base_url, model)
    }

    async fn chat(&self, system: &str, prompt: &str, json_mode: bool) -> Result<String> {
        let mut messages = Vec::new();
        if !system.is_empty() {
            messages.push(Message {
                role: "system".to_string(),
                content: system.to_string(),
            });
        }
        messages.push(Message {
            role: "user".to_string(),
            content: prompt.to_string(),
        });

        let request = CompletionRequest {
            model: self.model.clone(),
            messages,
            temperature: defaults::GEN_TEMPERATURE,
            max_tokens: defaults::GEN_NUM_PREDICT,
            response_format: json_mode.then(|| ResponseFormat {
                kind: "json_object".to_string(),
            }),
        };

        debug!(
            model = %self.model,
            prompt_len = prompt.len(),
            json_mode,
            "Starting chat completion"
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .timeout(Duration::from_secs(self.timeout_secs))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Inference(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Inference(format!(
                "OpenAI returned {}: {}",
                status, body
            )));
        }

        let result: CompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::Inference(format!("Failed to parse response: {}", e)))?;

        result
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| Error::Inference("Response contained no choices".to_string()))
    }
}

#[derive(Serialize, Deserialize, Clone)]
struct Message {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Serialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[async_trait]
impl GenerationBackend for OpenAiBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.chat("", prompt, false).await
    }

    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        self.chat(system, prompt, false).await
    }

    async fn generate_json(&self, system: &str, prompt: &str) -> Result<String> {
        self.chat(system, prompt, true).await
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn backend_for(server_uri: String) -> OpenAiBackend {
        OpenAiBackend::new(
            Some("test-key".to_string()),
            server_uri,
            "gpt-4o-mini".to_string(),
        )
        .unwrap()
    }

    #[test]
    fn test_missing_api_key_is_config_error() {
        let err = OpenAiBackend::new(None, "http://x".to_string(), "m".to_string()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err =
            OpenAiBackend::new(Some(String::new()), "http://x".to_string(), "m".to_string())
                .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_request_serialization_with_json_mode() {
        let request = CompletionRequest {
            model: "gpt-4o-mini".to_string(),
            messages: vec![Message {
                role: "user".to_string(),
                content: "hello".to_string(),
            }],
            temperature: 0.0,
            max_tokens: 700,
            response_format: Some(ResponseFormat {
                kind: "json_object".to_string(),
            }),
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"type\":\"json_object\""));
        assert!(json.contains("\"max_tokens\":700"));
    }

    #[tokio::test]
    async fn test_generate_json_happy_path() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "{\"edges\": []}"}}]
            })))
            .mount(&server)
            .await;

        let backend = backend_for(server.uri());
        let response = backend.generate_json("system", "prompt").await.unwrap();
        assert_eq!(response, r#"{"edges": []}"#);
    }

    #[tokio::test]
    async fn test_empty_choices_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"choices": []})),
            )
            .mount(&server)
            .await;

        let backend = backend_for(server.uri());
        let err = backend.generate("prompt").await.unwrap_err();
        assert!(err.to_string().contains("no choices"));
    }
}
