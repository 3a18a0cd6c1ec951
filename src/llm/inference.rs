//! Text generation seam and the OpenAI-compatible chat client

use crate::config::LlmConfig;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Generation service returned empty content")]
    EmptyContent,
}

/// Configuration for a single generation call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self::from(&LlmConfig::default())
    }
}

impl From<&LlmConfig> for InferenceConfig {
    fn from(config: &LlmConfig) -> Self {
        Self {
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

/// Result of a generation call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceResult {
    pub text: String,
    pub model: String,
    pub inference_time_ms: u64,
}

/// Anything that turns a system instruction plus a prompt into free text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, system: &str, prompt: &str) -> Result<InferenceResult, GenerationError>;

    /// Upper bound the caller should wait for `generate`.
    fn timeout(&self) -> Duration;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Chat completions client. One request per call, no retries.
#[derive(Clone)]
pub struct OpenAiEngine {
    client: Client,
    api_key: String,
    base_url: String,
    config: InferenceConfig,
}

impl OpenAiEngine {
    pub fn new(api_key: String, base_url: String, config: InferenceConfig) -> Result<Self, GenerationError> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            config,
        })
    }

    /// Build an engine when the configuration carries a credential.
    pub fn from_config(config: &LlmConfig) -> Result<Option<Self>, GenerationError> {
        match &config.api_key {
            Some(api_key) => Ok(Some(Self::new(
                api_key.clone(),
                config.base_url.clone(),
                InferenceConfig::from(config),
            )?)),
            None => Ok(None),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl TextGenerator for OpenAiEngine {
    async fn generate(&self, system: &str, prompt: &str) -> Result<InferenceResult, GenerationError> {
        let start = Instant::now();
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage { role: "system", content: system },
                ChatMessage { role: "user", content: prompt },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let chat: ChatResponse = response.json().await?;
        let text = chat
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or(GenerationError::EmptyContent)?;

        let elapsed = start.elapsed();
        debug!("Generation with {} took {}ms", self.config.model, elapsed.as_millis());

        Ok(InferenceResult {
            text,
            model: self.config.model.clone(),
            inference_time_ms: elapsed.as_millis() as u64,
        })
    }

    fn timeout(&self) -> Duration {
        self.config.timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_engine_without_credential() {
        let config = LlmConfig::default();
        assert!(OpenAiEngine::from_config(&config).unwrap().is_none());
    }

    #[test]
    fn test_engine_uses_configured_endpoint_and_timeout() {
        let config = LlmConfig {
            api_key: Some("sk-test".to_string()),
            base_url: "http://localhost:8080/v1/".to_string(),
            timeout_secs: 5,
            ..Default::default()
        };

        let engine = OpenAiEngine::from_config(&config).unwrap().unwrap();
        assert_eq!(engine.endpoint(), "http://localhost:8080/v1/chat/completions");
        assert_eq!(engine.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_chat_request_shape() {
        let request = ChatRequest {
            model: "gpt-3.5-turbo",
            messages: vec![
                ChatMessage { role: "system", content: "sys" },
                ChatMessage { role: "user", content: "hi" },
            ],
            temperature: 0.5,
            max_tokens: 2000,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "gpt-3.5-turbo");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "hi");
        assert_eq!(value["max_tokens"], 2000);
    }

    #[test]
    fn test_chat_response_parsing() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"{\"a\":1}"}}]}"#;
        let chat: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(chat.choices[0].message.content.as_deref(), Some("{\"a\":1}"));
    }
}
