//! HTTP client for an Ollama-compatible generation endpoint.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("generation timed out")]
    Timeout,

    #[error("HTTP request failed: {0}")]
    Transport(reqwest::Error),

    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },

    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// The generative-text seam. [`OllamaClient`] implements it in production;
/// tests substitute stubs.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate free text for a fixed instruction and per-request content.
    async fn generate(&self, instruction: &str, content: &str) -> Result<String, GenerateError>;
}

/// Connection settings for the generation endpoint.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "llama3.1:8b".to_string(),
            timeout: Duration::from_secs(30),
            temperature: 0.2,
        }
    }
}

/// Client for `POST {base}/api/generate`. The request timeout on the inner
/// client is the only bound on a generation call.
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    temperature: f32,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    system: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaClient {
    pub fn new(config: &LlmConfig) -> Result<Self, GenerateError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(GenerateError::Transport)?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }
}

#[async_trait]
impl TextGenerator for OllamaClient {
    async fn generate(&self, instruction: &str, content: &str) -> Result<String, GenerateError> {
        let url = format!("{}/api/generate", self.base_url);
        let request = GenerateRequest {
            model: &self.model,
            system: instruction,
            prompt: content,
            stream: false,
            options: GenerateOptions {
                temperature: self.temperature,
            },
        };

        debug!(url = %url, model = %self.model, "requesting generation");
        let resp = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(from_reqwest)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GenerateError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let text = resp.text().await.map_err(from_reqwest)?;
        let reply: GenerateResponse = serde_json::from_str(&text)?;
        Ok(reply.response)
    }
}

fn from_reqwest(e: reqwest::Error) -> GenerateError {
    if e.is_timeout() {
        GenerateError::Timeout
    } else {
        GenerateError::Transport(e)
    }
}
