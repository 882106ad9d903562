//! Text-generation backend: the collaborator that turns extracted text
//! into JSON-shaped text.
//!
//! The pipeline only needs a single synchronous-looking call:
//! `complete(prompt) -> String`. Everything else (model choice, retries,
//! streaming) is the backend's business, and the shipped implementation
//! deliberately does none of it: no retries, no streaming, one request per
//! call, with the HTTP client's timeout as the only deadline.

use crate::config::ConversionConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Errors a backend call can fail with.
///
/// The normalizer converts any of these into the error-marker output;
/// the variants exist so logs say *why* a normalization degraded.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Could not reach the backend at all.
    #[error("Cannot connect to backend at '{base_url}'")]
    Connection { base_url: String },

    /// The request was sent but timed out or failed mid-flight.
    #[error("Backend request failed: {0}")]
    Request(String),

    /// The backend answered with a non-success HTTP status.
    #[error("Backend returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    /// The response body could not be decoded.
    #[error("Failed to parse backend response: {0}")]
    Parse(String),
}

/// A text-completion collaborator: one prompt in, one completion out.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Complete `prompt` and return the raw (unsanitized) completion text.
    async fn complete(&self, prompt: &str) -> Result<String, BackendError>;
}

// ── Ollama-compatible HTTP backend ───────────────────────────────────────

/// Request body for `/api/generate`.
#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: i64,
}

/// Response body from `/api/generate`.
#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

/// HTTP backend speaking the Ollama generate API (`stream: false`).
pub struct OllamaBackend {
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: usize,
    client: reqwest::Client,
}

impl OllamaBackend {
    /// Build a backend from the conversion config. The per-call timeout is
    /// baked into the HTTP client here; the pipeline adds no deadline of
    /// its own.
    pub fn from_config(config: &ConversionConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api_timeout_secs))
            .build()
            .map_err(|e| BackendError::Request(e.to_string()))?;

        Ok(Self {
            base_url: config.backend_base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            client,
        })
    }
}

#[async_trait]
impl CompletionBackend for OllamaBackend {
    async fn complete(&self, prompt: &str) -> Result<String, BackendError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.temperature,
                num_predict: self.max_tokens as i64,
            },
        };

        debug!(
            "Backend call: model={} prompt_len={}",
            self.model,
            prompt.len()
        );

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    BackendError::Connection {
                        base_url: self.base_url.clone(),
                    }
                } else {
                    BackendError::Request(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))?;

        Ok(parsed.response)
    }
}
