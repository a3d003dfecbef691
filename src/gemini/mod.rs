//! # Gemini Text Generation
//!
//! Thin client for the Gemini `generateContent` REST endpoint. One prompt in,
//! one completion out: no streaming, no conversation state.
//!
//! ## Configuration
//!
//! - `GEMINI_API_KEY`: required, sent in the `x-goog-api-key` header
//! - `GEMINI_MODEL`: model name, defaults to `gemini-1.5-flash`
//! - `GEMINI_TIMEOUT_SECS`: client-side request timeout
//!
//! Failures are returned as [`GenerationError`]; callers are expected to
//! replace them with a fixed user-facing message.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::info;

use crate::models::{GeminiContent, GeminiPart, GeminiRequest, GeminiResponse};
use crate::traits::TextGenerator;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("request to Gemini failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Gemini returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("could not decode Gemini response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("prompt was blocked: {0}")]
    Blocked(String),

    #[error("Gemini returned no text")]
    Empty,
}

/// Gemini API client
///
/// Cheap to clone: the underlying `reqwest::Client` shares its connection pool.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl GeminiClient {
    pub fn new(api_key: String, model: &str, timeout: Duration) -> Result<Self, GenerationError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key,
            endpoint: format!("{API_BASE}/{model}:generateContent"),
        })
    }
}

/// Concatenated text of the first candidate
fn completion_text(response: GeminiResponse) -> Result<String, GenerationError> {
    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(GenerationError::Blocked(reason));
    }

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(GenerationError::Empty);
    }
    Ok(text)
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(GenerationError::Status { status, body });
        }

        let text = completion_text(serde_json::from_str(&body)?)?;
        info!("Gemini returned {} characters", text.len());
        Ok(text)
    }
}
