//! Completion backends
//!
//! The helper only needs one thing from a language model: the text of a
//! single chat reply. [`CompletionBackend`] is that seam; [`OpenAiBackend`]
//! talks to any OpenAI-compatible `/chat/completions` endpoint.

use std::fmt;
use async_trait::async_trait;
use keycalc_core::CalcError;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Errors from a completion backend
#[derive(Debug, Error)]
pub enum NlpError {
    #[error("completion request failed: {message}")]
    RequestFailed { message: String },

    #[error("completion endpoint returned HTTP {status}")]
    Status { status: u16 },

    #[error("failed to decode completion response: {message}")]
    Decode { message: String },

    #[error("completion reply is not a usable instruction: {message}")]
    InvalidReply { message: String },
}

impl From<NlpError> for CalcError {
    fn from(err: NlpError) -> Self {
        CalcError::backend_failure(err.to_string())
    }
}

/// Completion backend settings. No API key means local parsing only.
#[derive(Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NlpConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl Default for NlpConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.into(),
            base_url: DEFAULT_BASE_URL.into(),
        }
    }
}

// Keeps the key out of logs
impl fmt::Debug for NlpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NlpConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Send one system prompt and one user message, return the reply text
    async fn complete(&self, system: &str, input: &str) -> Result<String, NlpError>;
}

/// Client for OpenAI-compatible chat completion APIs
pub struct OpenAiBackend {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiBackend {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into(),
        }
    }

    /// Backend for `config`, or `None` when no API key is set
    pub fn from_config(config: &NlpConfig) -> Option<Self> {
        let key = config.api_key.as_deref().filter(|k| !k.trim().is_empty())?;
        Some(Self::new(key, &config.model, &config.base_url))
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

pub(crate) fn chat_request_body(model: &str, system: &str, input: &str) -> Value {
    json!({
        "model": model,
        "messages": [
            { "role": "system", "content": system },
            { "role": "user", "content": input },
        ],
        "temperature": 0,
    })
}

/// `choices[0].message.content` of a chat completion response
pub(crate) fn reply_content(response: &Value) -> Result<String, NlpError> {
    response["choices"][0]["message"]["content"]
        .as_str()
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
        .ok_or_else(|| NlpError::Decode {
            message: "response has no message content".into(),
        })
}

#[async_trait]
impl CompletionBackend for OpenAiBackend {
    async fn complete(&self, system: &str, input: &str) -> Result<String, NlpError> {
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&chat_request_body(&self.model, system, input))
            .send()
            .await
            .map_err(|e| NlpError::RequestFailed { message: e.to_string() })?;

        let status = response.status();
        if !status.is_success() {
            return Err(NlpError::Status { status: status.as_u16() });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| NlpError::Decode { message: e.to_string() })?;
        reply_content(&body)
    }
}
