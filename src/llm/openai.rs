//! OpenAI-compatible chat-completions client
//!
//! Implements the LlmClient trait against `POST {base_url}/chat/completions`.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::config::ApiConfig;
use crate::llm::client::{LlmClient, LlmError};
use crate::llm::types::{CompletionRequest, CompletionResponse, Usage};

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default model to use
pub const DEFAULT_MODEL: &str = "gpt-4-turbo";

/// Default retry-after when a 429 carries no header
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Configuration for the OpenAI client
#[derive(Debug, Clone, PartialEq)]
pub struct OpenAiConfig {
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

impl OpenAiConfig {
    /// Build from the `api` section of the settings file
    pub fn from_api_config(api: &ApiConfig, model: impl Into<String>) -> Self {
        Self {
            base_url: api.base_url.clone(),
            model: model.into(),
            timeout: Duration::from_millis(api.timeout_ms),
        }
    }
}

// Wire shapes of a chat-completions response
#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// OpenAI API client
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    config: OpenAiConfig,
}

impl OpenAiClient {
    /// Create a client reading the key from the named environment variable
    pub fn from_env(env_var: &str, config: OpenAiConfig) -> Result<Self, LlmError> {
        let api_key = std::env::var(env_var)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| LlmError::MissingApiKey {
                env_var: env_var.to_string(),
            })?;

        Self::with_api_key(api_key, config)
    }

    /// Create a client with an explicit API key
    pub fn with_api_key(api_key: impl Into<String>, config: OpenAiConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            config,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    /// Fill request defaults from the client config
    fn build_request(&self, mut request: CompletionRequest) -> CompletionRequest {
        if request.model.is_none() {
            request.model = Some(self.config.model.clone());
        }
        request
    }

    fn parse_response(body: ChatCompletion) -> Result<CompletionResponse, LlmError> {
        let usage = body.usage.unwrap_or_default();
        let choice = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidResponse("response contained no choices".to_string()))?;

        let content = choice
            .message
            .content
            .ok_or_else(|| LlmError::InvalidResponse("first choice has no message content".to_string()))?;

        Ok(CompletionResponse {
            content,
            finish_reason: choice.finish_reason,
            usage,
        })
    }

    /// Map a non-success status and body to an error
    fn status_error(status: StatusCode, retry_after: Option<u64>, body: &str) -> LlmError {
        let message = serde_json::from_str::<ErrorEnvelope>(body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| body.trim().to_string());

        match status.as_u16() {
            401 | 403 => LlmError::Authentication(message),
            429 => LlmError::RateLimited {
                retry_after: Duration::from_secs(retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS)),
            },
            code => LlmError::ApiError { status: code, message },
        }
    }

    async fn send_request(&self, request: &CompletionRequest) -> Result<ChatCompletion, LlmError> {
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok());
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("Completion request failed with status {}", status);
            return Err(Self::status_error(status, retry_after, &body));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let request = self.build_request(request);
        debug!(
            "Sending completion request: model={:?} messages={}",
            request.model,
            request.messages.len()
        );
        let body = self.send_request(&request).await?;
        let response = Self::parse_response(body)?;
        debug!("Received completion: {} tokens", response.usage.total());
        Ok(response)
    }
}

// Keep the key out of debug output
impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.model)
            .field("timeout", &self.config.timeout)
            .finish()
    }
}
