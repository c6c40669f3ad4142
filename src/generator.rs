//! Generation entry points
//!
//! Validates input, renders the prompt, sends exactly one completion request
//! and returns the trimmed text. Validation failures never reach the client.

use std::sync::Arc;

use log::{debug, info, warn};

use crate::config::AiSettings;
use crate::error::{PostsmithError, Result};
use crate::llm::{CompletionRequest, LlmClient};
use crate::prompt::PromptComposer;

/// System instruction sent with synthesis requests
pub const SYNTHESIS_SYSTEM_PROMPT: &str = "You are a helpful assistant that generates discussion board posts.";

/// Which template a request uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Synthesis,
    Response,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Synthesis => write!(f, "synthesis"),
            Mode::Response => write!(f, "response"),
        }
    }
}

/// Drives the prompt composer and a completion client
pub struct Generator {
    client: Arc<dyn LlmClient>,
    composer: PromptComposer,
}

impl Generator {
    pub fn new(client: Arc<dyn LlmClient>) -> Result<Self> {
        Ok(Self {
            client,
            composer: PromptComposer::new()?,
        })
    }

    /// Write a new standalone post on `theme`, using `posts` as background.
    pub async fn generate_synthesis(&self, posts: &[String], theme: &str, settings: &AiSettings) -> Result<String> {
        if theme.trim().is_empty() {
            return Err(PostsmithError::ValidationFailed(
                "discussion theme/question is empty".to_string(),
            ));
        }
        if posts.is_empty() {
            return Err(PostsmithError::ValidationFailed("no existing posts supplied".to_string()));
        }
        if let Some(index) = posts.iter().position(|p| p.trim().is_empty()) {
            return Err(PostsmithError::ValidationFailed(format!("post {} is blank", index + 1)));
        }
        check_settings(settings)?;

        let prompt = self.composer.synthesis(posts, theme)?;
        debug!("Rendered synthesis prompt from {} posts ({} chars)", posts.len(), prompt.len());

        let request = build_request(Mode::Synthesis, prompt, settings);
        self.dispatch(Mode::Synthesis, request).await
    }

    /// Write a reply to `original_post`, optionally steered by `instruction`.
    pub async fn generate_response(
        &self,
        original_post: &str,
        instruction: Option<&str>,
        settings: &AiSettings,
    ) -> Result<String> {
        if original_post.trim().is_empty() {
            return Err(PostsmithError::ValidationFailed("original post is empty".to_string()));
        }
        check_settings(settings)?;

        let prompt = self.composer.response(original_post, instruction)?;
        debug!("Rendered response prompt ({} chars)", prompt.len());

        let request = build_request(Mode::Response, prompt, settings);
        self.dispatch(Mode::Response, request).await
    }

    async fn dispatch(&self, mode: Mode, request: CompletionRequest) -> Result<String> {
        info!("Requesting {} from model {:?}", mode, request.model);
        match self.client.complete(request).await {
            Ok(response) => {
                debug!(
                    "Completion finished: reason={:?} tokens={}",
                    response.finish_reason,
                    response.usage.total()
                );
                Ok(response.content.trim().to_string())
            }
            Err(e) => {
                warn!("{} request failed (retryable: {}): {}", mode, e.is_retryable(), e);
                Err(PostsmithError::Service(e))
            }
        }
    }
}

// Settings reach here without going through `SettingsOverrides::apply` when
// the library is driven directly.
fn check_settings(settings: &AiSettings) -> Result<()> {
    settings.validate().map_err(|e| match e {
        PostsmithError::ConfigMalformed(msg) => PostsmithError::ValidationFailed(msg),
        other => other,
    })
}

/// Build the single request for `mode`.
///
/// Synthesis carries the system instruction; response sends the user turn only.
pub fn build_request(mode: Mode, prompt: String, settings: &AiSettings) -> CompletionRequest {
    let request = CompletionRequest::new()
        .with_model(settings.model.clone())
        .with_temperature(settings.temperature)
        .with_max_tokens(settings.max_tokens);

    match mode {
        Mode::Synthesis => request
            .with_system_message(SYNTHESIS_SYSTEM_PROMPT)
            .with_user_message(prompt),
        Mode::Response => request.with_user_message(prompt),
    }
}
