//! Error types for Postsmith
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

use crate::llm::LlmError;

/// Prefix carried by every service failure shown to the user
pub const SERVICE_ERROR_PREFIX: &str = "An error occurred: ";

/// All error types that can occur in Postsmith
#[derive(Debug, Error)]
pub enum PostsmithError {
    /// Configuration file does not exist
    #[error("Config not found: {0}")]
    ConfigNotFound(String),

    /// Configuration file could not be read or parsed, or holds invalid values
    #[error("Config malformed: {0}")]
    ConfigMalformed(String),

    /// Posts file could not be opened or read
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    /// Request rejected before reaching the completion service
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// Prompt template could not be registered or rendered
    #[error("Template error: {0}")]
    Template(String),

    /// Completion service failure
    #[error("An error occurred: {0}")]
    Service(#[from] LlmError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PostsmithError {
    /// Whether the error was raised locally, before any network call
    pub fn is_validation(&self) -> bool {
        matches!(self, PostsmithError::ValidationFailed(_))
    }

    /// Whether a later attempt could succeed without changing the request
    pub fn is_retryable(&self) -> bool {
        match self {
            PostsmithError::Service(e) => e.is_retryable(),
            _ => false,
        }
    }
}

/// Result type alias for Postsmith operations
pub type Result<T> = std::result::Result<T, PostsmithError>;
