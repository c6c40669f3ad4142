//! LLM Client Layer - chat-completions API integration
//!
//! This module provides:
//! - Message types for LLM communication
//! - LlmClient trait for API abstraction
//! - OpenAiClient implementation
//! - MockLlmClient for tests

pub mod client;
pub mod openai;
pub mod types;

pub use client::{LlmClient, LlmError, MockLlmClient};
pub use openai::{OpenAiClient, OpenAiConfig};
pub use types::{CompletionRequest, CompletionResponse, Message, Role, Usage};
