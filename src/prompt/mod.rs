//! Prompt System - Template rendering
//!
//! This module provides the fixed synthesis and response templates and the
//! Handlebars renderer behind them.

mod composer;
mod render;

pub use composer::PromptComposer;
pub use render::PromptRenderer;
