//! Postsmith - discussion board post generator
//!
//! Composes a prompt from a theme and existing posts (or from one post and an
//! optional instruction), sends it to an OpenAI-compatible chat-completions
//! API and returns the generated text.

pub mod config;
pub mod error;
pub mod generator;
pub mod llm;
pub mod posts;
pub mod prompt;

pub use config::{AiSettings, Config, SettingsOverrides, load_configuration};
pub use error::{PostsmithError, Result};
pub use generator::Generator;
pub use posts::{load_posts_from_file, posts_from_text, read_posts};
