//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - synthesize: write a new post from a theme and existing posts
//! - respond: write a reply to one post
//! - config: print the effective configuration

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use postsmith::config::{MAX_TEMPERATURE, MIN_TEMPERATURE, SettingsOverrides};

/// Postsmith - generate discussion board posts with an LLM
#[derive(Parser, Debug)]
#[command(name = "postsmith")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path (JSON or YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a new post on a theme, drawing on existing posts
    Synthesize {
        /// Discussion theme or question
        #[arg(short, long)]
        theme: String,

        /// Existing posts, one per line
        #[arg(short, long, conflicts_with = "posts_file")]
        posts: Option<String>,

        /// File with existing posts, one per line (defaults to file_paths.posts)
        #[arg(short = 'f', long)]
        posts_file: Option<PathBuf>,

        #[command(flatten)]
        overrides: OverrideArgs,
    },

    /// Write a reply to an existing post
    Respond {
        /// The post to reply to
        #[arg(short, long, conflicts_with = "post_file", required_unless_present = "post_file")]
        post: Option<String>,

        /// File holding the post to reply to
        #[arg(long)]
        post_file: Option<PathBuf>,

        /// Extra guidance for the reply
        #[arg(short, long)]
        instruction: Option<String>,

        #[command(flatten)]
        overrides: OverrideArgs,
    },

    /// Print the effective configuration
    Config,
}

/// Per-run generation overrides
#[derive(Args, Debug, Clone, Default)]
pub struct OverrideArgs {
    /// Model to use instead of ai_settings.model
    #[arg(short, long)]
    pub model: Option<String>,

    /// Sampling temperature (0.0 - 2.0)
    #[arg(long, value_parser = parse_temperature)]
    pub temperature: Option<f32>,

    /// Maximum tokens to generate
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_tokens: Option<u32>,

    /// API key (defaults to the variable named by api.api_key_env)
    #[arg(long)]
    pub api_key: Option<String>,
}

impl OverrideArgs {
    /// Settings overrides carried by these flags
    pub fn to_overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

fn parse_temperature(s: &str) -> Result<f32, String> {
    let value: f32 = s.parse().map_err(|_| format!("'{}' is not a number", s))?;
    if (MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&value) {
        Ok(value)
    } else {
        Err(format!(
            "temperature must be between {} and {}",
            MIN_TEMPERATURE, MAX_TEMPERATURE
        ))
    }
}
