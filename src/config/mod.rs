//! Configuration system for Postsmith.
//!
//! Two layers:
//! 1. Settings file (JSON or YAML), loaded once
//! 2. Per-run overrides, merged into a working copy before each request

use std::path::Path;

pub use self::global::{AiSettings, ApiConfig, Config, FilePaths, MAX_TEMPERATURE, MIN_TEMPERATURE};
pub use self::overrides::SettingsOverrides;

use crate::error::Result;

mod global;
mod overrides;

/// Load the settings file at `path`.
///
/// Fails with `ConfigNotFound` when the file is missing and
/// `ConfigMalformed` when it cannot be read, parsed, or holds invalid values.
/// The caller decides whether to fall back to `Config::default()`.
pub fn load_configuration(path: impl AsRef<Path>) -> Result<Config> {
    Config::load_from_file(path)
}
