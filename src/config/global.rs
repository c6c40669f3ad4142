//! Settings file model.
//!
//! Loaded from an explicit path, ~/.config/postsmith/postsmith.yml,
//! ./postsmith.yml or ./config.json.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PostsmithError, Result};
use crate::llm::openai::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Lowest accepted sampling temperature.
pub const MIN_TEMPERATURE: f32 = 0.0;

/// Highest accepted sampling temperature.
pub const MAX_TEMPERATURE: f32 = 2.0;

/// Top-level settings for Postsmith.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Generation parameters.
    pub ai_settings: AiSettings,

    /// Input file locations.
    pub file_paths: FilePaths,

    /// Completion service connection.
    pub api: ApiConfig,
}

/// Generation parameters sent with every request.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AiSettings {
    /// Completion model identifier.
    pub model: String,

    /// Sampling temperature, 0.0 to 2.0.
    pub temperature: f32,

    /// Upper bound on generated tokens.
    pub max_tokens: u32,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 300,
        }
    }
}

impl AiSettings {
    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(PostsmithError::ConfigMalformed("ai_settings.model must not be empty".to_string()));
        }
        if !(MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&self.temperature) {
            return Err(PostsmithError::ConfigMalformed(format!(
                "ai_settings.temperature must be between {} and {}, got {}",
                MIN_TEMPERATURE, MAX_TEMPERATURE, self.temperature
            )));
        }
        if self.max_tokens == 0 {
            return Err(PostsmithError::ConfigMalformed("ai_settings.max_tokens must be > 0".to_string()));
        }
        Ok(())
    }
}

/// Input file locations.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FilePaths {
    /// Default posts file, one post per line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posts: Option<PathBuf>,
}

/// Completion service connection settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of an OpenAI-compatible API.
    pub base_url: String,

    /// Environment variable holding the API key.
    pub api_key_env: String,

    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_ms: 60_000,
        }
    }
}

impl Config {
    /// Load configuration with fallback chain.
    ///
    /// Search order:
    /// 1. Explicit path if provided
    /// 2. ~/.config/postsmith/postsmith.yml
    /// 3. ./postsmith.yml
    /// 4. ./config.json
    /// 5. Defaults
    ///
    /// `on_skip` is called for every discovered file that failed to load and
    /// was passed over. An explicit path that fails is an error instead.
    pub fn load_with<F>(config_path: Option<&PathBuf>, on_skip: F) -> Result<Self>
    where
        F: FnMut(&Path, &PostsmithError),
    {
        // Explicit path takes precedence
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let project_name = env!("CARGO_PKG_NAME");
        let mut candidates = Vec::new();
        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join(project_name).join(format!("{}.yml", project_name)));
        }
        candidates.push(PathBuf::from(format!("{}.yml", project_name)));
        candidates.push(PathBuf::from("config.json"));

        Ok(Self::load_first(&candidates, on_skip))
    }

    fn load_first<F>(candidates: &[PathBuf], mut on_skip: F) -> Self
    where
        F: FnMut(&Path, &PostsmithError),
    {
        for candidate in candidates.iter().filter(|p| p.exists()) {
            match Self::load_from_file(candidate) {
                Ok(config) => return config,
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", candidate.display(), e);
                    on_skip(candidate, &e);
                }
            }
        }

        log::info!("No config file found, using defaults");
        Self::default()
    }

    /// Load and validate a single settings file.
    ///
    /// `.json` files are parsed as JSON, everything else as YAML.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(PostsmithError::ConfigNotFound(path.display().to_string()));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| PostsmithError::ConfigMalformed(format!("failed to read {}: {}", path.display(), e)))?;

        let is_json = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let config: Self = if is_json {
            serde_json::from_str(&content)
                .map_err(|e| PostsmithError::ConfigMalformed(format!("{}: {}", path.display(), e)))?
        } else {
            serde_yaml::from_str(&content)
                .map_err(|e| PostsmithError::ConfigMalformed(format!("{}: {}", path.display(), e)))?
        };

        config.validate()?;
        log::info!("Loaded config from: {}", path.display());
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        self.ai_settings.validate()?;
        if self.api.timeout_ms == 0 {
            return Err(PostsmithError::ConfigMalformed("api.timeout_ms must be > 0".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.ai_settings.model, "gpt-4-turbo");
        assert_eq!(config.ai_settings.temperature, 0.7);
        assert_eq!(config.ai_settings.max_tokens, 300);
        assert!(config.file_paths.posts.is_none());
        assert_eq!(config.api.base_url, "https://api.openai.com/v1");
        assert_eq!(config.api.api_key_env, "OPENAI_API_KEY");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_json_config() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "config.json",
            r#"{
                "ai_settings": {"model": "gpt-4", "temperature": 1.2, "max_tokens": 500},
                "file_paths": {"posts": "data/posts.txt"}
            }"#,
        );

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.ai_settings.model, "gpt-4");
        assert_eq!(config.ai_settings.temperature, 1.2);
        assert_eq!(config.ai_settings.max_tokens, 500);
        assert_eq!(config.file_paths.posts, Some(PathBuf::from("data/posts.txt")));
        // Missing section falls back to defaults
        assert_eq!(config.api, ApiConfig::default());
    }

    #[test]
    fn test_load_yaml_config() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "postsmith.yml",
            "ai_settings:\n  model: gpt-3.5-turbo\n  max_tokens: 120\napi:\n  timeout_ms: 5000\n",
        );

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.ai_settings.model, "gpt-3.5-turbo");
        assert_eq!(config.ai_settings.max_tokens, 120);
        assert_eq!(config.ai_settings.temperature, 0.7);
        assert_eq!(config.api.timeout_ms, 5000);
        assert_eq!(config.api.api_key_env, "OPENAI_API_KEY");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = Config::load_from_file(dir.path().join("nope.json"));
        assert!(matches!(result, Err(PostsmithError::ConfigNotFound(_))));
    }

    #[test]
    fn test_load_malformed_json() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "{{ \"ai_settings\": ").unwrap();

        let result = Config::load_from_file(file.path());
        assert!(matches!(result, Err(PostsmithError::ConfigMalformed(_))));
    }

    #[test]
    fn test_load_wrong_type() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "config.json", r#"{"ai_settings": {"max_tokens": "lots"}}"#);
        let result = Config::load_from_file(&path);
        assert!(matches!(result, Err(PostsmithError::ConfigMalformed(_))));
    }

    #[test]
    fn test_load_temperature_out_of_range() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "config.json", r#"{"ai_settings": {"temperature": 2.5}}"#);
        let result = Config::load_from_file(&path);
        match result {
            Err(PostsmithError::ConfigMalformed(msg)) => assert!(msg.contains("temperature")),
            other => panic!("Expected ConfigMalformed, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_zero_max_tokens() {
        let settings = AiSettings {
            max_tokens: 0,
            ..Default::default()
        };
        assert!(matches!(settings.validate(), Err(PostsmithError::ConfigMalformed(_))));
    }

    #[test]
    fn test_validate_blank_model() {
        let settings = AiSettings {
            model: "  ".to_string(),
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_zero_timeout() {
        let mut config = Config::default();
        config.api.timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_explicit_path_errors_are_fatal() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.yml");
        assert!(Config::load_with(Some(&missing), |_, _| {}).is_err());
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "custom.yml", "ai_settings:\n  model: custom-model\n");
        let config = Config::load_with(Some(&path), |_, _| {}).unwrap();
        assert_eq!(config.ai_settings.model, "custom-model");
    }

    #[test]
    fn test_load_first_reports_skipped_files() {
        let dir = TempDir::new().unwrap();
        let broken = write_file(&dir, "config.json", r#"{"ai_settings": {"temperature": 7.0}}"#);
        let good = write_file(&dir, "postsmith.yml", "ai_settings:\n  model: fallback-model\n");
        let missing = dir.path().join("absent.yml");

        let mut skipped = Vec::new();
        let config = Config::load_first(&[missing, broken.clone(), good], |path, e| {
            skipped.push((path.to_path_buf(), e.to_string()))
        });

        assert_eq!(config.ai_settings.model, "fallback-model");
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].0, broken);
        assert!(skipped[0].1.contains("temperature"));
    }

    #[test]
    fn test_load_first_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let broken = write_file(&dir, "config.json", "not json");

        let mut skipped = 0;
        let config = Config::load_first(&[broken], |_, _| skipped += 1);
        assert_eq!(config, Config::default());
        assert_eq!(skipped, 1);
    }

    #[test]
    fn test_yaml_roundtrip_keeps_shape() {
        let yaml = serde_yaml::to_string(&Config::default()).unwrap();
        assert!(yaml.contains("ai_settings:"));
        assert!(yaml.contains("max_tokens: 300"));
        assert!(!yaml.contains("posts:"));
    }
}
