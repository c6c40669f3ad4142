//! Per-run overrides.
//!
//! Values supplied for a single invocation (CLI flags). They are merged into
//! a working copy of the loaded settings and never written back.

use super::global::AiSettings;
use crate::error::Result;

/// Overrides for one generation request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsOverrides {
    /// Override model.
    pub model: Option<String>,

    /// Override temperature.
    pub temperature: Option<f32>,

    /// Override max tokens.
    pub max_tokens: Option<u32>,
}

impl SettingsOverrides {
    /// Create empty overrides (no overrides applied).
    pub fn none() -> Self {
        Self::default()
    }

    /// Check if any overrides are set.
    pub fn is_empty(&self) -> bool {
        self.model.is_none() && self.temperature.is_none() && self.max_tokens.is_none()
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Merge into a working copy of `base` and validate the result.
    pub fn apply(&self, base: &AiSettings) -> Result<AiSettings> {
        let mut settings = base.clone();
        if let Some(model) = &self.model {
            settings.model = model.clone();
        }
        if let Some(temperature) = self.temperature {
            settings.temperature = temperature;
        }
        if let Some(max_tokens) = self.max_tokens {
            settings.max_tokens = max_tokens;
        }
        settings.validate()?;
        Ok(settings)
    }
}
