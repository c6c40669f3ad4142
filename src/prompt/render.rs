//! Prompt Renderer - Render templates with context variables using Handlebars

use handlebars::Handlebars;
use serde::Serialize;

use crate::error::{PostsmithError, Result};

/// Renders prompt templates using Handlebars templating
pub struct PromptRenderer {
    handlebars: Handlebars<'static>,
}

impl Default for PromptRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptRenderer {
    /// Create a new PromptRenderer with default settings
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        // User text goes into prompts verbatim
        handlebars.register_escape_fn(handlebars::no_escape);
        Self { handlebars }
    }

    /// Register a named template for later use
    pub fn register_template(&mut self, name: &str, template: &str) -> Result<()> {
        self.handlebars
            .register_template_string(name, template)
            .map_err(|e| PostsmithError::Template(format!("Failed to register template '{}': {}", name, e)))
    }

    /// Render a previously registered template
    pub fn render_named<T: Serialize>(&self, name: &str, context: &T) -> Result<String> {
        self.handlebars
            .render(name, context)
            .map_err(|e| PostsmithError::Template(format!("Failed to render template '{}': {}", name, e)))
    }

    /// Check if a named template is registered
    pub fn has_template(&self, name: &str) -> bool {
        self.handlebars.get_template(name).is_some()
    }
}
