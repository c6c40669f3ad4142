//! Prompt Composer - the two fixed prompt templates
//!
//! Synthesis: write a new standalone post on a theme, using existing posts as
//! unstated background. Response: reply to one existing post, optionally
//! steered by an instruction.

use serde::Serialize;

use super::render::PromptRenderer;
use crate::error::Result;

const SYNTHESIS: &str = "synthesis";
const RESPONSE: &str = "response";

const SYNTHESIS_TEMPLATE: &str = r#"The following are discussion board posts responding to the theme/question: "{{theme}}"

{{posts}}

Using the ideas and insights from the above posts, write a detailed and cohesive paragraph that addresses the theme/question: "{{theme}}". Do not mention that you are using the provided posts as guidance. Write in a natural, standalone style."#;

const RESPONSE_TEMPLATE: &str = r#"Please write a thoughtful reply to the following discussion board post:

"{{original_post}}"

{{#if instruction}}Additional instructions: {{instruction}}

{{/if}}Your reply should demonstrate a clear understanding of the original post, add meaningful insight or a new perspective, remain professional and respectful, and support its points with examples or evidence where appropriate."#;

#[derive(Serialize)]
struct SynthesisContext<'a> {
    theme: &'a str,
    posts: String,
}

#[derive(Serialize)]
struct ResponseContext<'a> {
    original_post: &'a str,
    instruction: Option<&'a str>,
}

/// Renders synthesis and response prompts
pub struct PromptComposer {
    renderer: PromptRenderer,
}

impl PromptComposer {
    pub fn new() -> Result<Self> {
        let mut renderer = PromptRenderer::new();
        renderer.register_template(SYNTHESIS, SYNTHESIS_TEMPLATE)?;
        renderer.register_template(RESPONSE, RESPONSE_TEMPLATE)?;
        Ok(Self { renderer })
    }

    /// Prompt for a new post on `theme`, backed by `posts` joined with newlines.
    pub fn synthesis(&self, posts: &[String], theme: &str) -> Result<String> {
        let context = SynthesisContext {
            theme,
            posts: posts.join("\n"),
        };
        self.renderer.render_named(SYNTHESIS, &context)
    }

    /// Prompt for a reply to `original_post`.
    ///
    /// A missing or blank instruction leaves out the instructions clause entirely.
    pub fn response(&self, original_post: &str, instruction: Option<&str>) -> Result<String> {
        let context = ResponseContext {
            original_post,
            instruction: instruction.map(str::trim).filter(|i| !i.is_empty()),
        };
        self.renderer.render_named(RESPONSE, &context)
    }
}
