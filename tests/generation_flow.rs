//! End-to-end generation tests
//!
//! Drives config loading, post loading and both generation modes against a
//! mock completion client.

use std::fs;
use std::sync::Arc;

use postsmith::config::SettingsOverrides;
use postsmith::error::SERVICE_ERROR_PREFIX;
use postsmith::llm::{LlmClient, LlmError, MockLlmClient, Role};
use postsmith::{Generator, PostsmithError, load_configuration, load_posts_from_file, posts_from_text};
use tempfile::TempDir;

fn write_config(dir: &TempDir, posts_path: &str) -> std::path::PathBuf {
    let path = dir.path().join("config.json");
    let body = serde_json::json!({
        "ai_settings": {"model": "gpt-4", "temperature": 0.5, "max_tokens": 400},
        "file_paths": {"posts": posts_path}
    });
    fs::write(&path, body.to_string()).unwrap();
    path
}

#[tokio::test]
async fn test_mock_llm_client_behind_trait_object() {
    let mock = Arc::new(MockLlmClient::new());
    let client: Arc<dyn LlmClient> = mock.clone();
    let response = client.complete(Default::default()).await.unwrap();
    assert_eq!(response.content, "mock response");
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test]
async fn test_synthesis_from_configured_posts_file() -> postsmith::Result<()> {
    let dir = TempDir::new()?;
    let posts_path = dir.path().join("posts.txt");
    fs::write(
        &posts_path,
        "Songs make facts easier to recall.\n\n\nMovement breaks restore focus.\n   \nRhythm games teach syllables.\n",
    )?;
    let config = load_configuration(write_config(&dir, posts_path.to_str().unwrap()))?;

    let posts = load_posts_from_file(config.file_paths.posts.as_ref().unwrap());
    assert_eq!(posts.len(), 3);

    let mock = Arc::new(MockLlmClient::new().with_response("  Music and movement anchor learning.  \n"));
    let generator = Generator::new(mock.clone())?;
    let theme = "Explain how Music and Dance help students learn";

    let text = generator.generate_synthesis(&posts, theme, &config.ai_settings).await?;
    assert_eq!(text, "Music and movement anchor learning.");

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.model.as_deref(), Some("gpt-4"));
    assert_eq!(request.temperature, Some(0.5));
    assert_eq!(request.max_tokens, Some(400));
    assert_eq!(request.messages[0].role, Role::System);

    let prompt = &request.messages[1].content;
    assert!(prompt.matches(theme).count() >= 2);
    assert_eq!(prompt.matches(&posts.join("\n")).count(), 1);

    Ok(())
}

#[tokio::test]
async fn test_overrides_do_not_touch_loaded_config() -> postsmith::Result<()> {
    let dir = TempDir::new()?;
    let config = load_configuration(write_config(&dir, "unused.txt"))?;
    let before = config.clone();

    let settings = SettingsOverrides::none()
        .with_model("gpt-3.5-turbo")
        .with_max_tokens(50)
        .apply(&config.ai_settings)?;

    let mock = Arc::new(MockLlmClient::new());
    let generator = Generator::new(mock.clone())?;
    generator.generate_response("A post to answer.", None, &settings).await?;

    assert_eq!(config, before);
    let request = &mock.requests()[0];
    assert_eq!(request.model.as_deref(), Some("gpt-3.5-turbo"));
    assert_eq!(request.max_tokens, Some(50));
    assert_eq!(request.temperature, Some(0.5));
    Ok(())
}

#[tokio::test]
async fn test_missing_posts_file_surfaces_as_no_input() -> postsmith::Result<()> {
    let dir = TempDir::new()?;
    let posts = load_posts_from_file(dir.path().join("absent.txt"));
    assert!(posts.is_empty());

    let mock = Arc::new(MockLlmClient::new());
    let generator = Generator::new(mock.clone())?;
    let result = generator
        .generate_synthesis(&posts, "theme", &Default::default())
        .await;

    assert!(matches!(result, Err(PostsmithError::ValidationFailed(_))));
    assert_eq!(mock.call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_response_mode_request_shape() -> postsmith::Result<()> {
    let mock = Arc::new(MockLlmClient::new().with_response("Thanks for sharing!"));
    let generator = Generator::new(mock.clone())?;
    let original = "Clapping out words helps students count syllables.";

    let text = generator
        .generate_response(original, Some("Suggest one follow-up activity"), &Default::default())
        .await?;
    assert_eq!(text, "Thanks for sharing!");

    let request = &mock.requests()[0];
    assert_eq!(request.messages.len(), 1);
    assert_eq!(request.messages[0].role, Role::User);
    let prompt = &request.messages[0].content;
    assert_eq!(prompt.matches(original).count(), 1);
    assert!(prompt.contains("Additional instructions: Suggest one follow-up activity"));
    Ok(())
}

#[tokio::test]
async fn test_service_failures_never_escape_as_panics() {
    let mock = Arc::new(
        MockLlmClient::new()
            .with_error(LlmError::ApiError {
                status: 404,
                message: "The model `gpt-9` does not exist".to_string(),
            })
            .with_error(LlmError::RateLimited {
                retry_after: std::time::Duration::from_secs(20),
            }),
    );
    let generator = Generator::new(mock.clone()).unwrap();
    let posts = posts_from_text("one\ntwo");

    let err = generator
        .generate_synthesis(&posts, "theme", &Default::default())
        .await
        .unwrap_err();
    assert!(err.to_string().starts_with(SERVICE_ERROR_PREFIX));
    assert!(!err.is_retryable());

    let err = generator
        .generate_response("post", None, &Default::default())
        .await
        .unwrap_err();
    assert!(err.to_string().starts_with(SERVICE_ERROR_PREFIX));
    assert!(err.is_retryable());
    assert_eq!(mock.call_count(), 2);
}

#[tokio::test]
async fn test_mixed_blank_posts_and_bad_settings_never_reach_client() {
    let mock = Arc::new(MockLlmClient::new());
    let generator = Generator::new(mock.clone()).unwrap();

    let posts = vec!["a".to_string(), "   ".to_string(), "b".to_string()];
    let result = generator.generate_synthesis(&posts, "theme", &Default::default()).await;
    assert!(matches!(result, Err(PostsmithError::ValidationFailed(_))));

    let settings = postsmith::AiSettings {
        model: String::new(),
        temperature: 9.0,
        max_tokens: 0,
    };
    let result = generator.generate_response("post", None, &settings).await;
    assert!(matches!(result, Err(PostsmithError::ValidationFailed(_))));
    assert_eq!(mock.call_count(), 0);
}

#[test]
fn test_malformed_config_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, "not json at all").unwrap();

    let result = load_configuration(&path);
    assert!(matches!(result, Err(PostsmithError::ConfigMalformed(_))));
}
