use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use postsmith::config::{AiSettings, Config};
use postsmith::llm::{LlmClient, OpenAiClient, OpenAiConfig};
use postsmith::{Generator, PostsmithError, load_posts_from_file, posts_from_text};

mod cli;

use cli::Cli;
use cli::commands::{Commands, OverrideArgs};

fn setup_logging() -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("postsmith")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("postsmith.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn build_client(config: &Config, settings: &AiSettings, overrides: &OverrideArgs) -> Result<Arc<dyn LlmClient>> {
    let client_config = OpenAiConfig::from_api_config(&config.api, settings.model.clone());
    let client = match &overrides.api_key {
        Some(key) => OpenAiClient::with_api_key(key.clone(), client_config),
        None => OpenAiClient::from_env(&config.api.api_key_env, client_config),
    }
    .context("Failed to create completion client")?;
    let client: Arc<dyn LlmClient> = Arc::new(client);
    Ok(client)
}

fn collect_posts(posts: Option<&str>, posts_file: Option<&Path>, config: &Config) -> Vec<String> {
    if let Some(text) = posts {
        return posts_from_text(text);
    }
    match posts_file.or(config.file_paths.posts.as_deref()) {
        Some(path) => {
            info!("Loading posts from {}", path.display());
            load_posts_from_file(path)
        }
        None => Vec::new(),
    }
}

fn read_post(post: Option<&str>, post_file: Option<&Path>) -> Result<String> {
    match (post, post_file) {
        (Some(text), _) => Ok(text.to_string()),
        (None, Some(path)) => {
            fs::read_to_string(path).with_context(|| format!("Failed to read post from {}", path.display()))
        }
        (None, None) => Ok(String::new()),
    }
}

fn report(result: postsmith::Result<String>, verbose: bool) -> ExitCode {
    match result {
        Ok(text) => {
            if verbose {
                eprintln!("{}", "Post generated successfully".green());
            }
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Err(e) => {
            if verbose && matches!(e, PostsmithError::Service(_)) && e.is_retryable() {
                eprintln!("{}", "The failure looks transient; trying again may help.".yellow());
            }
            eprintln!("{}", e.to_string().red());
            ExitCode::FAILURE
        }
    }
}

async fn run_application(cli: &Cli, config: &Config) -> Result<ExitCode> {
    info!("Starting application");

    if cli.is_verbose() {
        eprintln!("{}", "Verbose mode enabled".yellow());
    }

    match &cli.command {
        Commands::Synthesize {
            theme,
            posts,
            posts_file,
            overrides,
        } => {
            let settings = overrides.to_overrides().apply(&config.ai_settings)?;
            let posts = collect_posts(posts.as_deref(), posts_file.as_deref(), config);
            if cli.is_verbose() {
                eprintln!("{} {} posts, model {}", "Synthesizing from".cyan(), posts.len(), settings.model);
            }

            let generator = Generator::new(build_client(config, &settings, overrides)?)?;
            let result = generator.generate_synthesis(&posts, theme, &settings).await;
            Ok(report(result, cli.is_verbose()))
        }
        Commands::Respond {
            post,
            post_file,
            instruction,
            overrides,
        } => {
            let settings = overrides.to_overrides().apply(&config.ai_settings)?;
            let original = read_post(post.as_deref(), post_file.as_deref())?;
            if cli.is_verbose() {
                eprintln!("{} model {}", "Writing reply with".cyan(), settings.model);
            }

            let generator = Generator::new(build_client(config, &settings, overrides)?)?;
            let result = generator
                .generate_response(original.trim(), instruction.as_deref(), &settings)
                .await;
            Ok(report(result, cli.is_verbose()))
        }
        Commands::Config => {
            print!("{}", serde_yaml::to_string(config).context("Failed to serialize config")?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();

    let config = Config::load_with(cli.config.as_ref(), |path, e| {
        eprintln!("{}", format!("Ignoring config {}: {}", path.display(), e).yellow());
    })
    .context("Failed to load configuration")?;

    info!("Starting with config from: {:?}", cli.config);

    run_application(&cli, &config).await.context("Application failed")
}
