//! Movies Buddy CLI entry point.

use anyhow::Result;
use clap::Parser;
use movies_buddy::cli::{commands, Cli, Commands};
use movies_buddy::config::{load_dotenv, Settings};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    load_dotenv();

    // Load configuration
    let config_path = match &cli.config {
        Some(path) => Settings::expand_path(path),
        None => Settings::default_config_path(),
    };
    let settings = Settings::load_from(Some(&config_path))?;

    // Initialize logging. stdout carries MCP frames and answers, so logs go to stderr.
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("movies_buddy={}", log_level)),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match cli.command {
        None => {
            commands::run_ask(None, None, settings).await?;
        }

        Some(Commands::Ask { query, timeout }) => {
            commands::run_ask(query, timeout, settings).await?;
        }

        Some(Commands::Chat) => {
            commands::run_chat(settings).await?;
        }

        Some(Commands::Summary { title }) => {
            commands::run_summary(&title, settings).await?;
        }

        Some(Commands::Search {
            query,
            content_type,
            year,
            company,
            limit,
        }) => {
            commands::run_search(&query, content_type, year, company, limit, settings).await?;
        }

        Some(Commands::Mcp) => {
            commands::run_mcp(settings).await?;
        }

        Some(Commands::Doctor) => {
            commands::run_doctor(&settings, &config_path)?;
        }

        Some(Commands::Config { action }) => {
            commands::run_config(&action, &config_path, settings)?;
        }
    }

    Ok(())
}
