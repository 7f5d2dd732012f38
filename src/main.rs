// ABOUTME: Entry point for hookchat — a terminal chat client for workflow webhooks.
// ABOUTME: Parses CLI args, loads config, sets up logging, and launches the TUI or a subcommand.

use clap::Parser;

use hookchat::app::App;
use hookchat::cli::Cli;
use hookchat::commands;
use hookchat::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let overrides = cli.overrides();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let mut config = Config::load(Some(config_path.as_path()))?;
    config.apply(&overrides);

    let _log_guard = hookchat::logging::init(&config)?;
    tracing::info!("hookchat {} starting", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Some(command) => {
            commands::run(command, &config, &config_path, overrides.webhook_url.as_deref()).await
        }
        None => App::new(config, overrides.webhook_url).run().await,
    }
}
