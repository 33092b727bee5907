//! HR Desk CLI
//!
//! Main entry point for the hrdesk command-line tool.
//! Syncs the company snapshot into a vector index and answers HR questions
//! grounded on it.

mod commands;

use clap::{Parser, Subcommand};
use commands::{ChatCommand, ClassifyCommand, SyncCommand};
use hrdesk_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// HR Desk - grounded answers about employees, projects and leave
#[derive(Parser, Debug)]
#[command(name = "hrdesk")]
#[command(about = "Grounded answers about employees, projects and leave", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "HRDESK_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "HRDESK_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    /// Generation provider
    #[arg(short, long, global = true, env = "HRDESK_PROVIDER")]
    provider: Option<String>,

    /// Generation model identifier
    #[arg(short, long, global = true, env = "HRDESK_MODEL")]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Answer a question from the synced company data
    Chat(ChatCommand),

    /// Fetch the company snapshot and report what was indexed
    Sync(SyncCommand),

    /// Show the intent and entities detected in a message
    Classify(ClassifyCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();

    let config = AppConfig::load()?.with_overrides(
        cli.workspace,
        cli.config,
        cli.provider,
        cli.model,
        cli.log_level,
        cli.verbose,
        cli.no_color,
        cli.log_json,
    )?;

    logging::init_logging(config.log_level.as_deref(), config.no_color, config.log_json)?;

    tracing::info!("HR Desk CLI starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Provider: {} ({})", config.provider, config.model);
    tracing::debug!("Embeddings: {}", config.embedding.provider);

    config.validate()?;

    let command_name = match &cli.command {
        Commands::Chat(_) => "chat",
        Commands::Sync(_) => "sync",
        Commands::Classify(_) => "classify",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Chat(cmd) => cmd.execute(&config).await,
        Commands::Sync(cmd) => cmd.execute(&config).await,
        Commands::Classify(cmd) => cmd.execute(),
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
