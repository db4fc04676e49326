//! Gorse - command-line client for the Gorse recommender system
//!
//! Main entry point for the `gorse` CLI.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{config, feedback, items, recommend, users};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// Gorse - command-line client for the Gorse recommender system
#[derive(Parser)]
#[command(name = "gorse")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// Client config file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Server URL (default: http://127.0.0.1:8088)
    #[arg(long, global = true, env = "GORSE_ENTRY_POINT")]
    pub entry_point: Option<String>,

    /// API key sent with every request
    #[arg(long, global = true, env = "GORSE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true, env = "GORSE_TIMEOUT_SECS")]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Item management
    Item(items::ItemArgs),

    /// User management
    User(users::UserArgs),

    /// Feedback management
    Feedback(feedback::FeedbackArgs),

    /// Recommend items for a user
    Recommend(recommend::RecommendArgs),

    /// Show similar items or users
    Neighbors(recommend::NeighborsArgs),

    /// Client configuration
    Config(config::ConfigArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so --json output stays parseable
    let filter = if cli.verbose {
        "gorse=debug,gorse_client=debug,info"
    } else {
        "gorse=info,gorse_client=warn,warn"
    };

    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
                ),
        )
        .init();

    let client_config = commands::resolve_config(
        cli.config.as_deref(),
        cli.entry_point,
        cli.api_key,
        cli.timeout,
    )?;

    // Create context for commands
    let ctx = commands::Context {
        config: client_config,
        json_output: cli.json,
        verbose: cli.verbose,
    };

    // Dispatch to command handlers
    match cli.command {
        Commands::Item(args) => items::run(args, &ctx).await,
        Commands::User(args) => users::run(args, &ctx).await,
        Commands::Feedback(args) => feedback::run(args, &ctx).await,
        Commands::Recommend(args) => recommend::run(args, &ctx).await,
        Commands::Neighbors(args) => recommend::run_neighbors(args, &ctx).await,
        Commands::Config(args) => config::run(args, &ctx).await,
    }
}
