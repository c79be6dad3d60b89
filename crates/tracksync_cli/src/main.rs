//! Tracksync CLI - worker process for the ad-tracking event mirror.

mod commands;
mod config;
mod shutdown;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tracksync")]
#[command(version)]
#[command(about = "Mirror tracker events (visits, clicks, conversions) into a local database")]
#[command(
    long_about = "Tracksync incrementally mirrors advertising-tracking events from a remote \
tracker's report API into a local relational store. Syncs are cursor-tracked \
and idempotent, so the worker can be restarted or re-run at any point without \
duplicating data."
)]
#[command(after_long_help = r#"EXAMPLES
    Run one sync cycle and exit (non-zero exit on failure):
        $ tracksync run --once

    Run continuously, syncing every 5 minutes:
        $ tracksync run

    Only sync campaigns whose name contains a substring:
        $ tracksync run --campaign-filter "Mobile"

    Backfill the last 30 days of conversions in 7-day chunks:
        $ tracksync backfill --days 30

    Apply database migrations:
        $ tracksync migrate up

CONFIGURATION
    Tracksync reads configuration from:
      1. ~/.config/tracksync/config.toml (or $XDG_CONFIG_HOME/tracksync/config.toml)
      2. ./tracksync.toml
      3. Environment variables (TRACKSYNC_* prefix)
      4. .env file in current directory

ENVIRONMENT VARIABLES
    TRACKSYNC_DATABASE_URL   Database connection string
                             (default: ~/.local/state/tracksync/tracksync.db)
    TRACKSYNC_BASE_URL       Tracker API host (default: https://api.voluum.com)
    TRACKSYNC_ACCESS_ID      Tracker access id for the credential exchange
    TRACKSYNC_ACCESS_KEY     Tracker access key for the credential exchange
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
    /// Run the sync worker (continuously, or once with --once)
    Run {
        #[command(flatten)]
        opts: RunOptions,
    },
    /// Backfill historical conversions in date chunks
    Backfill {
        /// Days of history to backfill (default from config or 30)
        #[arg(short, long)]
        days: Option<u32>,

        /// Width of each chunk in days (default from config or 7)
        #[arg(short = 'c', long)]
        chunk_days: Option<u32>,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum MigrateAction {
    /// Apply all pending migrations
    Up,
    /// Rollback the last migration
    Down,
    /// Show migration status
    Status,
    /// Fresh install - drop all tables and reapply migrations
    Fresh,
}

/// Options for the `run` command.
#[derive(Debug, Clone, clap::Args)]
struct RunOptions {
    /// Run one sync cycle and exit
    #[arg(long)]
    once: bool,

    /// Minutes between cycles in continuous mode (default from config or 5)
    #[arg(short = 'i', long)]
    interval_minutes: Option<u64>,

    /// Days of recent data to sync when no cursor exists (default from config or 1)
    #[arg(short = 'd', long)]
    days_back: Option<i64>,

    /// Only sync campaigns whose name contains this substring
    #[arg(short = 'f', long)]
    campaign_filter: Option<String>,

    /// Abort a cycle on the first failed campaign instead of skipping it
    #[arg(long)]
    abort_on_campaign_error: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    shutdown::setup_shutdown_handler();

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new("tracksync=info,tracksync_cli=info"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let config = config::Config::load();

    let cli = Cli::parse();

    // Completions don't need database access.
    if let Commands::Completions { shell } = &cli.command {
        commands::meta::handle_completions(*shell)?;
        return Ok(());
    }

    let database_url = config
        .database_url()
        .expect("Failed to determine database URL - this should not happen");

    // Ensure the database directory exists for SQLite.
    if database_url.starts_with("sqlite://") {
        let db_path = database_url.trim_start_matches("sqlite://");
        // Strip query parameters (e.g., ?mode=rwc) before path operations.
        let db_path = db_path.split('?').next().unwrap_or(db_path);
        let db_path = std::path::Path::new(db_path);

        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
    }

    match cli.command {
        Commands::Migrate { action } => {
            commands::migrate::handle_migrate(action, &database_url).await?;
        }
        Commands::Run { opts } => {
            commands::run::handle_run(opts, &config, &database_url).await?;
        }
        Commands::Backfill { days, chunk_days } => {
            commands::backfill::handle_backfill(days, chunk_days, &config, &database_url).await?;
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}
