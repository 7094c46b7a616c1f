//! booksync: CRM → SARAS booking synchronisation.
//!
//! # Usage
//!
//! ```text
//! booksync [--config <path>] run [--json]
//! booksync [--config <path>] daemon [--interval-secs <n>]
//! booksync [--config <path>] config
//! ```

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use booksync_core::AppConfig;
use commands::{config::ConfigArgs, daemon::DaemonArgs, run::RunArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "booksync",
    version,
    about = "Synchronise test bookings from the CRM to SARAS",
    long_about = None,
)]
struct Cli {
    /// YAML configuration file (falls back to `BOOKSYNC_CONFIG`). Environment
    /// variables override its values.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one sync and exit non-zero if it aborts.
    Run(RunArgs),

    /// Run a sync on a fixed interval until Ctrl-C.
    Daemon(DaemonArgs),

    /// Print the resolved configuration with secrets redacted.
    Config(ConfigArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Commands::Run(args) => args.run(&config),
        Commands::Daemon(args) => args.run(config),
        Commands::Config(args) => args.run(&config),
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<AppConfig> {
    match path {
        Some(path) => AppConfig::resolve(Some(path))
            .with_context(|| format!("failed to load configuration from {}", path.display())),
        None => AppConfig::resolve(None).context("failed to resolve configuration"),
    }
}
