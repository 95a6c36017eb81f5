//! Command line driver for the restriction cache.
//!
//! Replays a snapshot against a catalog with logging appliers and prints
//! what every aspect resolves to.
mod commands;
mod document;

use anyhow::Result;
use clap::Parser;
use commands::{Replay, Validate};

/// Restriction cache tools
#[derive(Parser)]
#[command(name = "cache-cli")]
#[command(about = "Restriction cache snapshot tools", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Sync a snapshot into a fresh cache and print the resolved state
    Replay(Replay),

    /// Check that every snapshot entry resolves against the catalog
    Validate(Validate),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (for CACHE_COMMAND_BUFFER and RUST_LOG)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Replay(cmd) => cmd.execute().await,
        Command::Validate(cmd) => cmd.execute(),
    }
}
