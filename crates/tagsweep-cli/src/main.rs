//! Tagsweep CLI - declarative retention cleanup for container registries.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tagsweep=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ghcr(args) => commands::ghcr::run(args).await,
        Commands::Dockerhub(args) => commands::dockerhub::run(args).await,
        Commands::Version => {
            println!("tagsweep {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
