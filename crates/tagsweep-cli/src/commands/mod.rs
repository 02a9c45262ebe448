//! CLI commands and argument parsing.

pub mod common;
pub mod dockerhub;
pub mod ghcr;

use clap::{Parser, Subcommand};

/// Tagsweep - retention cleanup for container registries
#[derive(Parser)]
#[command(name = "tagsweep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Clean up a GitHub Container Registry package
    Ghcr(ghcr::GhcrArgs),

    /// Clean up a Docker Hub repository
    Dockerhub(dockerhub::DockerHubArgs),

    /// Print version information
    Version,
}
