//! # Tagsweep Registry
//!
//! Registry adapters and deletion executor for tagsweep.
//!
//! Two backends with different data shapes normalize into the shared
//! snapshot model of `tagsweep-policy`:
//!
//! - **GHCR**: multi-tag package versions, deleted by version id, with
//!   optional untagged-version cleanup.
//! - **Docker Hub**: one tag per listing row, deleted by tag name after a
//!   login call that yields a bearer token.
//!
//! The executor issues delete calls sequentially in the plan's presentation
//! order, retrying 429/5xx with exponential backoff, isolating per-item
//! failures, and honoring a global per-run delete cap.
//!
//! ```rust,no_run
//! use tagsweep_registry::{DockerHubClient, DockerHubConfig};
//!
//! # async fn run() -> Result<(), tagsweep_registry::RegistryError> {
//! let config = DockerHubConfig::new("acme", "api-server", "bot", "secret");
//! let client = DockerHubClient::login(config).await?;
//! let artifacts = client.list_artifacts().await;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod dockerhub;
mod error;
mod executor;
mod ghcr;
mod retry;

pub use config::{DockerHubConfig, GhcrConfig, OwnerType};
pub use dockerhub::DockerHubClient;
pub use error::{RegistryError, Result};
pub use executor::{
    execute, tag_targets, version_targets, DeleteTarget, ExecutionReport, ExecutorConfig,
    RegistryBackend,
};
pub use ghcr::GhcrClient;
pub use retry::RetryPolicy;
