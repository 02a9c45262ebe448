//! Docker Hub cleanup command.

use anyhow::Result;
use chrono::Utc;
use clap::Args;
use tagsweep_policy::{collect_tags, plan, ProtectionSet};
use tagsweep_registry::{tag_targets, DockerHubClient, DockerHubConfig, RegistryError};

use super::common::{self, RetentionArgs};

/// Arguments for the dockerhub command.
#[derive(Args, Debug)]
pub struct DockerHubArgs {
    /// Repository namespace (user or organization)
    #[arg(long)]
    pub namespace: String,

    /// Repository name
    #[arg(long)]
    pub repository: String,

    /// Docker Hub username
    #[arg(long, env = "TAGSWEEP_HUB_USERNAME")]
    pub username: String,

    /// Docker Hub password or personal access token
    #[arg(long, env = "TAGSWEEP_HUB_PASSWORD", hide_env_values = true)]
    pub password: String,

    #[command(flatten)]
    pub retention: RetentionArgs,
}

/// Executes the dockerhub command.
///
/// A failed login skips this registry's cleanup for the run rather than
/// failing it: the exit status stays zero because no delete call failed.
pub async fn run(args: DockerHubArgs) -> Result<()> {
    let config = DockerHubConfig::new(
        &args.namespace,
        &args.repository,
        &args.username,
        &args.password,
    );

    let client = match DockerHubClient::login(config).await {
        Ok(client) => client,
        Err(err @ RegistryError::LoginFailed { .. }) => {
            tracing::error!(error = %err, "skipping docker hub cleanup for this run");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    tracing::info!(
        namespace = %args.namespace,
        repository = %args.repository,
        "fetching docker hub tags"
    );
    let artifacts = client.list_artifacts().await;
    let now = Utc::now();

    let tags = collect_tags(&artifacts, now);
    let protection = ProtectionSet::compute(
        &tags,
        &args.retention.protect,
        args.retention.protect_scope,
    );

    let decision_plan = plan(&tags, &protection, &args.retention.retention_config());
    let targets = tag_targets(&decision_plan);
    common::finish(&client, &decision_plan, targets, &args.retention).await
}
