//! GHCR cleanup command.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use tagsweep_policy::{collect_tags, plan, plan_untagged, ProtectionSet};
use tagsweep_registry::{version_targets, GhcrClient, GhcrConfig, OwnerType};

use super::common::{self, RetentionArgs};

/// Arguments for the ghcr command.
#[derive(Args, Debug)]
pub struct GhcrArgs {
    /// Package owner (user or organization name)
    #[arg(long)]
    pub owner: String,

    /// Owner type: user or org
    #[arg(long, default_value = "user")]
    pub owner_type: OwnerType,

    /// Container package name
    #[arg(long)]
    pub package: String,

    /// Token with read:packages and delete:packages scopes
    #[arg(long, env = "TAGSWEEP_GHCR_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Also clean up untagged package versions
    #[arg(long, requires = "max_untagged_days")]
    pub include_untagged: bool,

    /// Maximum age in days for untagged versions (inclusive)
    #[arg(long, requires = "include_untagged")]
    pub max_untagged_days: Option<u64>,

    #[command(flatten)]
    pub retention: RetentionArgs,
}

/// Executes the ghcr command.
pub async fn run(args: GhcrArgs) -> Result<()> {
    let config = GhcrConfig::new(
        &args.owner,
        args.owner_type,
        &args.package,
        &args.token,
    );
    let client = GhcrClient::new(config).context("failed to create GHCR client")?;

    tracing::info!(
        owner = %args.owner,
        package = %args.package,
        "fetching GHCR package versions"
    );
    let artifacts = client.list_artifacts().await;
    let now = Utc::now();

    let tags = collect_tags(&artifacts, now);
    let protection = ProtectionSet::compute(
        &tags,
        &args.retention.protect,
        args.retention.protect_scope,
    );

    let mut config = args.retention.retention_config();
    if args.include_untagged {
        let days = args
            .max_untagged_days
            .context("--include-untagged requires --max-untagged-days")?;
        config = config.with_max_untagged_days(days);
    }

    let mut decision_plan = plan(&tags, &protection, &config);
    if let Some(days) = config.max_untagged_days {
        decision_plan = decision_plan.with_untagged(plan_untagged(&artifacts, now, days));
    }

    let targets = version_targets(&decision_plan, &artifacts);
    common::finish(&client, &decision_plan, targets, &args.retention).await
}
