//! Shared retention arguments and the run pipeline both registries use.

use std::io::Write as _;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use tagsweep_policy::{report, ProtectScope, RetentionConfig, RetentionPlan};
use tagsweep_registry::{execute, DeleteTarget, ExecutorConfig, RegistryBackend, RetryPolicy};

/// Retention policy flags shared by every registry subcommand.
#[derive(Args, Debug)]
pub struct RetentionArgs {
    /// Maximum age in days for release tags (inclusive)
    #[arg(long)]
    pub max_release_days: u64,

    /// Maximum age in days for development tags (inclusive)
    #[arg(long)]
    pub max_dev_days: u64,

    /// Tag names that are never deleted (comma-separated)
    #[arg(long, value_delimiter = ',', default_value = "latest")]
    pub protect: Vec<String>,

    /// Protect the newest tag of each version family: minor or patch
    #[arg(long, num_args = 0..=1, default_missing_value = "patch", value_name = "SCOPE")]
    pub protect_scope: Option<ProtectScope>,

    /// Keep the youngest N non-protected release tags regardless of age
    #[arg(long, default_value_t = 0)]
    pub keep_release_count: usize,

    /// Keep the youngest N non-protected development tags regardless of age
    #[arg(long, default_value_t = 0)]
    pub keep_dev_count: usize,

    /// Cap on delete calls per run; the remainder is retried next run
    #[arg(long)]
    pub delete_limit: Option<usize>,

    /// Actually delete; the default is a dry run
    #[arg(long)]
    pub execute: bool,

    /// Skip the interactive confirmation prompt
    #[arg(long)]
    pub yes: bool,

    /// Write the ordered plan as tab-separated rows
    #[arg(long, value_name = "PATH")]
    pub plan_file: Option<PathBuf>,

    /// Write the full decision set as JSON
    #[arg(long, value_name = "PATH")]
    pub decisions_file: Option<PathBuf>,
}

impl RetentionArgs {
    /// Builds the engine configuration from the flags.
    #[must_use]
    pub fn retention_config(&self) -> RetentionConfig {
        RetentionConfig::new(self.max_release_days, self.max_dev_days)
            .with_keep_counts(self.keep_release_count, self.keep_dev_count)
    }
}

/// Prints the plan, writes report files, and - unless this is a dry run -
/// confirms and executes the deletions. Fails the run if the confirmation
/// is declined or any delete failed.
pub async fn finish<B: RegistryBackend>(
    backend: &B,
    plan: &RetentionPlan,
    targets: Vec<DeleteTarget>,
    args: &RetentionArgs,
) -> Result<()> {
    print!("{}", report::render_plan(plan));

    let summary = plan.summary();
    println!(
        "\nkept: {} release, {} development; delete: {} release, {} development",
        summary.kept_release, summary.kept_dev, summary.deleted_release, summary.deleted_dev
    );
    if !plan.untagged.is_empty() {
        println!(
            "untagged: {} kept, {} to delete",
            summary.kept_untagged, summary.deleted_untagged
        );
    }

    write_reports(plan, args)?;

    if !args.execute {
        println!("\ndry run: no deletions performed ({} pending)", targets.len());
        return Ok(());
    }

    if targets.is_empty() {
        println!("\nnothing to delete");
        return Ok(());
    }

    if !args.yes && !confirm(targets.len())? {
        bail!("aborted: deletion not confirmed");
    }

    let config = ExecutorConfig {
        dry_run: false,
        delete_limit: args.delete_limit,
        retry: RetryPolicy::default(),
    };
    let result = execute(backend, &targets, &config).await;

    println!(
        "\ndeleted {} item(s), {} failed, {} skipped",
        result.deleted, result.failed, result.skipped
    );

    if result.any_failed() {
        bail!("{} delete call(s) failed", result.failed);
    }

    Ok(())
}

fn write_reports(plan: &RetentionPlan, args: &RetentionArgs) -> Result<()> {
    if let Some(ref path) = args.plan_file {
        std::fs::write(path, report::render_tsv(plan))
            .with_context(|| format!("failed to write plan file {}", path.display()))?;
        tracing::info!(path = %path.display(), "wrote plan file");
    }

    if let Some(ref path) = args.decisions_file {
        let json = serde_json::to_string_pretty(plan).context("failed to serialize decisions")?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write decisions file {}", path.display()))?;
        tracing::info!(path = %path.display(), "wrote decisions file");
    }

    Ok(())
}

fn confirm(pending: usize) -> Result<bool> {
    print!("\ndelete {pending} item(s)? [y/N] ");
    std::io::stdout().flush().context("failed to flush stdout")?;

    let mut answer = String::new();
    std::io::stdin()
        .read_line(&mut answer)
        .context("failed to read confirmation")?;

    let answer = answer.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tagsweep_policy::{plan, ProtectionSet, Tag};

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        retention: RetentionArgs,
    }

    fn parse(args: &[&str]) -> RetentionArgs {
        let mut argv = vec!["test"];
        argv.extend_from_slice(args);
        TestCli::parse_from(argv).retention
    }

    #[test]
    fn test_required_thresholds() {
        let args = parse(&["--max-release-days", "90", "--max-dev-days", "60"]);
        let config = args.retention_config();
        assert_eq!(config.max_release_days, 90);
        assert_eq!(config.max_dev_days, 60);
        assert_eq!(config.keep_release_count, 0);

        assert!(TestCli::try_parse_from(["test", "--max-release-days", "90"]).is_err());
    }

    #[test]
    fn test_protect_defaults_to_latest() {
        let args = parse(&["--max-release-days", "90", "--max-dev-days", "60"]);
        assert_eq!(args.protect, vec!["latest"]);
    }

    #[test]
    fn test_protect_list_splits_on_commas() {
        let args = parse(&[
            "--max-release-days",
            "90",
            "--max-dev-days",
            "60",
            "--protect",
            "latest,stable,edge",
        ]);
        assert_eq!(args.protect, vec!["latest", "stable", "edge"]);
    }

    #[test]
    fn test_protect_scope_bare_defaults_to_patch() {
        let args = parse(&[
            "--max-release-days",
            "90",
            "--max-dev-days",
            "60",
            "--protect-scope",
        ]);
        assert_eq!(args.protect_scope, Some(ProtectScope::Patch));

        let args = parse(&[
            "--max-release-days",
            "90",
            "--max-dev-days",
            "60",
            "--protect-scope",
            "minor",
        ]);
        assert_eq!(args.protect_scope, Some(ProtectScope::Minor));
    }

    #[test]
    fn test_write_reports_to_files() {
        let dir = tempfile::tempdir().unwrap();
        let plan_path = dir.path().join("plan.tsv");
        let decisions_path = dir.path().join("decisions.json");

        let mut args = parse(&["--max-release-days", "90", "--max-dev-days", "60"]);
        args.plan_file = Some(plan_path.clone());
        args.decisions_file = Some(decisions_path.clone());

        let tags = vec![Tag::new("v1.0.0", 10)];
        let plan = plan(
            &tags,
            &ProtectionSet::default(),
            &RetentionConfig::new(90, 60),
        );
        write_reports(&plan, &args).unwrap();

        let tsv = std::fs::read_to_string(&plan_path).unwrap();
        assert!(tsv.starts_with("tag\tclass"));

        let json = std::fs::read_to_string(&decisions_path).unwrap();
        assert!(json.contains("\"v1.0.0\""));
    }
}
