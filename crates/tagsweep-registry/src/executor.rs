//! Deletion execution.
//!
//! Turns a retention plan into an ordered list of registry-native delete
//! targets and issues them sequentially: bounded by an optional global
//! delete cap, retried per item on 429/5xx, and isolated per item so one
//! failure never aborts the rest of the run. Dry runs perform no network
//! calls at all.

use async_trait::async_trait;
use serde::Serialize;
use tagsweep_policy::{report, Action, Artifact, RetentionPlan};

use crate::error::Result;
use crate::retry::RetryPolicy;

/// One registry-native delete operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    /// Delete a tag by name (Docker Hub).
    Tag {
        /// Tag name.
        name: String,
    },

    /// Delete an artifact version by id (GHCR).
    Version {
        /// Registry-assigned version id.
        id: String,
        /// Human-readable description for logs, e.g. the carried tags.
        label: String,
    },
}

impl std::fmt::Display for DeleteTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tag { name } => write!(f, "tag '{name}'"),
            Self::Version { id, label } => write!(f, "version {id} ({label})"),
        }
    }
}

/// A backend able to execute delete targets.
#[async_trait]
pub trait RegistryBackend: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Issues one delete call.
    async fn delete(&self, target: &DeleteTarget) -> Result<()>;
}

/// Builds tag-name delete targets in presentation order (Docker Hub).
#[must_use]
pub fn tag_targets(plan: &RetentionPlan) -> Vec<DeleteTarget> {
    report::ordered(plan)
        .into_iter()
        .filter(|decision| decision.action == Action::Delete)
        .map(|decision| DeleteTarget::Tag {
            name: decision.name.clone(),
        })
        .collect()
}

/// Builds version-id delete targets in presentation order (GHCR).
///
/// A version whose every tag was decided `delete` is deleted once. A version
/// that also carries a kept tag is skipped with a warning: deleting it would
/// take the kept tag with it, and protected tags must never be deleted as a
/// side effect. Untagged delete decisions follow the tagged ones.
#[must_use]
pub fn version_targets(plan: &RetentionPlan, artifacts: &[Artifact]) -> Vec<DeleteTarget> {
    let kept: Vec<&str> = plan
        .decisions
        .iter()
        .filter(|d| d.action == Action::Keep)
        .map(|d| d.name.as_str())
        .collect();

    let mut targets = Vec::new();
    let mut seen: Vec<&str> = Vec::new();

    for decision in report::ordered(plan) {
        if decision.action != Action::Delete {
            continue;
        }
        for artifact in artifacts.iter().filter(|a| a.tags.contains(&decision.name)) {
            if seen.contains(&artifact.id.as_str()) {
                continue;
            }
            if let Some(kept_tag) = artifact.tags.iter().find(|t| kept.contains(&t.as_str())) {
                tracing::warn!(
                    id = %artifact.id,
                    tag = %decision.name,
                    kept_tag = %kept_tag,
                    "skipping version: it also carries a kept tag"
                );
                seen.push(artifact.id.as_str());
                continue;
            }
            seen.push(artifact.id.as_str());
            targets.push(DeleteTarget::Version {
                id: artifact.id.clone(),
                label: artifact.tags.join(","),
            });
        }
    }

    for untagged in report::ordered_untagged(plan) {
        if untagged.action == Action::Delete {
            targets.push(DeleteTarget::Version {
                id: untagged.id.clone(),
                label: "untagged".to_string(),
            });
        }
    }

    targets
}

/// Execution settings for one run.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// When set, no network calls are made.
    pub dry_run: bool,

    /// Global cap on delete calls per run; the remainder is skipped and
    /// becomes eligible again next run.
    pub delete_limit: Option<usize>,

    /// Per-item retry policy.
    pub retry: RetryPolicy,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            dry_run: true,
            delete_limit: None,
            retry: RetryPolicy::default(),
        }
    }
}

/// Outcome counts for one execution run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExecutionReport {
    /// Targets deleted successfully.
    pub deleted: usize,

    /// Targets whose delete call failed after retries.
    pub failed: usize,

    /// Targets skipped by dry-run or the delete cap.
    pub skipped: usize,
}

impl ExecutionReport {
    /// True if any delete failed; the run exits non-zero in that case even
    /// though individual failures never abort the loop.
    #[must_use]
    pub const fn any_failed(&self) -> bool {
        self.failed > 0
    }
}

/// Executes delete targets sequentially in the given order.
pub async fn execute<B: RegistryBackend + ?Sized>(
    backend: &B,
    targets: &[DeleteTarget],
    config: &ExecutorConfig,
) -> ExecutionReport {
    let mut report = ExecutionReport::default();

    if config.dry_run {
        tracing::info!(
            registry = backend.name(),
            pending = targets.len(),
            "dry run: no delete calls issued"
        );
        report.skipped = targets.len();
        return report;
    }

    for (index, target) in targets.iter().enumerate() {
        if let Some(limit) = config.delete_limit {
            if report.deleted + report.failed >= limit {
                report.skipped = targets.len() - index;
                tracing::warn!(
                    registry = backend.name(),
                    limit,
                    skipped = report.skipped,
                    "delete limit reached; remaining targets are eligible next run"
                );
                break;
            }
        }

        match config.retry.run(|| backend.delete(target)).await {
            Ok(()) => {
                report.deleted += 1;
                tracing::info!(registry = backend.name(), %target, "deleted");
            }
            Err(err) => {
                report.failed += 1;
                tracing::error!(
                    registry = backend.name(),
                    %target,
                    error = %err,
                    "delete failed; continuing with remaining targets"
                );
            }
        }
    }

    report
}
