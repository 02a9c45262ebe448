//! Retention decisioning.
//!
//! Assigns a keep/delete action to every distinct tag and, for backends
//! that support it, every untagged artifact. Decisions compose three
//! mechanisms in priority order: protection, force-keep counts, and
//! per-class age thresholds. Planning is a pure function of the snapshot:
//! running it twice yields identical decisions.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Artifact, Tag};
use crate::protect::ProtectionSet;
use crate::version::TagClass;

/// Per-class thresholds and keep counts for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetentionConfig {
    /// Maximum age in days for release-class tags (inclusive).
    pub max_release_days: u64,

    /// Maximum age in days for development-class tags (inclusive).
    pub max_dev_days: u64,

    /// Number of youngest non-protected release tags to keep regardless of age.
    pub keep_release_count: usize,

    /// Number of youngest non-protected development tags to keep regardless of age.
    pub keep_dev_count: usize,

    /// Maximum age in days for untagged artifacts, when untagged cleanup is enabled.
    pub max_untagged_days: Option<u64>,
}

impl RetentionConfig {
    /// Creates a configuration with the two required thresholds.
    #[must_use]
    pub const fn new(max_release_days: u64, max_dev_days: u64) -> Self {
        Self {
            max_release_days,
            max_dev_days,
            keep_release_count: 0,
            keep_dev_count: 0,
            max_untagged_days: None,
        }
    }

    /// Sets the per-class force-keep counts.
    #[must_use]
    pub const fn with_keep_counts(mut self, release: usize, dev: usize) -> Self {
        self.keep_release_count = release;
        self.keep_dev_count = dev;
        self
    }

    /// Enables untagged-artifact cleanup with the given threshold.
    #[must_use]
    pub const fn with_max_untagged_days(mut self, days: u64) -> Self {
        self.max_untagged_days = Some(days);
        self
    }

    const fn threshold(&self, class: &TagClass) -> u64 {
        match class {
            TagClass::Release(_) => self.max_release_days,
            TagClass::Development => self.max_dev_days,
        }
    }

    const fn keep_count(&self, release: bool) -> usize {
        if release {
            self.keep_release_count
        } else {
            self.keep_dev_count
        }
    }
}

/// Keep or delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Retain the item.
    Keep,

    /// Delete the item.
    Delete,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Keep => write!(f, "keep"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Why a tag received its action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Reason {
    /// Member of the protection set.
    Protected,

    /// Among the youngest N non-protected tags of its class.
    ForcedKeep,

    /// Age within the class threshold.
    WithinThreshold,

    /// Age exceeded the class threshold.
    Expired,
}

impl std::fmt::Display for Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Protected => write!(f, "protected"),
            Self::ForcedKeep => write!(f, "forced-keep"),
            Self::WithinThreshold => write!(f, "within-threshold"),
            Self::Expired => write!(f, "expired"),
        }
    }
}

/// The decision for one distinct tag name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionDecision {
    /// Tag name.
    pub name: String,

    /// Release or development classification.
    pub class: TagClass,

    /// Governing age in days.
    pub age_days: u64,

    /// Keep or delete.
    pub action: Action,

    /// Why.
    pub reason: Reason,
}

impl RetentionDecision {
    /// Returns true if this decision keeps the tag.
    #[must_use]
    pub fn is_keep(&self) -> bool {
        self.action == Action::Keep
    }

    /// Returns true if this tag is protected.
    #[must_use]
    pub fn is_protected(&self) -> bool {
        self.reason == Reason::Protected
    }
}

/// The decision for one untagged artifact (GHCR only).
///
/// Untagged artifacts are never protected or force-kept; only the age
/// threshold applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UntaggedDecision {
    /// Registry-assigned artifact id.
    pub id: String,

    /// Age in days.
    pub age_days: u64,

    /// Keep or delete.
    pub action: Action,
}

/// Per-class kept/deleted counts, reported even after partial failures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummary {
    /// Release tags kept.
    pub kept_release: usize,

    /// Development tags kept.
    pub kept_dev: usize,

    /// Release tags marked delete.
    pub deleted_release: usize,

    /// Development tags marked delete.
    pub deleted_dev: usize,

    /// Untagged artifacts kept.
    pub kept_untagged: usize,

    /// Untagged artifacts marked delete.
    pub deleted_untagged: usize,
}

/// The full decision set for one registry run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionPlan {
    /// One decision per distinct tag name, in fetch order.
    pub decisions: Vec<RetentionDecision>,

    /// Untagged-artifact decisions, when enabled.
    pub untagged: Vec<UntaggedDecision>,
}

impl RetentionPlan {
    /// Attaches untagged decisions to the plan.
    #[must_use]
    pub fn with_untagged(mut self, untagged: Vec<UntaggedDecision>) -> Self {
        self.untagged = untagged;
        self
    }

    /// Number of tags and untagged artifacts marked delete.
    #[must_use]
    pub fn pending_delete_count(&self) -> usize {
        self.decisions
            .iter()
            .filter(|d| d.action == Action::Delete)
            .count()
            + self
                .untagged
                .iter()
                .filter(|u| u.action == Action::Delete)
                .count()
    }

    /// Computes per-class kept/deleted counts.
    #[must_use]
    pub fn summary(&self) -> PlanSummary {
        let mut summary = PlanSummary::default();
        for decision in &self.decisions {
            match (decision.class.is_release(), decision.action) {
                (true, Action::Keep) => summary.kept_release += 1,
                (true, Action::Delete) => summary.deleted_release += 1,
                (false, Action::Keep) => summary.kept_dev += 1,
                (false, Action::Delete) => summary.deleted_dev += 1,
            }
        }
        for untagged in &self.untagged {
            match untagged.action {
                Action::Keep => summary.kept_untagged += 1,
                Action::Delete => summary.deleted_untagged += 1,
            }
        }
        summary
    }
}

/// Computes a decision for every distinct tag.
///
/// Per tag: keep when protected or force-kept, otherwise keep when its age
/// is within the class threshold (inclusive), otherwise delete. Force-keep
/// marks the youngest `keep_*_count` non-protected tags of each class; ties
/// in age break by fetch order (stable sort).
#[must_use]
pub fn plan(tags: &[Tag], protection: &ProtectionSet, config: &RetentionConfig) -> RetentionPlan {
    let forced = forced_indices(tags, protection, config);

    let decisions = tags
        .iter()
        .enumerate()
        .map(|(i, tag)| {
            let (action, reason) = if protection.contains(&tag.name) {
                (Action::Keep, Reason::Protected)
            } else if forced.contains(&i) {
                (Action::Keep, Reason::ForcedKeep)
            } else if tag.age_days <= config.threshold(&tag.class) {
                (Action::Keep, Reason::WithinThreshold)
            } else {
                (Action::Delete, Reason::Expired)
            };

            RetentionDecision {
                name: tag.name.clone(),
                class: tag.class.clone(),
                age_days: tag.age_days,
                action,
                reason,
            }
        })
        .collect();

    RetentionPlan {
        decisions,
        untagged: Vec::new(),
    }
}

/// Computes decisions for untagged artifacts: keep iff within the threshold.
#[must_use]
pub fn plan_untagged(
    artifacts: &[Artifact],
    now: DateTime<Utc>,
    max_untagged_days: u64,
) -> Vec<UntaggedDecision> {
    artifacts
        .iter()
        .filter(|artifact| artifact.is_untagged())
        .map(|artifact| {
            let age_days = artifact.age_days(now);
            let action = if age_days <= max_untagged_days {
                Action::Keep
            } else {
                Action::Delete
            };
            UntaggedDecision {
                id: artifact.id.clone(),
                age_days,
                action,
            }
        })
        .collect()
}

/// Indices of tags retained by force-keep: per class, the youngest
/// `keep_count` among all non-protected tags of that class.
fn forced_indices(
    tags: &[Tag],
    protection: &ProtectionSet,
    config: &RetentionConfig,
) -> HashSet<usize> {
    let mut forced = HashSet::new();

    for release in [true, false] {
        let count = config.keep_count(release);
        if count == 0 {
            continue;
        }

        let mut candidates: Vec<usize> = tags
            .iter()
            .enumerate()
            .filter(|(_, tag)| {
                tag.class.is_release() == release && !protection.contains(&tag.name)
            })
            .map(|(i, _)| i)
            .collect();

        // Stable: age ties keep fetch order.
        candidates.sort_by_key(|&i| tags[i].age_days);
        forced.extend(candidates.into_iter().take(count));
    }

    forced
}
