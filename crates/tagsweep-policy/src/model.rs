//! Normalized snapshot model shared by all registry backends.
//!
//! Adapters translate native API shapes (GHCR multi-tag versions, Docker Hub
//! one-tag-per-entry listings) into [`Artifact`] rows. The policy engine only
//! ever sees this model, so the retention logic exists exactly once.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::version::{classify, TagClass};

/// One stored unit in a registry, as fetched in the point-in-time snapshot.
///
/// Snapshots are read-only: decisions are computed into parallel structures,
/// never written back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// Opaque registry-assigned identifier.
    pub id: String,

    /// Creation or last-update timestamp, whichever the backend reports.
    pub created_at: DateTime<Utc>,

    /// Tags carried by this artifact. Empty for GHCR untagged versions;
    /// exactly one entry for Docker Hub.
    pub tags: Vec<String>,
}

impl Artifact {
    /// Creates an artifact with no tags.
    #[must_use]
    pub fn new(id: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            created_at,
            tags: Vec::new(),
        }
    }

    /// Sets the tags carried by this artifact.
    #[must_use]
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Returns true if this artifact carries no tags.
    #[must_use]
    pub fn is_untagged(&self) -> bool {
        self.tags.is_empty()
    }

    /// Age in whole days relative to `now`. Future timestamps clamp to 0.
    #[must_use]
    pub fn age_days(&self, now: DateTime<Utc>) -> u64 {
        let days = (now - self.created_at).num_days();
        u64::try_from(days).unwrap_or(0)
    }
}

/// A distinct tag name observed across one or more artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag name.
    pub name: String,

    /// Minimum age among artifacts carrying this name: a tag can appear on
    /// multiple pushes and the youngest instance governs.
    pub age_days: u64,

    /// Release or development classification.
    pub class: TagClass,
}

impl Tag {
    /// Creates a tag, classifying the name.
    #[must_use]
    pub fn new(name: impl Into<String>, age_days: u64) -> Self {
        let name = name.into();
        let class = classify(&name);
        Self {
            name,
            age_days,
            class,
        }
    }
}

/// Collects the deduplicated tag list out of an artifact snapshot.
///
/// Exactly one [`Tag`] is produced per distinct name; duplicates keep the
/// minimum age. First-seen order is preserved so later stable sorts break
/// age ties by fetch order.
#[must_use]
pub fn collect_tags(artifacts: &[Artifact], now: DateTime<Utc>) -> Vec<Tag> {
    let mut tags: Vec<Tag> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for artifact in artifacts {
        let age_days = artifact.age_days(now);
        for name in &artifact.tags {
            match index.get(name) {
                Some(&i) => {
                    if age_days < tags[i].age_days {
                        tags[i].age_days = age_days;
                    }
                }
                None => {
                    index.insert(name.clone(), tags.len());
                    tags.push(Tag::new(name.clone(), age_days));
                }
            }
        }
    }

    tags
}
