//! Protection-set computation.
//!
//! Three independent mechanisms feed the protected set: the explicit
//! protect list (case-sensitive exact names), the single highest release
//! version overall, and optionally one "head" tag per minor or patch
//! version family. A protected tag is never deleted regardless of age.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use crate::error::PolicyError;
use crate::model::Tag;
use crate::version::ParsedVersion;

/// Version-family granularity for per-scope head protection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtectScope {
    /// One protected head per `major.minor` family.
    Minor,

    /// One protected head per `major.minor.patch` family.
    Patch,
}

impl ProtectScope {
    /// Default scope when protection is enabled without an explicit value.
    pub const DEFAULT: Self = Self::Patch;
}

impl FromStr for ProtectScope {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "minor" => Ok(Self::Minor),
            "patch" => Ok(Self::Patch),
            other => Err(PolicyError::InvalidScope {
                value: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for ProtectScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Minor => write!(f, "minor"),
            Self::Patch => write!(f, "patch"),
        }
    }
}

/// The set of tag names that must never be deleted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtectionSet {
    names: BTreeSet<String>,
}

impl ProtectionSet {
    /// Computes the protected set from the explicit list, the highest
    /// release overall, and optional per-family heads.
    ///
    /// `latest` carries no special meaning here: it is protected only when
    /// present in the explicit list.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagsweep_policy::{collect_tags, ProtectionSet, Tag};
    ///
    /// let tags = vec![
    ///     Tag::new("v2.1.0", 45),
    ///     Tag::new("v2.0.1", 60),
    ///     Tag::new("pr-123", 40),
    /// ];
    /// let protection = ProtectionSet::compute(&tags, &["latest".to_string()], None);
    /// assert!(protection.contains("v2.1.0"));
    /// assert!(protection.contains("latest"));
    /// assert!(!protection.contains("pr-123"));
    /// ```
    #[must_use]
    pub fn compute(tags: &[Tag], explicit: &[String], scope: Option<ProtectScope>) -> Self {
        let mut names: BTreeSet<String> = explicit.iter().cloned().collect();

        let releases: Vec<(&Tag, &ParsedVersion)> = tags
            .iter()
            .filter_map(|tag| tag.class.version().map(|version| (tag, version)))
            .collect();

        if releases.is_empty() {
            tracing::info!("no release tags in snapshot; skipping highest-version protection");
            return Self { names };
        }

        if let Some((top, _)) = releases.iter().copied().max_by(|a, b| prefer(a, b)) {
            names.insert(top.name.clone());
        }

        match scope {
            Some(ProtectScope::Minor) => {
                let mut families: BTreeMap<(u64, u64), Vec<(&Tag, &ParsedVersion)>> =
                    BTreeMap::new();
                for &(tag, version) in &releases {
                    families
                        .entry(version.minor_family())
                        .or_default()
                        .push((tag, version));
                }
                insert_heads(&mut names, families.values());
            }
            Some(ProtectScope::Patch) => {
                let mut families: BTreeMap<(u64, u64, u64), Vec<(&Tag, &ParsedVersion)>> =
                    BTreeMap::new();
                for &(tag, version) in &releases {
                    families
                        .entry(version.patch_family())
                        .or_default()
                        .push((tag, version));
                }
                insert_heads(&mut names, families.values());
            }
            None => {}
        }

        Self { names }
    }

    /// Returns true if the given tag name is protected.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Iterates protected names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Number of protected names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if nothing is protected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Orders two release tags: version tuple first, identical tuples broken by
/// younger age (the more recently pushed spelling wins).
fn prefer(a: &(&Tag, &ParsedVersion), b: &(&Tag, &ParsedVersion)) -> Ordering {
    a.1.cmp(b.1).then_with(|| b.0.age_days.cmp(&a.0.age_days))
}

/// Within each version family, all grouped fields compare equal, so the full
/// version ordering reduces to the fields below the grouping level.
fn insert_heads<'a, I>(names: &mut BTreeSet<String>, families: I)
where
    I: Iterator<Item = &'a Vec<(&'a Tag, &'a ParsedVersion)>>,
{
    for family in families {
        if let Some((head, _)) = family.iter().copied().max_by(|a, b| prefer(a, b)) {
            names.insert(head.name.clone());
        }
    }
}
