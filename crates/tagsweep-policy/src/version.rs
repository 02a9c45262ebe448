//! Version classification for registry tags.
//!
//! A tag is release-class when it matches the version grammar: optional
//! leading `v`, then `MAJOR.MINOR.PATCH`, optionally `.REVISION`, optionally
//! `-SUFFIX` where the suffix starts alphanumeric and continues with
//! alphanumerics, dots, or hyphens. Anything else is development-class
//! (branch names, PR tags, `latest`, and so on). Classification is total:
//! failing to parse is never an error.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// A release-class version parsed out of a tag name.
///
/// # Examples
///
/// ```
/// use tagsweep_policy::ParsedVersion;
///
/// let version = ParsedVersion::parse("v1.2.3").unwrap();
/// assert_eq!(version.major, 1);
/// assert_eq!(version.revision, None);
///
/// assert!(ParsedVersion::parse("feature-branch").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParsedVersion {
    /// Major version component.
    pub major: u64,

    /// Minor version component.
    pub minor: u64,

    /// Patch version component.
    pub patch: u64,

    /// Optional fourth numeric component.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<u64>,

    /// Optional pre-release suffix (the part after `-`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
}

impl ParsedVersion {
    /// Parses a tag name against the release grammar.
    ///
    /// Returns `None` for anything that is not a release tag. This is a
    /// total function: no input is an error.
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        let rest = tag.strip_prefix('v').unwrap_or(tag);

        let (numeric, suffix) = match rest.split_once('-') {
            Some((numeric, suffix)) => (numeric, Some(suffix)),
            None => (rest, None),
        };

        if let Some(suffix) = suffix {
            if !is_valid_suffix(suffix) {
                return None;
            }
        }

        let parts: Vec<&str> = numeric.split('.').collect();
        let (major, minor, patch, revision) = match parts.as_slice() {
            [major, minor, patch] => (
                parse_component(major)?,
                parse_component(minor)?,
                parse_component(patch)?,
                None,
            ),
            [major, minor, patch, revision] => (
                parse_component(major)?,
                parse_component(minor)?,
                parse_component(patch)?,
                Some(parse_component(revision)?),
            ),
            _ => return None,
        };

        Some(Self {
            major,
            minor,
            patch,
            revision,
            suffix: suffix.map(ToString::to_string),
        })
    }

    /// Returns the `major.minor` family key.
    #[must_use]
    pub const fn minor_family(&self) -> (u64, u64) {
        (self.major, self.minor)
    }

    /// Returns the `major.minor.patch` family key.
    #[must_use]
    pub const fn patch_family(&self) -> (u64, u64, u64) {
        (self.major, self.minor, self.patch)
    }
}

impl Ord for ParsedVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then_with(|| self.minor.cmp(&other.minor))
            .then_with(|| self.patch.cmp(&other.patch))
            .then_with(|| self.revision.cmp(&other.revision))
            .then_with(|| cmp_suffix(self.suffix.as_deref(), other.suffix.as_deref()))
    }
}

impl PartialOrd for ParsedVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for ParsedVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(revision) = self.revision {
            write!(f, ".{revision}")?;
        }
        if let Some(ref suffix) = self.suffix {
            write!(f, "-{suffix}")?;
        }
        Ok(())
    }
}

/// Compares suffixes: a bare release (no suffix) outranks any pre-release
/// suffix of the same numeric tuple; non-empty suffixes compare as strings.
fn cmp_suffix(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => a.cmp(b),
    }
}

/// Parses one numeric version component: a non-empty run of ASCII digits.
fn parse_component(part: &str) -> Option<u64> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

fn is_valid_suffix(suffix: &str) -> bool {
    let mut chars = suffix.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphanumeric())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
}

/// Classification of a tag name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagClass {
    /// Tag matching the release grammar, with its parsed version.
    Release(ParsedVersion),

    /// Any tag that does not match the release grammar.
    Development,
}

impl TagClass {
    /// Returns true for release-class tags.
    #[must_use]
    pub const fn is_release(&self) -> bool {
        matches!(self, Self::Release(_))
    }

    /// Returns the parsed version for release-class tags.
    #[must_use]
    pub const fn version(&self) -> Option<&ParsedVersion> {
        match self {
            Self::Release(version) => Some(version),
            Self::Development => None,
        }
    }

    /// Returns a short label for display.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Release(_) => "release",
            Self::Development => "development",
        }
    }
}

/// Classifies a tag name as release or development.
///
/// # Examples
///
/// ```
/// use tagsweep_policy::{classify, TagClass};
///
/// assert!(classify("v2.1.0").is_release());
/// assert_eq!(classify("latest"), TagClass::Development);
/// assert_eq!(classify("pr-123"), TagClass::Development);
/// ```
#[must_use]
pub fn classify(name: &str) -> TagClass {
    ParsedVersion::parse(name).map_or(TagClass::Development, TagClass::Release)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let version = ParsedVersion::parse("1.2.3").unwrap();
        assert_eq!(version.major, 1);
        assert_eq!(version.minor, 2);
        assert_eq!(version.patch, 3);
        assert_eq!(version.revision, None);
        assert_eq!(version.suffix, None);
    }

    #[test]
    fn test_parse_with_v_prefix() {
        assert_eq!(
            ParsedVersion::parse("v1.2.3"),
            ParsedVersion::parse("1.2.3")
        );
    }

    #[test]
    fn test_parse_with_revision() {
        let version = ParsedVersion::parse("1.2.3.4").unwrap();
        assert_eq!(version.revision, Some(4));
    }

    #[test]
    fn test_parse_with_suffix() {
        let version = ParsedVersion::parse("1.2.3-rc.1").unwrap();
        assert_eq!(version.suffix.as_deref(), Some("rc.1"));

        let version = ParsedVersion::parse("v1.2.3.4-beta-2").unwrap();
        assert_eq!(version.revision, Some(4));
        assert_eq!(version.suffix.as_deref(), Some("beta-2"));
    }

    #[test]
    fn test_parse_rejects_bad_suffix() {
        // Suffix must start with an alphanumeric character.
        assert!(ParsedVersion::parse("1.2.3--rc").is_none());
        assert!(ParsedVersion::parse("1.2.3-").is_none());
        assert!(ParsedVersion::parse("1.2.3-rc_1").is_none());
    }

    #[test]
    fn test_parse_rejects_non_release() {
        assert!(ParsedVersion::parse("latest").is_none());
        assert!(ParsedVersion::parse("main").is_none());
        assert!(ParsedVersion::parse("1.2").is_none());
        assert!(ParsedVersion::parse("1.2.3.4.5").is_none());
        assert!(ParsedVersion::parse("1.x.3").is_none());
        assert!(ParsedVersion::parse("").is_none());
        assert!(ParsedVersion::parse("v").is_none());
        assert!(ParsedVersion::parse("1.2.+3").is_none());
    }

    #[test]
    fn test_ordering_numeric() {
        let a = ParsedVersion::parse("1.2.3").unwrap();
        let b = ParsedVersion::parse("1.2.10").unwrap();
        assert!(b > a);

        let c = ParsedVersion::parse("2.0.0").unwrap();
        assert!(c > b);
    }

    #[test]
    fn test_ordering_revision() {
        let bare = ParsedVersion::parse("1.2.3").unwrap();
        let revised = ParsedVersion::parse("1.2.3.1").unwrap();
        assert!(revised > bare);
    }

    #[test]
    fn test_ordering_no_suffix_outranks_suffix() {
        let bare = ParsedVersion::parse("1.2.3").unwrap();
        let rc = ParsedVersion::parse("1.2.3-rc1").unwrap();
        assert!(bare > rc);

        let alpha = ParsedVersion::parse("1.2.3-alpha").unwrap();
        let beta = ParsedVersion::parse("1.2.3-beta").unwrap();
        assert!(beta > alpha);
    }

    #[test]
    fn test_family_keys() {
        let version = ParsedVersion::parse("1.2.5").unwrap();
        assert_eq!(version.minor_family(), (1, 2));
        assert_eq!(version.patch_family(), (1, 2, 5));
    }

    #[test]
    fn test_display_round_trip() {
        for tag in ["1.2.3", "1.2.3.4", "1.2.3-rc.1", "1.2.3.4-beta"] {
            let version = ParsedVersion::parse(tag).unwrap();
            assert_eq!(version.to_string(), tag);
        }
    }

    #[test]
    fn test_classify() {
        assert!(classify("v2.1.0").is_release());
        assert!(classify("2.1.0.7-hotfix").is_release());
        assert_eq!(classify("latest"), TagClass::Development);
        assert_eq!(classify("pr-123"), TagClass::Development);
        assert_eq!(classify("feature-old"), TagClass::Development);
    }

    #[test]
    fn test_class_label() {
        assert_eq!(classify("v1.0.0").label(), "release");
        assert_eq!(classify("main").label(), "development");
    }
}
