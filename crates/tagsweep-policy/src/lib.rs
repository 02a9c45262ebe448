//! # Tagsweep Policy
//!
//! Tag retention policy engine for container-registry housekeeping.
//!
//! This crate decides, for a snapshot of registry artifacts, which tags and
//! untagged artifacts to retain and which to delete, under a declarative
//! policy combining age thresholds, protection rules, and minimum-keep
//! counts. It is pure: registry adapters feed it normalized [`Artifact`]
//! rows and turn its decisions into native delete calls.
//!
//! Data flows one way through the components:
//!
//! ```text
//! artifact snapshot → classify → protect → decide → order/render
//! ```
//!
//! ## Example
//!
//! ```rust
//! use tagsweep_policy::{plan, ProtectionSet, RetentionConfig, Tag};
//!
//! let tags = vec![
//!     Tag::new("latest", 0),
//!     Tag::new("v2.1.0", 45),
//!     Tag::new("feature-old", 120),
//! ];
//! let protection = ProtectionSet::compute(&tags, &["latest".to_string()], None);
//! let config = RetentionConfig::new(90, 60);
//!
//! let plan = plan(&tags, &protection, &config);
//! assert_eq!(plan.pending_delete_count(), 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod engine;
pub mod error;
pub mod model;
pub mod protect;
pub mod report;
pub mod version;


pub use engine::{
    plan, plan_untagged, Action, PlanSummary, Reason, RetentionConfig, RetentionDecision,
    RetentionPlan, UntaggedDecision,
};
pub use error::PolicyError;
pub use model::{collect_tags, Artifact, Tag};
pub use protect::{ProtectScope, ProtectionSet};
pub use version::{classify, ParsedVersion, TagClass};
