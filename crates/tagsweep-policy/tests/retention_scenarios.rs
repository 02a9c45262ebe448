//! End-to-end retention scenarios through the full policy pipeline:
//! snapshot → tag collection → protection → decisions → presentation.

use chrono::{Duration, Utc};
use tagsweep_policy::{
    collect_tags, plan, report, Action, Artifact, ProtectScope, ProtectionSet, Reason,
    RetentionConfig,
};

fn snapshot(entries: &[(&str, i64, &[&str])]) -> Vec<Artifact> {
    let now = Utc::now();
    entries
        .iter()
        .map(|&(id, age_days, tags)| {
            Artifact::new(id, now - Duration::days(age_days))
                .with_tags(tags.iter().map(ToString::to_string).collect())
        })
        .collect()
}

#[test]
fn scenario_age_thresholds_with_default_protection() {
    // latest(0d), v2.1.0(45d), v2.0.1(60d), v1.5.0(95d), feature-old(120d),
    // pr-123(40d) under maxReleaseDays=90, maxDevDays=60.
    let artifacts = snapshot(&[
        ("1", 0, &["latest"]),
        ("2", 45, &["v2.1.0"]),
        ("3", 60, &["v2.0.1"]),
        ("4", 95, &["v1.5.0"]),
        ("5", 120, &["feature-old"]),
        ("6", 40, &["pr-123"]),
    ]);

    let now = Utc::now();
    let tags = collect_tags(&artifacts, now);
    let protection = ProtectionSet::compute(&tags, &["latest".to_string()], None);
    let plan = plan(&tags, &protection, &RetentionConfig::new(90, 60));

    let action = |name: &str| {
        plan.decisions
            .iter()
            .find(|d| d.name == name)
            .map(|d| d.action)
            .unwrap()
    };

    assert_eq!(action("latest"), Action::Keep);
    assert_eq!(action("v2.1.0"), Action::Keep); // highest overall, protected
    assert_eq!(action("v2.0.1"), Action::Keep); // 60 <= 90
    assert_eq!(action("v1.5.0"), Action::Delete);
    assert_eq!(action("feature-old"), Action::Delete);
    assert_eq!(action("pr-123"), Action::Keep); // 40 <= 60

    let summary = plan.summary();
    assert_eq!(summary.kept_release, 2);
    assert_eq!(summary.deleted_release, 1);
    assert_eq!(summary.kept_dev, 2);
    assert_eq!(summary.deleted_dev, 1);
}

#[test]
fn scenario_minor_scope_protects_family_heads() {
    // 1.2.3(10d), 1.2.5(5d), 1.3.0(1d) with scope=minor: heads are 1.2.5
    // and 1.3.0; 1.2.3 is neither a head nor the global highest.
    let artifacts = snapshot(&[
        ("1", 10, &["1.2.3"]),
        ("2", 5, &["1.2.5"]),
        ("3", 1, &["1.3.0"]),
    ]);

    let now = Utc::now();
    let tags = collect_tags(&artifacts, now);
    let protection = ProtectionSet::compute(&tags, &[], Some(ProtectScope::Minor));

    assert!(protection.contains("1.2.5"));
    assert!(protection.contains("1.3.0"));
    assert!(!protection.contains("1.2.3"));
}

#[test]
fn scenario_force_keep_picks_youngest_dev_tag() {
    // keepDevCount=1 with dev tags a(5d), b(50d) and maxDevDays=10: "a" is
    // the youngest so it takes the force-keep slot (redundantly with its
    // threshold keep) and "b" is still deleted.
    let artifacts = snapshot(&[("1", 5, &["a"]), ("2", 50, &["b"])]);

    let now = Utc::now();
    let tags = collect_tags(&artifacts, now);
    let plan = plan(
        &tags,
        &ProtectionSet::default(),
        &RetentionConfig::new(90, 10).with_keep_counts(0, 1),
    );

    let a = plan.decisions.iter().find(|d| d.name == "a").unwrap();
    let b = plan.decisions.iter().find(|d| d.name == "b").unwrap();
    assert_eq!(a.action, Action::Keep);
    assert_eq!(a.reason, Reason::ForcedKeep);
    assert_eq!(b.action, Action::Delete);
}

#[test]
fn boundary_age_equal_to_threshold_keeps() {
    let artifacts = snapshot(&[("1", 60, &["on-the-line"])]);

    let now = Utc::now();
    let tags = collect_tags(&artifacts, now);
    let plan = plan(
        &tags,
        &ProtectionSet::default(),
        &RetentionConfig::new(90, 60),
    );

    assert_eq!(plan.decisions[0].action, Action::Keep);
    assert_eq!(plan.decisions[0].reason, Reason::WithinThreshold);
}

#[test]
fn duplicate_tag_across_pushes_gets_one_decision() {
    // The same tag on two pushes: youngest instance governs, one decision.
    let artifacts = snapshot(&[("1", 100, &["nightly"]), ("2", 3, &["nightly"])]);

    let now = Utc::now();
    let tags = collect_tags(&artifacts, now);
    let plan = plan(
        &tags,
        &ProtectionSet::default(),
        &RetentionConfig::new(90, 60),
    );

    assert_eq!(plan.decisions.len(), 1);
    assert_eq!(plan.decisions[0].age_days, 3);
    assert_eq!(plan.decisions[0].action, Action::Keep);
}

#[test]
fn rendered_output_is_stable_across_runs() {
    let artifacts = snapshot(&[
        ("1", 0, &["latest"]),
        ("2", 45, &["v2.1.0"]),
        ("3", 95, &["v1.5.0"]),
        ("4", 120, &["feature-old"]),
    ]);

    let now = Utc::now();
    let tags = collect_tags(&artifacts, now);
    let protection = ProtectionSet::compute(&tags, &["latest".to_string()], None);
    let config = RetentionConfig::new(90, 60);

    let first = report::render_plan(&plan(&tags, &protection, &config));
    let second = report::render_plan(&plan(&tags, &protection, &config));
    assert_eq!(first, second);
}
