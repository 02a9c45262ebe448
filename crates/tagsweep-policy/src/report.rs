//! Deterministic presentation ordering and rendering of a retention plan.
//!
//! Purely cosmetic, but stable across runs on the same snapshot so dry-run
//! output can be diffed and delete calls execute in a predictable order.
//! Decisions group into ordered sections: protected `latest`, other
//! protected releases (version-descending), other protected non-releases
//! (name-ascending), kept releases (version-descending), kept development
//! tags (age-ascending), releases to delete (version-descending), and
//! development tags to delete (age-ascending). Untagged decisions render
//! separately, keep before delete.

use std::cmp::Ordering;
use std::fmt::Write as _;

use crate::engine::{Action, RetentionDecision, RetentionPlan, UntaggedDecision};

/// Returns the plan's tag decisions in presentation order.
#[must_use]
pub fn ordered(plan: &RetentionPlan) -> Vec<&RetentionDecision> {
    let mut rows: Vec<&RetentionDecision> = plan.decisions.iter().collect();
    // Stable sort: comparator ties fall back to fetch order.
    rows.sort_by(|a, b| {
        section(a)
            .cmp(&section(b))
            .then_with(|| within_section(a, b))
    });
    rows
}

/// Returns the plan's untagged decisions, keeps before deletes.
#[must_use]
pub fn ordered_untagged(plan: &RetentionPlan) -> Vec<&UntaggedDecision> {
    let mut rows: Vec<&UntaggedDecision> = plan.untagged.iter().collect();
    rows.sort_by_key(|u| u.action == Action::Delete);
    rows
}

fn section(decision: &RetentionDecision) -> u8 {
    let release = decision.class.is_release();
    match (decision.is_protected(), decision.action) {
        (true, _) if decision.name == "latest" => 0,
        (true, _) if release => 1,
        (true, _) => 2,
        (false, Action::Keep) if release => 3,
        (false, Action::Keep) => 4,
        (false, Action::Delete) if release => 5,
        (false, Action::Delete) => 6,
    }
}

fn within_section(a: &RetentionDecision, b: &RetentionDecision) -> Ordering {
    match section(a) {
        // Version-descending, name ascending on identical tuples.
        1 | 3 | 5 => b
            .class
            .version()
            .cmp(&a.class.version())
            .then_with(|| a.name.cmp(&b.name)),
        2 => a.name.cmp(&b.name),
        // Age-ascending (newest first); ties keep fetch order.
        4 | 6 => a.age_days.cmp(&b.age_days),
        _ => Ordering::Equal,
    }
}

/// Renders the plan as a human-auditable text table.
#[must_use]
pub fn render_plan(plan: &RetentionPlan) -> String {
    let mut out = String::new();

    let width = plan
        .decisions
        .iter()
        .map(|d| d.name.len())
        .chain(std::iter::once(3))
        .max()
        .unwrap_or(3);

    let _ = writeln!(
        out,
        "{:<width$}  {:<11}  {:>6}  {:<6}  REASON",
        "TAG", "CLASS", "AGE(D)", "ACTION"
    );
    for decision in ordered(plan) {
        let _ = writeln!(
            out,
            "{:<width$}  {:<11}  {:>6}  {:<6}  {}",
            decision.name,
            decision.class.label(),
            decision.age_days,
            decision.action,
            decision.reason
        );
    }

    if !plan.untagged.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{:<20}  {:>6}  ACTION", "UNTAGGED ID", "AGE(D)");
        for untagged in ordered_untagged(plan) {
            let _ = writeln!(
                out,
                "{:<20}  {:>6}  {}",
                untagged.id, untagged.age_days, untagged.action
            );
        }
    }

    out
}

/// Renders the plan as tab-separated rows for machine consumption.
#[must_use]
pub fn render_tsv(plan: &RetentionPlan) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "tag\tclass\tage_days\taction\treason");
    for decision in ordered(plan) {
        let _ = writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}",
            decision.name,
            decision.class.label(),
            decision.age_days,
            decision.action,
            decision.reason
        );
    }
    for untagged in ordered_untagged(plan) {
        let _ = writeln!(
            out,
            "{}\tuntagged\t{}\t{}\t-",
            untagged.id, untagged.age_days, untagged.action
        );
    }

    out
}
