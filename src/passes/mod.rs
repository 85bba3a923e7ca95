//! File-to-file passes.
//!
//! Each pass reads the previous pass's output and writes a new file; nothing is
//! modified in place. The full pipeline runs them strictly in order:
//!
//! 1. [`consolidate`]: sprint plans + gap register -> `<stem>.csv` and the match report
//! 2. [`reconcile`]: `<stem>.csv` -> `<stem>_v2.csv`
//! 3. [`overrides`]: `<stem>_v2.csv` -> `<stem>_v3.csv`
//!
//! A failing pass stops the pipeline; files written by earlier passes stay.

pub mod consolidate;
pub mod overrides;
pub mod reconcile;

use std::collections::BTreeMap;

use anyhow::Result;
use plan_core::models::Activity;
use plan_core::overrides::OverrideSummary;

use crate::config::PlanConfig;
use consolidate::ConsolidateSummary;
use reconcile::ReconcilePassSummary;

/// Counts from a full pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSummary {
    pub consolidate: ConsolidateSummary,
    pub reconcile: ReconcilePassSummary,
    pub overrides: OverrideSummary,
}

pub fn run_pipeline(config: &PlanConfig) -> Result<PipelineSummary> {
    let table = config.override_table()?;

    let consolidate = consolidate::run_consolidate(config, &config.plan_path(1), &config.match_report_path())?;
    let reconcile = reconcile::run_reconcile(
        &config.plan_path(1),
        &config.plan_path(2),
        config.reference_date(),
    )?;
    let overrides = overrides::run_overrides(&config.plan_path(2), &config.plan_path(3), &table)?;

    Ok(PipelineSummary {
        consolidate,
        reconcile,
        overrides,
    })
}

/// Row counts per status and per work kind, keyed by label (`(empty)` for none).
pub fn distribution(activities: &[Activity]) -> (BTreeMap<&str, usize>, BTreeMap<&str, usize>) {
    let mut statuses = BTreeMap::new();
    let mut kinds = BTreeMap::new();
    for activity in activities {
        let status = non_empty(activity.status_label());
        let kind = non_empty(activity.work_kind_label());
        *statuses.entry(status).or_insert(0) += 1;
        *kinds.entry(kind).or_insert(0) += 1;
    }
    (statuses, kinds)
}

fn non_empty(label: &str) -> &str {
    if label.is_empty() {
        "(empty)"
    } else {
        label
    }
}

fn log_distribution(activities: &[Activity]) {
    let (statuses, kinds) = distribution(activities);
    for (status, count) in &statuses {
        tracing::info!("  status {}: {}", status, count);
    }
    for (kind, count) in &kinds {
        tracing::info!("  work kind {}: {}", kind, count);
    }
}
