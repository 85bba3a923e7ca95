//! Pass 2: normalize terminology, reconcile statuses with the calendar, back-fill comments.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use plan_core::dates::format_date;
use plan_core::models::Activity;
use plan_core::reconcile::reconcile_all;

use crate::tables::plan::{self, PlanRecord};

/// Counts reported by the reconciliation pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReconcilePassSummary {
    pub rows: usize,
    pub terminology_updates: usize,
    pub status_updates: usize,
    pub comment_fills: usize,
}

/// Convert raw plan rows, counting work kinds that were written under an alias.
pub fn normalize_records(records: Vec<PlanRecord>) -> (Vec<Activity>, usize) {
    let mut renamed = 0;
    let activities = records
        .into_iter()
        .map(|record| {
            if record.normalized_work_kind().1 {
                renamed += 1;
            }
            record.into_activity()
        })
        .collect();
    (activities, renamed)
}

pub fn run_reconcile(input: &Path, output: &Path, reference: NaiveDate) -> Result<ReconcilePassSummary> {
    tracing::info!(
        "Reconciling {} as of {}",
        input.display(),
        format_date(reference)
    );

    let records = plan::read_plan_records(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let (mut activities, terminology_updates) = normalize_records(records);
    let reconciled = reconcile_all(&mut activities, reference);

    plan::write_plan(output, &activities)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    let summary = ReconcilePassSummary {
        rows: reconciled.rows,
        terminology_updates,
        status_updates: reconciled.status_updates,
        comment_fills: reconciled.comment_fills,
    };
    tracing::info!(
        "Status updates: {}, terminology updates: {}, comment fills: {}",
        summary.status_updates,
        summary.terminology_updates,
        summary.comment_fills
    );
    super::log_distribution(&activities);
    Ok(summary)
}
