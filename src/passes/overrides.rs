//! Pass 3: apply manual overrides and expand the remaining backlog.

use std::path::Path;

use anyhow::{Context, Result};
use plan_core::overrides::{apply_overrides, OverrideSummary};
use plan_core::OverrideTable;

use crate::tables::plan;

pub fn run_overrides(input: &Path, output: &Path, table: &OverrideTable) -> Result<OverrideSummary> {
    tracing::info!(
        "Applying {} manual overrides to {}",
        table.len(),
        input.display()
    );

    let activities = plan::read_plan(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let (activities, summary) = apply_overrides(activities, table);

    plan::write_plan(output, &activities)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    tracing::info!(
        "Manual updates: {}, duplicates dropped: {}, backlog items expanded: {}, rows {} -> {}",
        summary.overrides_applied,
        summary.duplicates_dropped,
        summary.backlog_expanded,
        summary.rows_in,
        summary.rows_out
    );
    super::log_distribution(&activities);
    Ok(summary)
}
