//! The match audit table.

use std::path::Path;

use plan_core::models::MatchRecord;
use serde::Serialize;

use super::write_rows;
use crate::error::PlanError;

pub const REPORT_COLUMNS: [&str; 4] = ["GAP Feature", "Sprint Task", "Match Score", "Sprint"];

#[derive(Debug, Clone, Serialize)]
struct ReportRow<'a> {
    requirement: &'a str,
    task: &'a str,
    score: String,
    sprint: &'a str,
}

pub fn write_match_report(path: &Path, matches: &[MatchRecord]) -> Result<(), PlanError> {
    let rows: Vec<ReportRow<'_>> = matches
        .iter()
        .map(|m| ReportRow {
            requirement: &m.requirement_label,
            task: &m.matched_task_name,
            score: format!("{:.2}", m.score),
            sprint: &m.sprint_id,
        })
        .collect();

    write_rows(path, &REPORT_COLUMNS, &rows)?;
    tracing::info!("Wrote {} matches to {}", rows.len(), path.display());
    Ok(())
}
