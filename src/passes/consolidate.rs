//! Pass 1: match the gap register against sprint plans and expand into activities.

use std::path::Path;

use anyhow::{Context, Result};
use plan_core::expand::expand_requirement;
use plan_core::models::{Activity, MatchRecord, Requirement};
use plan_core::{Matcher, TaskIndex};

use crate::config::PlanConfig;
use crate::tables::{gap, plan, report, sprint};

/// Counts reported by the consolidation pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ConsolidateSummary {
    pub sprint_files: usize,
    pub tasks_indexed: usize,
    pub requirements: usize,
    pub skipped_unlabeled: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub rows: usize,
}

/// In-memory result of consolidation.
#[derive(Debug, Clone, Default)]
pub struct Consolidation {
    pub activities: Vec<Activity>,
    pub matches: Vec<MatchRecord>,
    pub summary: ConsolidateSummary,
}

/// Match and expand every labeled requirement, in register order.
pub fn consolidate(index: &TaskIndex, requirements: &[Requirement], matcher: &Matcher) -> Consolidation {
    let mut result = Consolidation {
        summary: ConsolidateSummary {
            tasks_indexed: index.len(),
            requirements: requirements.len(),
            ..Default::default()
        },
        ..Default::default()
    };

    for requirement in requirements {
        if requirement.label.is_empty() {
            result.summary.skipped_unlabeled += 1;
            continue;
        }

        match matcher.find_best(&requirement.label, index) {
            Some(found) => {
                result.matches.push(found.to_record(&requirement.label));
                result
                    .activities
                    .extend(expand_requirement(requirement, Some(found.task)));
                result.summary.matched += 1;
            }
            None => {
                result.activities.extend(expand_requirement(requirement, None));
                result.summary.unmatched += 1;
            }
        }
    }

    result.summary.rows = result.activities.len();
    result
}

/// Read sprint files and the gap register, write the first plan and the match report.
pub fn run_consolidate(config: &PlanConfig, plan_out: &Path, report_out: &Path) -> Result<ConsolidateSummary> {
    tracing::info!(
        "Consolidating {} with sprints from {} ({} scoring, threshold {:.2})",
        config.gap_file.display(),
        config.sprint_dir.display(),
        config.scoring.as_str(),
        config.threshold()
    );

    let (index, sprint_files) = sprint::load_task_index(&config.sprint_dir, &config.sprint_file_marker)
        .context("Failed to read sprint plans")?;
    let requirements = gap::read_gap_register(&config.gap_file).context("Failed to read gap register")?;

    let mut result = consolidate(&index, &requirements, &config.matcher());
    result.summary.sprint_files = sprint_files;

    plan::write_plan(plan_out, &result.activities)
        .with_context(|| format!("Failed to write {}", plan_out.display()))?;
    report::write_match_report(report_out, &result.matches)
        .with_context(|| format!("Failed to write {}", report_out.display()))?;

    let summary = result.summary;
    tracing::info!(
        "Matched: {}, unmatched (backlog): {}, output rows: {}",
        summary.matched,
        summary.unmatched,
        summary.rows
    );
    super::log_distribution(&result.activities);
    Ok(summary)
}
