//! Sprint plan files and the task index built from them.

use std::fs;
use std::path::{Path, PathBuf};

use plan_core::dates::parse_date;
use plan_core::models::{DateWindow, SprintTask};
use plan_core::numbers::parse_optional_hours;
use plan_core::TaskIndex;
use regex::Regex;
use serde::Deserialize;

use super::read_rows;
use crate::error::PlanError;

/// Sprint id used when the file name carries no number.
pub const UNKNOWN_SPRINT: &str = "Unknown";

const TASK_HEADER: &str = "Задача";
const TOTALS_PREFIX: &str = "Всього";

/// A sprint plan row as it appears on disk.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SprintRecord {
    #[serde(rename = "Задача")]
    pub task: String,
    #[serde(rename = "Оцінка (год)")]
    pub hours: String,
    #[serde(rename = "Група")]
    pub group: String,
    #[serde(rename = "Дата початку спринта")]
    pub sprint_start: String,
    #[serde(rename = "Дата завершення спринта")]
    pub sprint_end: String,
}

/// One parsed sprint file.
#[derive(Debug, Clone)]
pub struct SprintPlan {
    pub sprint_id: String,
    pub window: Option<DateWindow>,
    pub tasks: Vec<SprintTask>,
}

/// Sprint files in `dir`: CSV files whose name contains `marker`, sorted by name.
pub fn discover_sprint_files(dir: &Path, marker: &str) -> Result<Vec<PathBuf>, PlanError> {
    if !dir.is_dir() {
        return Err(PlanError::MissingFile {
            path: dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
        if path.is_file() && is_csv && name.contains(marker) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Sprint number preceding `marker` in a file name, e.g. `3 Спринт.csv` -> `3`.
pub fn sprint_id_from_file_name(file_name: &str, marker: &str) -> String {
    let pattern = format!(r"(\d+)\s+{}", regex::escape(marker));
    Regex::new(&pattern)
        .ok()
        .and_then(|re| re.captures(file_name))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| UNKNOWN_SPRINT.to_string())
}

/// The sprint window: the first row whose start and end dates both parse.
fn sprint_window(records: &[SprintRecord]) -> Option<DateWindow> {
    records.iter().find_map(|r| {
        DateWindow::from_parts(parse_date(&r.sprint_start), parse_date(&r.sprint_end))
    })
}

fn is_task_name(name: &str) -> bool {
    !name.is_empty() && name != TASK_HEADER && !name.starts_with(TOTALS_PREFIX)
}

/// Turn the rows of one sprint file into tasks sharing the sprint's window.
pub fn sprint_plan_from_records(sprint_id: String, records: Vec<SprintRecord>) -> SprintPlan {
    let window = sprint_window(&records);
    let tasks = records
        .into_iter()
        .filter_map(|r| {
            let name = r.task.trim();
            is_task_name(name).then(|| SprintTask {
                display_name: name.to_string(),
                sprint_id: sprint_id.clone(),
                window,
                estimated_hours: parse_optional_hours(&r.hours),
                group: r.group.trim().to_string(),
            })
        })
        .collect();

    SprintPlan {
        sprint_id,
        window,
        tasks,
    }
}

pub fn read_sprint_file(path: &Path, marker: &str) -> Result<SprintPlan, PlanError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let sprint_id = sprint_id_from_file_name(&file_name, marker);
    let records: Vec<SprintRecord> = read_rows(path)?;
    Ok(sprint_plan_from_records(sprint_id, records))
}

/// Index every task of every sprint file in `dir`.
///
/// Files are read in name order; a task name seen again in a later file
/// replaces the earlier entry.
pub fn load_task_index(dir: &Path, marker: &str) -> Result<(TaskIndex, usize), PlanError> {
    let files = discover_sprint_files(dir, marker)?;
    if files.is_empty() {
        tracing::warn!(
            "No sprint files containing {:?} in {}; every requirement will go to the backlog",
            marker,
            dir.display()
        );
    }

    let mut index = TaskIndex::new();
    for file in &files {
        let plan = read_sprint_file(file, marker)?;
        if plan.window.is_none() {
            tracing::warn!("Sprint {} in {} has no usable dates", plan.sprint_id, file.display());
        }
        tracing::info!(
            "Sprint {}: {} tasks from {}",
            plan.sprint_id,
            plan.tasks.len(),
            file.display()
        );
        for task in plan.tasks {
            if let Some(previous) = index.insert(task) {
                tracing::debug!(
                    "Task {:?} from sprint {} replaced by a later sprint",
                    previous.display_name,
                    previous.sprint_id
                );
            }
        }
    }

    tracing::info!("Total tasks mapped: {}", index.len());
    Ok((index, files.len()))
}
