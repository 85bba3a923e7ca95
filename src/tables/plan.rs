//! The consolidated plan table.

use std::path::Path;

use plan_core::dates::{format_optional_date, parse_date};
use plan_core::models::{Activity, ActivityStatus, WorkKind};
use plan_core::numbers::{format_hours, parse_optional_hours};
use serde::{Deserialize, Serialize};

use super::{read_rows, write_rows};
use crate::error::PlanError;

/// Plan columns in output order. Columns a pass does not fill are written empty.
pub const PLAN_COLUMNS: [&str; 14] = [
    "Розділ",
    "Деталізація",
    "Тип робіт",
    "Статус",
    "Учасники від замовника",
    "Учасники від виконавця",
    "Днів на виконання (робочих)",
    "Дата початку план",
    "Дата закінчення план",
    "Дата початку факт",
    "Дата закінчення факт",
    "Облік часу (план)",
    "Облік часу (факт)",
    "Коментарі",
];

/// A plan row as it appears on disk. Field order matches [`PLAN_COLUMNS`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanRecord {
    #[serde(rename = "Розділ")]
    pub section: String,
    #[serde(rename = "Деталізація")]
    pub detail: String,
    #[serde(rename = "Тип робіт")]
    pub work_kind: String,
    #[serde(rename = "Статус")]
    pub status: String,
    #[serde(rename = "Учасники від замовника")]
    pub customer_participants: String,
    #[serde(rename = "Учасники від виконавця")]
    pub vendor_participants: String,
    #[serde(rename = "Днів на виконання (робочих)")]
    pub working_days: String,
    #[serde(rename = "Дата початку план")]
    pub planned_start: String,
    #[serde(rename = "Дата закінчення план")]
    pub planned_end: String,
    #[serde(rename = "Дата початку факт")]
    pub actual_start: String,
    #[serde(rename = "Дата закінчення факт")]
    pub actual_end: String,
    #[serde(rename = "Облік часу (план)")]
    pub planned_hours: String,
    #[serde(rename = "Облік часу (факт)")]
    pub actual_hours: String,
    #[serde(rename = "Коментарі")]
    pub comment: String,
}

impl PlanRecord {
    /// Work kind label after alias normalization, and whether it differs from the raw cell.
    pub fn normalized_work_kind(&self) -> (Option<WorkKind>, bool) {
        let raw = self.work_kind.trim();
        let kind = WorkKind::from_str(raw);
        let changed = kind.is_some_and(|k| k.as_str() != raw);
        (kind, changed)
    }

    pub fn into_activity(self) -> Activity {
        let (work_kind, _) = self.normalized_work_kind();
        let other_work_kind = unknown_label(work_kind.is_none(), &self.work_kind);
        if let Some(text) = &other_work_kind {
            tracing::warn!("Unknown work kind {:?} on {:?} kept as is", text, self.detail);
        }

        let status = ActivityStatus::from_str(&self.status);
        let other_status = unknown_label(status.is_none(), &self.status);
        if let Some(text) = &other_status {
            tracing::debug!("Unknown status {:?} on {:?} kept as is", text, self.detail);
        }

        Activity {
            section: self.section,
            detail: self.detail,
            work_kind,
            status,
            other_work_kind,
            other_status,
            customer_participants: self.customer_participants,
            vendor_participants: self.vendor_participants,
            working_days: self.working_days,
            planned_start: parse_date(&self.planned_start),
            planned_end: parse_date(&self.planned_end),
            actual_start: parse_date(&self.actual_start),
            actual_end: parse_date(&self.actual_end),
            planned_hours: parse_optional_hours(&self.planned_hours),
            actual_hours: parse_optional_hours(&self.actual_hours),
            comment: self.comment,
        }
    }

    pub fn from_activity(activity: &Activity) -> Self {
        Self {
            section: activity.section.clone(),
            detail: activity.detail.clone(),
            work_kind: activity.work_kind_label().to_string(),
            status: activity.status_label().to_string(),
            customer_participants: activity.customer_participants.clone(),
            vendor_participants: activity.vendor_participants.clone(),
            working_days: activity.working_days.clone(),
            planned_start: format_optional_date(activity.planned_start),
            planned_end: format_optional_date(activity.planned_end),
            actual_start: format_optional_date(activity.actual_start),
            actual_end: format_optional_date(activity.actual_end),
            planned_hours: activity.planned_hours.map(format_hours).unwrap_or_default(),
            actual_hours: activity.actual_hours.map(format_hours).unwrap_or_default(),
            comment: activity.comment.clone(),
        }
    }
}

/// Cell text to carry when it did not parse as a known label.
fn unknown_label(unparsed: bool, cell: &str) -> Option<String> {
    let text = cell.trim();
    (unparsed && !text.is_empty()).then(|| text.to_string())
}

pub fn read_plan_records(path: &Path) -> Result<Vec<PlanRecord>, PlanError> {
    let records: Vec<PlanRecord> = read_rows(path)?;
    tracing::info!("Loaded {} plan rows from {}", records.len(), path.display());
    Ok(records)
}

pub fn read_plan(path: &Path) -> Result<Vec<Activity>, PlanError> {
    Ok(read_plan_records(path)?
        .into_iter()
        .map(PlanRecord::into_activity)
        .collect())
}

pub fn write_plan(path: &Path, activities: &[Activity]) -> Result<(), PlanError> {
    let records: Vec<PlanRecord> = activities.iter().map(PlanRecord::from_activity).collect();
    write_rows(path, &PLAN_COLUMNS, &records)?;
    tracing::info!("Wrote {} plan rows to {}", records.len(), path.display());
    Ok(())
}
