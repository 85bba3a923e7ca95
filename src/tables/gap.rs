//! The requirements gap register.

use std::path::Path;

use plan_core::models::{CoverageKind, Requirement};
use plan_core::numbers::parse_hours;
use serde::Deserialize;

use super::read_rows;
use crate::error::PlanError;

/// A gap register row as it appears on disk.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GapRecord {
    #[serde(rename = "Вимога")]
    pub requirement: String,
    #[serde(rename = "Функціонал /Блок")]
    pub section: String,
    #[serde(rename = "Покриття вимоги")]
    pub coverage: String,
    #[serde(rename = "Важливість")]
    pub importance: String,
    #[serde(rename = "Оцінка БА (год)")]
    pub ba_hours: String,
    #[serde(rename = "Оцінка Розробників (год)")]
    pub dev_hours: String,
}

impl GapRecord {
    pub fn into_requirement(self) -> Requirement {
        Requirement {
            label: self.requirement.trim().to_string(),
            section: self.section.trim().to_string(),
            coverage: CoverageKind::from_label(&self.coverage),
            importance: self.importance.trim().to_string(),
            ba_hours: parse_hours(&self.ba_hours),
            dev_hours: parse_hours(&self.dev_hours),
        }
    }
}

/// Read every requirement of the register, in file order.
pub fn read_gap_register(path: &Path) -> Result<Vec<Requirement>, PlanError> {
    let records: Vec<GapRecord> = read_rows(path)?;
    tracing::info!("Read {} gap register entries from {}", records.len(), path.display());
    Ok(records.into_iter().map(GapRecord::into_requirement).collect())
}
