//! Curated corrections and re-expansion of backlog rows.
//!
//! Some requirements have a known real-world state that no schedule reflects.
//! An override table keyed by the exact requirement text replaces status,
//! comment and work kind for those rows. Rows of the same requirement after the
//! first one are dropped, so each overridden requirement appears exactly once.
//!
//! Backlog rows with hours that are not overridden are classified by keywords
//! and expanded into stages like a matched requirement would be.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::expand::{expand_stages, ExpansionPlan};
use crate::models::{Activity, ActivityStatus, WorkKind};

/// Override table shipped with the tool.
const BUILTIN_OVERRIDES: &str = include_str!("../data/manual_overrides.json");

#[derive(Debug, Error)]
pub enum OverrideTableError {
    #[error("invalid override table: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Replacement values for one requirement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualOverride {
    pub status: ActivityStatus,
    pub comment: String,
    #[serde(rename = "work_type")]
    pub work_kind: WorkKind,
}

/// Manual overrides keyed by exact requirement text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverrideTable {
    entries: BTreeMap<String, ManualOverride>,
}

impl OverrideTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builtin() -> Result<Self, OverrideTableError> {
        Self::from_json(BUILTIN_OVERRIDES)
    }

    /// Parse a JSON object of `{ "<requirement>": { status, comment, work_type } }`.
    pub fn from_json(json: &str) -> Result<Self, OverrideTableError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn insert(&mut self, detail: impl Into<String>, value: ManualOverride) {
        self.entries.insert(detail.into(), value);
    }

    pub fn get(&self, detail: &str) -> Option<&ManualOverride> {
        self.entries.get(detail)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Coarse category of backlog work, chosen from the requirement text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkCategory {
    Development,
    Configuration,
}

impl WorkCategory {
    pub fn plan(&self) -> ExpansionPlan {
        match self {
            Self::Development => ExpansionPlan::FullCycle,
            Self::Configuration => ExpansionPlan::Standard,
        }
    }
}

const DEVELOPMENT_KEYWORDS: &[&str] = &[
    "розробити",
    "розробка",
    "створити функціонал",
    "інтеграція",
    "реалізувати",
    "механізм",
    "логіка",
    "алгоритм",
];

const MODELING_KEYWORDS: &[&str] = &[
    "моделювання",
    "технічна документація",
    "тз",
    "аналіз",
    "проектування",
    "архітектура",
];

const CONFIGURATION_KEYWORDS: &[&str] = &[
    "налаштування",
    "налаштувати",
    "конфігурація",
    "встановити",
    "прив'язка",
    "зберігання",
    "управління",
    "створення",
];

/// Keyword rules in priority order. Modeling work is part of the development cycle.
const CATEGORY_RULES: &[(&[&str], WorkCategory)] = &[
    (DEVELOPMENT_KEYWORDS, WorkCategory::Development),
    (MODELING_KEYWORDS, WorkCategory::Development),
    (CONFIGURATION_KEYWORDS, WorkCategory::Configuration),
];

/// Classify requirement text by the first rule with a keyword it contains.
pub fn classify_work(detail: &str) -> WorkCategory {
    let lowered = detail.to_lowercase();
    CATEGORY_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(_, category)| *category)
        .unwrap_or(WorkCategory::Configuration)
}

/// Totals for an override run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OverrideSummary {
    pub rows_in: usize,
    pub rows_out: usize,
    pub overrides_applied: usize,
    pub duplicates_dropped: usize,
    pub backlog_expanded: usize,
}

/// Apply the override table and re-expand remaining backlog rows.
pub fn apply_overrides(rows: Vec<Activity>, table: &OverrideTable) -> (Vec<Activity>, OverrideSummary) {
    let mut summary = OverrideSummary {
        rows_in: rows.len(),
        ..Default::default()
    };
    let mut seen: HashSet<String> = HashSet::new();
    let mut output = Vec::with_capacity(rows.len());

    for mut row in rows {
        let detail = row.detail.trim().to_string();

        if let Some(update) = table.get(&detail) {
            if !seen.insert(detail) {
                summary.duplicates_dropped += 1;
                continue;
            }
            row.set_status(update.status);
            row.comment = update.comment.clone();
            row.set_work_kind(update.work_kind);
            summary.overrides_applied += 1;
            output.push(row);
            continue;
        }

        match row.planned_hours {
            Some(hours) if row.is_backlog() && hours > 0.0 => {
                let category = classify_work(&detail);
                tracing::debug!("Expanding backlog row {:?} as {:?}", detail, category);
                output.extend(expand_stages(&row, category.plan(), hours));
                summary.backlog_expanded += 1;
            }
            _ => output.push(row),
        }
    }

    summary.rows_out = output.len();
    (output, summary)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::expand::BACKLOG_COMMENT;

    fn row(detail: &str, kind: WorkKind, hours: f64) -> Activity {
        Activity {
            section: "HR".to_string(),
            detail: detail.to_string(),
            work_kind: Some(kind),
            planned_hours: Some(hours),
            ..Default::default()
        }
    }

    fn table() -> OverrideTable {
        let mut table = OverrideTable::new();
        table.insert(
            "Створити демонстраційні підрозділи в системі",
            ManualOverride {
                status: ActivityStatus::Done,
                comment: "Тестові підрозділи створено".to_string(),
                work_kind: WorkKind::Configuration,
            },
        );
        table
    }

    #[test]
    fn test_builtin_table_parses() {
        let table = OverrideTable::builtin().unwrap();
        assert_eq!(table.len(), 13);
        let entry = table
            .get("Створити демонстраційні підрозділи в системі")
            .unwrap();
        assert_eq!(entry.status, ActivityStatus::Done);
        assert_eq!(entry.work_kind, WorkKind::Configuration);
    }

    #[test]
    fn test_table_rejects_unknown_labels() {
        let json = r#"{"x": {"status": "Maybe", "comment": "", "work_type": "Backlog"}}"#;
        assert!(OverrideTable::from_json(json).is_err());
    }

    #[test]
    fn test_classification_priority() {
        assert_eq!(classify_work("Розробити модуль бонусів"), WorkCategory::Development);
        assert_eq!(classify_work("Аналіз вимог до складу"), WorkCategory::Development);
        // Configuration keyword present, but development wins.
        assert_eq!(
            classify_work("Налаштування та інтеграція з банком"),
            WorkCategory::Development
        );
        assert_eq!(classify_work("Управління правами"), WorkCategory::Configuration);
        assert_eq!(classify_work("Звіти"), WorkCategory::Configuration);
    }

    #[test]
    fn test_override_applies_once_and_drops_duplicates() {
        let detail = "Створити демонстраційні підрозділи в системі";
        let rows = vec![
            row(detail, WorkKind::Configuration, 8.0),
            row(detail, WorkKind::Training, 2.0),
            row("Інше", WorkKind::Training, 1.0),
        ];

        let (out, summary) = apply_overrides(rows, &table());
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].status, Some(ActivityStatus::Done));
        assert_eq!(out[0].comment, "Тестові підрозділи створено");
        assert_eq!(out[0].planned_hours, Some(8.0));
        assert_eq!(out[1].detail, "Інше");
        assert_eq!(summary.overrides_applied, 1);
        assert_eq!(summary.duplicates_dropped, 1);
    }

    #[test]
    fn test_interleaved_duplicates_keep_first_of_each() {
        let mut table = table();
        table.insert(
            "Прив'язка складів",
            ManualOverride {
                status: ActivityStatus::Cancelled,
                comment: String::new(),
                work_kind: WorkKind::Backlog,
            },
        );
        let demo = "Створити демонстраційні підрозділи в системі";
        let rows = vec![
            row(demo, WorkKind::Modeling, 1.0),
            row("Прив'язка складів", WorkKind::Configuration, 2.0),
            row(demo, WorkKind::Development, 3.0),
            row("Прив'язка складів", WorkKind::Training, 4.0),
            row(demo, WorkKind::Training, 5.0),
        ];

        let (out, summary) = apply_overrides(rows, &table);
        let hours: Vec<_> = out.iter().map(|a| a.planned_hours).collect();
        assert_eq!(hours, vec![Some(1.0), Some(2.0)]);
        assert_eq!(summary.overrides_applied, 2);
        assert_eq!(summary.duplicates_dropped, 3);
    }

    #[test]
    fn test_override_replaces_unknown_labels() {
        let mut overridden = row("Створити демонстраційні підрозділи в системі", WorkKind::Training, 2.0);
        overridden.work_kind = None;
        overridden.other_work_kind = Some("Тестування".to_string());
        overridden.other_status = Some("Відкладено".to_string());
        let mut untouched = row("Звіти", WorkKind::Training, 1.0);
        untouched.other_status = Some("Відкладено".to_string());

        let (out, _) = apply_overrides(vec![overridden, untouched], &table());
        assert_eq!(out[0].work_kind_label(), "Налаштування");
        assert_eq!(out[0].status_label(), "Виконано");
        assert_eq!(out[1].status_label(), "Відкладено");
    }

    #[test]
    fn test_override_matches_trimmed_detail() {
        let rows = vec![row(" Створити демонстраційні підрозділи в системі ", WorkKind::Backlog, 4.0)];
        let (out, summary) = apply_overrides(rows, &table());
        assert_eq!(summary.overrides_applied, 1);
        assert_eq!(out[0].work_kind, Some(WorkKind::Configuration));
    }

    #[test]
    fn test_backlog_rows_are_expanded() {
        let mut backlog = row("Реалізувати механізм бонусів", WorkKind::Backlog, 20.0);
        backlog.comment = BACKLOG_COMMENT.to_string();
        backlog.status = Some(ActivityStatus::InProgress);

        let (out, summary) = apply_overrides(vec![backlog], &OverrideTable::new());
        assert_eq!(summary.backlog_expanded, 1);
        assert_eq!(out.len(), 4);
        assert_eq!(out[0].work_kind, Some(WorkKind::Modeling));
        assert_eq!(out[1].planned_hours, Some(12.0));
        assert!(out.iter().all(|a| a.status == Some(ActivityStatus::InProgress)));
        assert!(out.iter().all(|a| a.comment == BACKLOG_COMMENT));
    }

    #[test]
    fn test_dated_backlog_rows_get_sub_windows() {
        let mut backlog = row("Зберігання документів", WorkKind::Backlog, 10.0);
        backlog.planned_start = NaiveDate::from_ymd_opt(2025, 12, 1);
        backlog.planned_end = NaiveDate::from_ymd_opt(2025, 12, 11);

        let (out, _) = apply_overrides(vec![backlog], &OverrideTable::new());
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].planned_end, NaiveDate::from_ymd_opt(2025, 12, 9));
        assert_eq!(out[1].planned_start, NaiveDate::from_ymd_opt(2025, 12, 9));
        assert_eq!(out[1].planned_end, NaiveDate::from_ymd_opt(2025, 12, 11));
    }

    #[test]
    fn test_backlog_without_hours_is_kept() {
        let rows = vec![
            row("Звіти", WorkKind::Backlog, 0.0),
            Activity {
                detail: "Без оцінки".to_string(),
                work_kind: Some(WorkKind::Backlog),
                ..Default::default()
            },
        ];
        let (out, summary) = apply_overrides(rows, &OverrideTable::new());
        assert_eq!(out.len(), 2);
        assert_eq!(summary.backlog_expanded, 0);
        assert!(out.iter().all(|a| a.is_backlog()));
    }
}
