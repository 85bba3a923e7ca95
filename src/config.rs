use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use dirs::config_dir;
use plan_core::{Matcher, OverrideTable, ScoringMode};
use serde::{Deserialize, Serialize};

use crate::error::PlanError;

const APP_NAME: &str = "plan-consolidator";
const CONFIG_FILE: &str = "config.json";

/// Settings shared by every pass.
///
/// Every field has a default, so a config file only needs the values it changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanConfig {
    /// Which similarity tiers the matcher uses.
    pub scoring: ScoringMode,
    /// Minimum score a match must exceed. Defaults per scoring mode.
    pub match_threshold: Option<f64>,
    /// Directory holding the sprint plan files.
    pub sprint_dir: PathBuf,
    /// Only CSV files whose name contains this text are sprint files.
    pub sprint_file_marker: String,
    pub gap_file: PathBuf,
    /// Directory receiving the versioned plan files and the match report.
    pub output_dir: PathBuf,
    /// Plan files are `<stem>.csv`, `<stem>_v2.csv`, `<stem>_v3.csv`.
    pub plan_file_stem: String,
    pub match_report_file: String,
    /// Replacement for the built-in manual override table.
    pub overrides_file: Option<PathBuf>,
    /// Date statuses are reconciled against. Today when unset.
    pub reference_date: Option<NaiveDate>,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringMode::Enhanced,
            match_threshold: None,
            sprint_dir: PathBuf::from("."),
            sprint_file_marker: "Спринт".to_string(),
            gap_file: PathBuf::from("gap_analysis.csv"),
            output_dir: PathBuf::from("."),
            plan_file_stem: "Final_Integrated_Plan".to_string(),
            match_report_file: "Match_Report.csv".to_string(),
            overrides_file: None,
            reference_date: None,
        }
    }
}

impl PlanConfig {
    /// Load configuration.
    ///
    /// An explicitly given file must exist and parse. Otherwise the user's config
    /// directory is tried, falling back to defaults when the file is absent or broken.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            let config = Self::load_from(path)?;
            config.validate()?;
            return Ok(config);
        }

        let Some(path) = default_config_path() else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Ok(Self::default());
        }

        let loaded = Self::load_from(&path).and_then(|config| {
            config.validate()?;
            Ok(config)
        });
        match loaded {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::warn!("Failed to load config, using defaults: {:#}", e);
                Ok(Self::default())
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PlanError> {
        if let Some(threshold) = self.match_threshold {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(PlanError::Config(format!(
                    "match_threshold must be within [0, 1], got {}",
                    threshold
                )));
            }
        }
        if self.sprint_file_marker.is_empty() {
            return Err(PlanError::Config("sprint_file_marker must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn threshold(&self) -> f64 {
        self.match_threshold
            .unwrap_or_else(|| self.scoring.default_threshold())
    }

    pub fn matcher(&self) -> Matcher {
        Matcher::new(self.scoring, self.threshold())
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    /// Path of the plan produced by pass `version` (1-based).
    pub fn plan_path(&self, version: u32) -> PathBuf {
        let name = if version <= 1 {
            format!("{}.csv", self.plan_file_stem)
        } else {
            format!("{}_v{}.csv", self.plan_file_stem, version)
        };
        self.output_dir.join(name)
    }

    pub fn match_report_path(&self) -> PathBuf {
        self.output_dir.join(&self.match_report_file)
    }

    /// The configured override table, or the built-in one.
    pub fn override_table(&self) -> Result<OverrideTable> {
        let table = match &self.overrides_file {
            Some(path) => {
                crate::tables::require_file(path)?;
                let json = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read override table {}", path.display()))?;
                OverrideTable::from_json(&json).map_err(PlanError::from)?
            }
            None => OverrideTable::builtin().map_err(PlanError::from)?,
        };
        Ok(table)
    }
}

fn default_config_path() -> Option<PathBuf> {
    let mut path = config_dir()?;
    path.push(APP_NAME);
    path.push(CONFIG_FILE);
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_defaults_follow_scoring_mode() {
        let mut config = PlanConfig::default();
        assert_eq!(config.threshold(), 0.5);

        config.scoring = ScoringMode::Baseline;
        assert_eq!(config.threshold(), 0.6);

        config.match_threshold = Some(0.7);
        assert_eq!(config.threshold(), 0.7);
    }

    #[test]
    fn test_versioned_plan_paths() {
        let config = PlanConfig {
            output_dir: PathBuf::from("out"),
            ..Default::default()
        };
        assert_eq!(config.plan_path(1), PathBuf::from("out/Final_Integrated_Plan.csv"));
        assert_eq!(config.plan_path(3), PathBuf::from("out/Final_Integrated_Plan_v3.csv"));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: PlanConfig =
            serde_json::from_str(r#"{"scoring": "baseline", "reference_date": "2025-12-11"}"#).unwrap();
        assert_eq!(config.scoring, ScoringMode::Baseline);
        assert_eq!(config.reference_date, NaiveDate::from_ymd_opt(2025, 12, 11));
        assert_eq!(config.plan_file_stem, "Final_Integrated_Plan");
    }

    #[test]
    fn test_out_of_range_threshold_is_rejected() {
        let config = PlanConfig {
            match_threshold: Some(1.5),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(PlanError::Config(_))));
    }
}
