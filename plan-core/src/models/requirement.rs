use serde::{Deserialize, Serialize};

/// A required capability from the gap register.
///
/// Requirements are immutable source records. Effort is split between business
/// analysis and development; the consolidated plan only ever uses their sum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requirement {
    /// Free-form requirement name, matched against sprint task names.
    pub label: String,
    /// Functional block the requirement belongs to.
    pub section: String,
    pub coverage: CoverageKind,
    pub importance: String,
    pub ba_hours: f64,
    pub dev_hours: f64,
}

impl Requirement {
    pub fn total_hours(&self) -> f64 {
        self.ba_hours + self.dev_hours
    }

    /// Whether the requirement is flagged as critical in the register.
    pub fn is_critical(&self) -> bool {
        self.importance.trim() == CRITICAL_IMPORTANCE
    }
}

/// Importance label that seeds matched activities with a planned status.
pub const CRITICAL_IMPORTANCE: &str = "Критично";

/// How a requirement is going to be satisfied.
///
/// - `Development`: Built from scratch
/// - `Customization`: Existing functionality modified
/// - `StandardFunctionality`: Covered by configuring what already exists
/// - `Unclassified`: Empty or unknown label, expanded like standard functionality
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CoverageKind {
    Development,
    Customization,
    StandardFunctionality,
    Unclassified,
}

impl CoverageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "Розробка",
            Self::Customization => "Кастомізація",
            Self::StandardFunctionality => "Стандартний функціонал",
            Self::Unclassified => "",
        }
    }

    /// Parse a register label. Unknown labels are `Unclassified`, never an error.
    pub fn from_label(s: &str) -> Self {
        match s.trim() {
            "Розробка" | "Development" => Self::Development,
            "Кастомізація" | "Customization" => Self::Customization,
            "Стандартний функціонал" | "Standard functionality" => {
                Self::StandardFunctionality
            }
            _ => Self::Unclassified,
        }
    }

    /// Custom work goes through the full modeling-to-training cycle.
    pub fn is_custom_work(&self) -> bool {
        matches!(self, Self::Development | Self::Customization)
    }
}
