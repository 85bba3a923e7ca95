use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::sprint_task::DateWindow;

/// One row of the consolidated project plan.
///
/// Activities are produced by expanding a [`Requirement`](super::Requirement) and are
/// then corrected by later passes: statuses follow the calendar, and curated
/// overrides replace whatever the earlier passes inferred.
///
/// Participant and working-day columns are never computed; they are carried
/// through every pass verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub section: String,
    /// The requirement label this activity was expanded from.
    pub detail: String,
    pub work_kind: Option<WorkKind>,
    pub status: Option<ActivityStatus>,
    /// Work kind cell text that is not a known label, carried through verbatim.
    pub other_work_kind: Option<String>,
    /// Status cell text that is not a known label, carried through verbatim.
    pub other_status: Option<String>,
    pub customer_participants: String,
    pub vendor_participants: String,
    pub working_days: String,
    pub planned_start: Option<NaiveDate>,
    pub planned_end: Option<NaiveDate>,
    pub actual_start: Option<NaiveDate>,
    pub actual_end: Option<NaiveDate>,
    pub planned_hours: Option<f64>,
    pub actual_hours: Option<f64>,
    pub comment: String,
}

impl Activity {
    pub fn planned_window(&self) -> Option<DateWindow> {
        DateWindow::from_parts(self.planned_start, self.planned_end)
    }

    /// True when at least one planned date is known.
    pub fn has_planned_date(&self) -> bool {
        self.planned_start.is_some() || self.planned_end.is_some()
    }

    pub fn is_backlog(&self) -> bool {
        self.work_kind == Some(WorkKind::Backlog)
    }

    /// Work kind as written to the plan: the known label, else the carried text.
    pub fn work_kind_label(&self) -> &str {
        match (self.work_kind, &self.other_work_kind) {
            (Some(kind), _) => kind.as_str(),
            (None, Some(text)) => text,
            (None, None) => "",
        }
    }

    pub fn status_label(&self) -> &str {
        match (self.status, &self.other_status) {
            (Some(status), _) => status.as_str(),
            (None, Some(text)) => text,
            (None, None) => "",
        }
    }

    pub fn set_work_kind(&mut self, kind: WorkKind) {
        self.work_kind = Some(kind);
        self.other_work_kind = None;
    }

    pub fn set_status(&mut self, status: ActivityStatus) {
        self.status = Some(status);
        self.other_status = None;
    }
}

/// The kind of work an activity represents.
///
/// Expansion produces `Modeling`, `Development`, `Configuration`, `Training`
/// and `Backlog`. `Deployment` only arrives through hand-edited plans.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub enum WorkKind {
    Modeling,
    Development,
    Configuration,
    Training,
    Deployment,
    Backlog,
}

impl WorkKind {
    /// Canonical label written to plan files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Modeling => "Моделювання",
            Self::Development => "Розробка",
            Self::Configuration => "Налаштування",
            Self::Training => "Навчання",
            Self::Deployment => "Деплоймент",
            Self::Backlog => "Backlog",
        }
    }

    /// Parse a canonical label or one of its English aliases.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim() {
            "Моделювання" | "Modeling" => Some(Self::Modeling),
            "Розробка" | "Development" => Some(Self::Development),
            "Налаштування" | "Configuration" | "Setup" => Some(Self::Configuration),
            "Навчання" | "Training" => Some(Self::Training),
            "Деплоймент" | "Deployment" => Some(Self::Deployment),
            "Backlog" => Some(Self::Backlog),
            _ => None,
        }
    }
}

impl TryFrom<String> for WorkKind {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value).ok_or_else(|| format!("unknown work kind: {}", value))
    }
}

impl From<WorkKind> for String {
    fn from(kind: WorkKind) -> Self {
        kind.as_str().to_string()
    }
}

/// Lifecycle status of an activity.
///
/// - `Planned`: Scheduled in the future
/// - `InProgress`: The reference date falls inside the planned window
/// - `Done`: The planned window has ended
/// - `Cancelled`: Dropped from the project; only set by manual overrides
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub enum ActivityStatus {
    Planned,
    InProgress,
    Done,
    Cancelled,
}

impl ActivityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planned => "Заплановано",
            Self::InProgress => "В роботі",
            Self::Done => "Виконано",
            Self::Cancelled => "Скасовано",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim() {
            "Заплановано" | "Planned" => Some(Self::Planned),
            "В роботі" | "In Progress" => Some(Self::InProgress),
            "Виконано" | "Done" => Some(Self::Done),
            "Скасовано" | "Cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl TryFrom<String> for ActivityStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value).ok_or_else(|| format!("unknown status: {}", value))
    }
}

impl From<ActivityStatus> for String {
    fn from(status: ActivityStatus) -> Self {
        status.as_str().to_string()
    }
}
