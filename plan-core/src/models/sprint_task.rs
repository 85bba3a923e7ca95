use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A task planned in a sprint.
///
/// Every task in a sprint file shares that sprint's window. A sprint whose dates
/// could not be resolved produces tasks without a window; they can still be
/// matched, but their activities stay undated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SprintTask {
    /// Task name as written in the sprint plan.
    pub display_name: String,
    /// Sprint number taken from the sprint file name, or `Unknown`.
    pub sprint_id: String,
    pub window: Option<DateWindow>,
    pub estimated_hours: Option<f64>,
    pub group: String,
}

/// An inclusive calendar range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Build a window only when both ends are known.
    pub fn from_parts(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Option<Self> {
        match (start, end) {
            (Some(start), Some(end)) => Some(Self { start, end }),
            _ => None,
        }
    }

    /// Whole days between start and end. Negative for inverted windows.
    pub fn duration_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}
