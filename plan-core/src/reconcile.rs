//! Date-driven status reconciliation.
//!
//! Statuses are recomputed from the planned window relative to a reference date:
//!
//! ```text
//! end < reference                  -> Done
//! start > reference                -> Planned
//! start <= reference <= end        -> InProgress
//! anything else                    -> unchanged
//! ```
//!
//! Reconciliation is a pure function of the planned dates and the reference
//! date, so running it twice with the same reference changes nothing the
//! second time.

use chrono::NaiveDate;

use crate::models::{Activity, ActivityStatus};

/// Comment given to dated activities that have none.
pub const SCHEDULED_COMMENT: &str = "Scheduled based on Sprint Plan";

/// Status implied by a planned window, or `None` when the dates say nothing.
pub fn determine_status(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    reference: NaiveDate,
) -> Option<ActivityStatus> {
    match (start, end) {
        (_, Some(end)) if end < reference => Some(ActivityStatus::Done),
        (Some(start), _) if start > reference => Some(ActivityStatus::Planned),
        (Some(_), Some(_)) => Some(ActivityStatus::InProgress),
        _ => None,
    }
}

/// What reconciling a single activity changed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub status_changed: bool,
    pub comment_filled: bool,
}

/// Reconcile one activity in place.
///
/// Undated backlog activities are left alone. Dated ones, backlog included,
/// follow the calendar.
pub fn reconcile_activity(activity: &mut Activity, reference: NaiveDate) -> ReconcileOutcome {
    let mut outcome = ReconcileOutcome::default();

    if activity.is_backlog() && !activity.has_planned_date() {
        return outcome;
    }

    if let Some(status) = determine_status(activity.planned_start, activity.planned_end, reference) {
        if activity.status != Some(status) {
            activity.set_status(status);
            outcome.status_changed = true;
        }
    }

    if activity.comment.trim().is_empty() && activity.has_planned_date() {
        activity.comment = SCHEDULED_COMMENT.to_string();
        outcome.comment_filled = true;
    }

    outcome
}

/// Totals for a reconciliation run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub rows: usize,
    pub status_updates: usize,
    pub comment_fills: usize,
}

pub fn reconcile_all(activities: &mut [Activity], reference: NaiveDate) -> ReconcileSummary {
    let mut summary = ReconcileSummary {
        rows: activities.len(),
        ..Default::default()
    };

    for activity in activities.iter_mut() {
        let outcome = reconcile_activity(activity, reference);
        summary.status_updates += usize::from(outcome.status_changed);
        summary.comment_fills += usize::from(outcome.comment_filled);
    }

    summary
}
