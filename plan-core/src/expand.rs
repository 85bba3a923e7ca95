//! Expansion of requirements into dated, proportionally-sized activities.
//!
//! A matched requirement is split into stages according to how it is covered.
//! Each stage receives a fixed share of the requirement's hours and, when the
//! matched sprint has a window, a sub-window placed at a fixed offset into it:
//!
//! | Plan         | Stage         | Hours | Offset |
//! |--------------|---------------|-------|--------|
//! | Full cycle   | Modeling      | 10%   | 0%     |
//! |              | Development   | 60%   | 10%    |
//! |              | Configuration | 20%   | 70%    |
//! |              | Training      | 10%   | 90%    |
//! | Standard     | Configuration | 80%   | 0%     |
//! |              | Training      | 20%   | 80%    |
//!
//! Sub-windows are truncated to whole days, last at least one day and are
//! clamped to the parent's end. Adjacent stages may therefore share a boundary
//! day or overlap on short windows; days are not reallocated.
//!
//! Unmatched requirements become a single backlog activity carrying all hours.

use chrono::Duration;

use crate::models::{
    Activity, ActivityStatus, CoverageKind, DateWindow, Requirement, SprintTask, WorkKind,
};
use crate::numbers::round_hours;

/// Comment of activities that no sprint picked up.
pub const BACKLOG_COMMENT: &str = "Not assigned to any sprint - BACKLOG";

/// Comment of activities scheduled through a matched sprint task.
pub fn sprint_comment(sprint_id: &str) -> String {
    format!("Planned in Sprint {}", sprint_id)
}

/// A stage of an expansion plan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stage {
    pub kind: WorkKind,
    /// Fraction of the total hours and of the parent window's length.
    pub share: f64,
    /// Fraction of the parent window's length before the stage starts.
    pub offset: f64,
}

const FULL_CYCLE_STAGES: &[Stage] = &[
    Stage { kind: WorkKind::Modeling, share: 0.1, offset: 0.0 },
    Stage { kind: WorkKind::Development, share: 0.6, offset: 0.1 },
    Stage { kind: WorkKind::Configuration, share: 0.2, offset: 0.7 },
    Stage { kind: WorkKind::Training, share: 0.1, offset: 0.9 },
];

const STANDARD_STAGES: &[Stage] = &[
    Stage { kind: WorkKind::Configuration, share: 0.8, offset: 0.0 },
    Stage { kind: WorkKind::Training, share: 0.2, offset: 0.8 },
];

/// How a piece of work is broken into stages.
///
/// - `FullCycle`: custom work, modeled, built, configured and trained
/// - `Standard`: existing functionality, configured and trained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpansionPlan {
    FullCycle,
    Standard,
}

impl ExpansionPlan {
    /// Development and customization run the full cycle; everything else,
    /// including unclassified coverage, is treated as standard functionality.
    pub fn for_coverage(coverage: CoverageKind) -> Self {
        if coverage.is_custom_work() {
            Self::FullCycle
        } else {
            Self::Standard
        }
    }

    pub fn stages(&self) -> &'static [Stage] {
        match self {
            Self::FullCycle => FULL_CYCLE_STAGES,
            Self::Standard => STANDARD_STAGES,
        }
    }
}

/// Place a stage inside its parent window.
///
/// `start = parent.start + trunc(days * offset)`,
/// `end = start + max(1, trunc(days * share))`, clamped to `parent.end`.
pub fn stage_window(parent: DateWindow, offset: f64, share: f64) -> DateWindow {
    let days = parent.duration_days() as f64;
    let offset_days = (days * offset).trunc() as i64;
    let span_days = ((days * share).trunc() as i64).max(1);

    let start = parent.start + Duration::days(offset_days);
    let end = start
        .checked_add_signed(Duration::days(span_days))
        .map_or(parent.end, |end| end.min(parent.end));

    DateWindow { start, end }
}

/// Split a template activity into the plan's stages.
///
/// Every stage is a copy of `template` with its own work kind and rounded share
/// of `total_hours`. When the template has a complete planned window, each stage
/// gets its sub-window; otherwise the template's planned dates are kept as-is.
pub fn expand_stages(template: &Activity, plan: ExpansionPlan, total_hours: f64) -> Vec<Activity> {
    let parent = template.planned_window();

    plan.stages()
        .iter()
        .map(|stage| {
            let mut activity = template.clone();
            activity.set_work_kind(stage.kind);
            activity.planned_hours = Some(round_hours(total_hours * stage.share));
            if let Some(parent) = parent {
                let window = stage_window(parent, stage.offset, stage.share);
                activity.planned_start = Some(window.start);
                activity.planned_end = Some(window.end);
            }
            activity
        })
        .collect()
}

/// Expand a requirement against its matched sprint task, if any.
pub fn expand_requirement(requirement: &Requirement, matched: Option<&SprintTask>) -> Vec<Activity> {
    let Some(task) = matched else {
        return vec![backlog_activity(requirement)];
    };

    let status = requirement.is_critical().then_some(ActivityStatus::Planned);
    let template = Activity {
        section: requirement.section.clone(),
        detail: requirement.label.clone(),
        status,
        planned_start: task.window.map(|w| w.start),
        planned_end: task.window.map(|w| w.end),
        comment: sprint_comment(&task.sprint_id),
        ..Default::default()
    };

    expand_stages(
        &template,
        ExpansionPlan::for_coverage(requirement.coverage),
        requirement.total_hours(),
    )
}

/// Single undated activity carrying the requirement's full effort.
pub fn backlog_activity(requirement: &Requirement) -> Activity {
    Activity {
        section: requirement.section.clone(),
        detail: requirement.label.clone(),
        work_kind: Some(WorkKind::Backlog),
        planned_hours: Some(requirement.total_hours()),
        comment: BACKLOG_COMMENT.to_string(),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn requirement(coverage: CoverageKind, ba: f64, dev: f64) -> Requirement {
        Requirement {
            label: "Облік відвідуваності".to_string(),
            section: "HR".to_string(),
            coverage,
            importance: String::new(),
            ba_hours: ba,
            dev_hours: dev,
        }
    }

    fn sprint_task(window: Option<DateWindow>) -> SprintTask {
        SprintTask {
            display_name: "Облік відвідуваності".to_string(),
            sprint_id: "4".to_string(),
            window,
            estimated_hours: Some(16.0),
            group: "HR".to_string(),
        }
    }

    fn two_weeks() -> DateWindow {
        DateWindow::new(ymd(2025, 12, 1), ymd(2025, 12, 15))
    }

    fn windows(activities: &[Activity]) -> Vec<(NaiveDate, NaiveDate)> {
        activities
            .iter()
            .map(|a| (a.planned_start.unwrap(), a.planned_end.unwrap()))
            .collect()
    }

    #[test]
    fn test_full_cycle_with_window() {
        let task = sprint_task(Some(two_weeks()));
        let activities = expand_requirement(&requirement(CoverageKind::Development, 10.0, 30.0), Some(&task));

        let kinds: Vec<_> = activities.iter().map(|a| a.work_kind.unwrap()).collect();
        assert_eq!(
            kinds,
            vec![WorkKind::Modeling, WorkKind::Development, WorkKind::Configuration, WorkKind::Training]
        );

        let hours: Vec<_> = activities.iter().map(|a| a.planned_hours.unwrap()).collect();
        assert_eq!(hours, vec![4.0, 24.0, 8.0, 4.0]);

        assert_eq!(
            windows(&activities),
            vec![
                (ymd(2025, 12, 1), ymd(2025, 12, 2)),
                (ymd(2025, 12, 2), ymd(2025, 12, 10)),
                (ymd(2025, 12, 10), ymd(2025, 12, 12)),
                (ymd(2025, 12, 13), ymd(2025, 12, 14)),
            ]
        );
        assert!(activities.iter().all(|a| a.comment == "Planned in Sprint 4"));
        assert!(activities.iter().all(|a| a.status.is_none()));
    }

    #[test]
    fn test_customization_runs_full_cycle() {
        let task = sprint_task(None);
        let activities = expand_requirement(&requirement(CoverageKind::Customization, 5.0, 5.0), Some(&task));
        assert_eq!(activities.len(), 4);
    }

    #[test]
    fn test_standard_with_window() {
        let task = sprint_task(Some(two_weeks()));
        let activities =
            expand_requirement(&requirement(CoverageKind::StandardFunctionality, 2.0, 8.0), Some(&task));

        assert_eq!(activities.len(), 2);
        assert_eq!(activities[0].work_kind, Some(WorkKind::Configuration));
        assert_eq!(activities[0].planned_hours, Some(8.0));
        assert_eq!(activities[1].work_kind, Some(WorkKind::Training));
        assert_eq!(activities[1].planned_hours, Some(2.0));
        assert_eq!(
            windows(&activities),
            vec![
                (ymd(2025, 12, 1), ymd(2025, 12, 12)),
                (ymd(2025, 12, 12), ymd(2025, 12, 14)),
            ]
        );
    }

    #[test]
    fn test_unclassified_falls_back_to_standard() {
        let task = sprint_task(None);
        let activities = expand_requirement(&requirement(CoverageKind::Unclassified, 1.0, 1.0), Some(&task));
        assert_eq!(activities.len(), 2);
    }

    #[test]
    fn test_matched_without_window_is_undated() {
        let task = sprint_task(None);
        let activities = expand_requirement(&requirement(CoverageKind::Development, 0.0, 20.0), Some(&task));

        assert!(activities.iter().all(|a| a.planned_start.is_none() && a.planned_end.is_none()));
        assert!(activities.iter().all(|a| a.comment == "Planned in Sprint 4"));
        assert_eq!(activities[1].planned_hours, Some(12.0));
    }

    #[test]
    fn test_unmatched_becomes_single_backlog_row() {
        let activities = expand_requirement(&requirement(CoverageKind::Development, 3.5, 10.25), None);

        assert_eq!(activities.len(), 1);
        let backlog = &activities[0];
        assert_eq!(backlog.work_kind, Some(WorkKind::Backlog));
        assert_eq!(backlog.planned_hours, Some(13.75));
        assert!(!backlog.has_planned_date());
        assert!(backlog.status.is_none());
        assert_eq!(backlog.comment, BACKLOG_COMMENT);
    }

    #[test]
    fn test_critical_requirement_starts_planned() {
        let mut req = requirement(CoverageKind::StandardFunctionality, 1.0, 1.0);
        req.importance = "Критично".to_string();
        let task = sprint_task(None);

        let activities = expand_requirement(&req, Some(&task));
        assert!(activities.iter().all(|a| a.status == Some(ActivityStatus::Planned)));

        let backlog = expand_requirement(&req, None);
        assert!(backlog[0].status.is_none());
    }

    #[test]
    fn test_hours_sum_within_rounding() {
        let task = sprint_task(Some(two_weeks()));
        for total in [0.0, 1.0, 3.3, 7.0, 13.0, 41.7, 99.9] {
            for coverage in [CoverageKind::Development, CoverageKind::StandardFunctionality] {
                let activities = expand_requirement(&requirement(coverage, 0.0, total), Some(&task));
                let sum: f64 = activities.iter().filter_map(|a| a.planned_hours).sum();
                let tolerance = 0.05 * activities.len() as f64 + 1e-9;
                assert!((sum - total).abs() <= tolerance, "{} vs {}", sum, total);
            }
        }
    }

    #[test]
    fn test_stage_windows_stay_inside_parent() {
        let start = ymd(2025, 12, 1);
        for days in 0..40 {
            let parent = DateWindow::new(start, start + Duration::days(days));
            for plan in [ExpansionPlan::FullCycle, ExpansionPlan::Standard] {
                for stage in plan.stages() {
                    let w = stage_window(parent, stage.offset, stage.share);
                    assert!(parent.contains(w.start), "{:?} {:?}", parent, w);
                    assert!(parent.contains(w.end), "{:?} {:?}", parent, w);
                    assert!(w.start <= w.end);
                }
            }
        }
    }

    #[test]
    fn test_minimum_one_day_span() {
        let parent = DateWindow::new(ymd(2025, 12, 1), ymd(2025, 12, 5));
        // 4 * 0.1 truncates to zero, raised to one day.
        let w = stage_window(parent, 0.0, 0.1);
        assert_eq!(w.end, ymd(2025, 12, 2));
    }

    #[test]
    fn test_window_at_last_representable_date() {
        let w = stage_window(DateWindow::new(NaiveDate::MAX, NaiveDate::MAX), 0.0, 0.1);
        assert_eq!((w.start, w.end), (NaiveDate::MAX, NaiveDate::MAX));
    }

    #[test]
    fn test_half_hour_shares_round_to_even() {
        let task = sprint_task(None);
        let hours: Vec<_> = expand_requirement(&requirement(CoverageKind::Development, 2.5, 10.0), Some(&task))
            .iter()
            .map(|a| a.planned_hours)
            .collect();
        assert_eq!(hours, vec![Some(1.2), Some(7.5), Some(2.5), Some(1.2)]);
    }

    #[test]
    fn test_zero_length_parent_clamps_to_end() {
        let day = ymd(2025, 12, 1);
        let w = stage_window(DateWindow::new(day, day), 0.9, 0.1);
        assert_eq!((w.start, w.end), (day, day));
    }

    #[test]
    fn test_expand_stages_keeps_template_fields() {
        let template = Activity {
            section: "Склад".to_string(),
            detail: "Інвентаризація".to_string(),
            work_kind: Some(WorkKind::Backlog),
            status: Some(ActivityStatus::InProgress),
            comment: BACKLOG_COMMENT.to_string(),
            planned_hours: Some(10.0),
            ..Default::default()
        };

        let stages = expand_stages(&template, ExpansionPlan::Standard, 10.0);
        assert_eq!(stages.len(), 2);
        assert!(stages.iter().all(|a| a.status == Some(ActivityStatus::InProgress)));
        assert!(stages.iter().all(|a| a.comment == BACKLOG_COMMENT));
        assert!(stages.iter().all(|a| !a.has_planned_date()));
        assert_eq!(stages[0].planned_hours, Some(8.0));
    }
}
