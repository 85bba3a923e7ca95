//! Best-match search of a requirement label over the task index.

use crate::index::TaskIndex;
use crate::models::{MatchRecord, SprintTask};
use crate::similarity::{self, ScoringMode};

/// A sprint task accepted for a requirement, with its score.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult<'a> {
    pub task: &'a SprintTask,
    pub score: f64,
}

impl MatchResult<'_> {
    pub fn to_record(&self, requirement_label: &str) -> MatchRecord {
        MatchRecord {
            requirement_label: requirement_label.to_string(),
            matched_task_name: self.task.display_name.clone(),
            score: self.score,
            sprint_id: self.task.sprint_id.clone(),
        }
    }
}

/// Finds the best-scoring sprint task for a requirement label.
#[derive(Debug, Clone, Copy)]
pub struct Matcher {
    mode: ScoringMode,
    threshold: f64,
}

impl Matcher {
    pub fn new(mode: ScoringMode, threshold: f64) -> Self {
        Self { mode, threshold }
    }

    /// Matcher using the mode's default threshold.
    pub fn with_mode(mode: ScoringMode) -> Self {
        Self::new(mode, mode.default_threshold())
    }

    pub fn mode(&self) -> ScoringMode {
        self.mode
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Return the task with the highest score strictly above the threshold.
    ///
    /// Only a strictly greater score replaces the current best, so a score equal
    /// to the threshold never matches and, on equal scores, the task inserted
    /// into the index first is kept.
    pub fn find_best<'a>(&self, label: &str, index: &'a TaskIndex) -> Option<MatchResult<'a>> {
        let mut best_score = self.threshold;
        let mut best: Option<&SprintTask> = None;

        for task in index.iter() {
            let score = similarity::score(self.mode, label, &task.display_name);
            if score > best_score {
                best_score = score;
                best = Some(task);
            }
        }

        let result = best.map(|task| MatchResult {
            task,
            score: best_score,
        });

        match &result {
            Some(m) => tracing::debug!(
                "Matched {:?} to {:?} (score {:.2})",
                label,
                m.task.display_name,
                m.score
            ),
            None => tracing::debug!("No sprint task above {:.2} for {:?}", self.threshold, label),
        }

        result
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_mode(ScoringMode::default())
    }
}
