use serde::{Deserialize, Serialize};

/// Audit entry for an accepted match between a requirement and a sprint task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub requirement_label: String,
    pub matched_task_name: String,
    pub score: f64,
    pub sprint_id: String,
}
