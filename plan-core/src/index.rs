//! Lookup of sprint tasks by display name.

use std::collections::HashMap;

use crate::models::SprintTask;

/// Sprint tasks keyed by display name, in stable insertion order.
///
/// Inserting a name that is already present replaces the stored task but keeps
/// the position of the first insertion. Iteration therefore follows the order in
/// which names were first seen, which is what makes matcher tie-breaks
/// reproducible.
#[derive(Debug, Clone, Default)]
pub struct TaskIndex {
    tasks: Vec<SprintTask>,
    positions: HashMap<String, usize>,
}

impl TaskIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a task. Returns the task it replaced, if any.
    pub fn insert(&mut self, task: SprintTask) -> Option<SprintTask> {
        match self.positions.get(&task.display_name) {
            Some(&pos) => Some(std::mem::replace(&mut self.tasks[pos], task)),
            None => {
                self.positions
                    .insert(task.display_name.clone(), self.tasks.len());
                self.tasks.push(task);
                None
            }
        }
    }

    pub fn get(&self, display_name: &str) -> Option<&SprintTask> {
        self.positions.get(display_name).map(|&pos| &self.tasks[pos])
    }

    pub fn iter(&self) -> impl Iterator<Item = &SprintTask> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl FromIterator<SprintTask> for TaskIndex {
    fn from_iter<I: IntoIterator<Item = SprintTask>>(iter: I) -> Self {
        let mut index = Self::new();
        for task in iter {
            index.insert(task);
        }
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(name: &str, sprint: &str) -> SprintTask {
        SprintTask {
            display_name: name.to_string(),
            sprint_id: sprint.to_string(),
            window: None,
            estimated_hours: None,
            group: String::new(),
        }
    }

    #[test]
    fn test_last_write_wins_but_first_position_is_kept() {
        let mut index = TaskIndex::new();
        assert!(index.insert(task("Alpha", "1")).is_none());
        index.insert(task("Beta", "1"));
        let replaced = index.insert(task("Alpha", "3"));

        assert_eq!(replaced.map(|t| t.sprint_id), Some("1".to_string()));
        assert_eq!(index.len(), 2);
        assert_eq!(index.get("Alpha").map(|t| t.sprint_id.as_str()), Some("3"));

        let names: Vec<_> = index.iter().map(|t| t.display_name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Beta"]);
    }

    #[test]
    fn test_collect_from_iterator() {
        let index: TaskIndex = vec![task("A", "1"), task("B", "2")].into_iter().collect();
        assert_eq!(index.len(), 2);
        assert!(index.get("C").is_none());
    }
}
