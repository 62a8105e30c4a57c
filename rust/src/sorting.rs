//! Ordering of actionable tasks.
//!
//! Critical tasks first, then higher priority, then earlier start, then id.

use std::cmp::Ordering;

use crate::models::{Priority, ScheduledTask};

/// Sort key for "what should be worked on next".
///
/// Implements `Ord` so keys sort ascending with the most urgent first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextTaskKey {
    pub is_critical_path: bool,
    pub priority: Priority,
    pub start_day: i64,
    pub task_id: String,
}

impl NextTaskKey {
    pub fn from_task(task: &ScheduledTask) -> Self {
        Self {
            is_critical_path: task.is_critical_path,
            priority: task.priority(),
            start_day: task.start_day,
            task_id: task.id().to_string(),
        }
    }
}

impl Ord for NextTaskKey {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed operands: true / higher priority sort first
        other
            .is_critical_path
            .cmp(&self.is_critical_path)
            .then(other.priority.cmp(&self.priority))
            .then(self.start_day.cmp(&other.start_day))
            .then(self.task_id.cmp(&other.task_id))
    }
}

impl PartialOrd for NextTaskKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Sort tasks by their [`NextTaskKey`] and return their ids, most urgent first.
pub fn sort_tasks<'a, I>(tasks: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a ScheduledTask>,
{
    let mut keys: Vec<NextTaskKey> = tasks.into_iter().map(NextTaskKey::from_task).collect();
    keys.sort();
    keys.into_iter().map(|k| k.task_id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_key(critical: bool, priority: Priority, start_day: i64, id: &str) -> NextTaskKey {
        NextTaskKey {
            is_critical_path: critical,
            priority,
            start_day,
            task_id: id.to_string(),
        }
    }

    #[test]
    fn test_critical_before_priority() {
        let critical_low = make_key(true, Priority::Low, 10, "a");
        let slack_critical = make_key(false, Priority::Critical, 0, "b");
        assert!(critical_low < slack_critical);
    }

    #[test]
    fn test_priority_before_start_day() {
        let high_late = make_key(false, Priority::High, 9, "a");
        let low_early = make_key(false, Priority::Low, 0, "b");
        assert!(high_late < low_early);
    }

    #[test]
    fn test_start_day_then_id() {
        let early = make_key(true, Priority::Medium, 3, "z");
        let late = make_key(true, Priority::Medium, 4, "a");
        assert!(early < late);

        let x = make_key(true, Priority::Medium, 3, "x");
        let y = make_key(true, Priority::Medium, 3, "y");
        assert!(x < y);
    }

    #[test]
    fn test_sort_keys() {
        let mut keys = vec![
            make_key(false, Priority::Low, 0, "d"),
            make_key(true, Priority::Medium, 5, "c"),
            make_key(false, Priority::High, 2, "b"),
            make_key(true, Priority::Medium, 1, "a"),
        ];
        keys.sort();
        let ids: Vec<&str> = keys.iter().map(|k| k.task_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c", "b", "d"]);
    }
}
