//! Read-only summaries over computed timelines.

use crate::config::EngineConfig;
use crate::models::{SimulatedTimeline, TaskId, TaskStatus, Timeline};
use crate::sorting::sort_tasks;

/// Up to `limit` unfinished tasks, most urgent first.
///
/// Ordered by critical path membership, then priority, then start day, then id.
pub fn next_tasks(simulated: &SimulatedTimeline, limit: usize) -> Vec<TaskId> {
    let open = simulated
        .timeline
        .tasks
        .iter()
        .filter(|t| t.status != Some(TaskStatus::Completed));
    let mut ids = sort_tasks(open);
    ids.truncate(limit);
    ids
}

/// [`next_tasks`] with the configured default limit.
pub fn next_tasks_with_config(simulated: &SimulatedTimeline, config: &EngineConfig) -> Vec<TaskId> {
    next_tasks(simulated, config.default_next_tasks_limit)
}

/// Tasks whose scheduled window contains `day`, in input order.
pub fn active_tasks(timeline: &Timeline, day: i64) -> Vec<TaskId> {
    timeline
        .tasks
        .iter()
        .filter(|t| t.is_active_on(day))
        .map(|t| t.id().to_string())
        .collect()
}

/// Days `id` can slip without moving the completion day, or `None` if the
/// timeline has no such task.
pub fn slack_of(timeline: &Timeline, id: &str) -> Option<i64> {
    timeline.get(id).map(|t| t.slack)
}

/// Sum of durations along the critical path.
pub fn critical_path_duration(timeline: &Timeline) -> i64 {
    timeline
        .critical_path
        .iter()
        .filter_map(|id| timeline.get(id))
        .map(|t| t.duration_days())
        .sum()
}

/// Share of tasks completed, 0.0 to 100.0.
pub fn completion_percentage(simulated: &SimulatedTimeline) -> f64 {
    simulated.completion_percentage
}

/// Days until the fastest completion; zero once it has passed.
pub fn days_remaining(simulated: &SimulatedTimeline) -> i64 {
    simulated.days_remaining
}
