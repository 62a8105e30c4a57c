//! Progress simulation over a computed timeline.
//!
//! Annotates each task with its status at a given day without touching the
//! scheduled windows or critical flags.

use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;

use crate::config::EngineConfig;
use crate::models::{ProgressSnapshot, SimulatedTimeline, TaskId, TaskStatus, Timeline};
use crate::log_checks;

/// Errors raised by the progress simulator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    #[error("Simulation day must be non-negative, got {day}")]
    InvalidSimulationDay { day: i64 },
    #[error("Progress series step must be at least one day")]
    InvalidStep,
}

/// Simulate a timeline at `current_day`.
pub fn simulate(
    timeline: &Timeline,
    current_day: i64,
) -> Result<SimulatedTimeline, SimulationError> {
    simulate_with_outstanding(timeline, current_day, &FxHashSet::default())
}

/// Simulate a timeline where some tasks are known not to be finished yet.
///
/// A task in `outstanding` is never `Completed`; anything downstream whose
/// window has opened is `Blocked` until it is.
pub fn simulate_with_outstanding(
    timeline: &Timeline,
    current_day: i64,
    outstanding: &FxHashSet<TaskId>,
) -> Result<SimulatedTimeline, SimulationError> {
    simulate_with_config(timeline, current_day, outstanding, &EngineConfig::default())
}

pub fn simulate_with_config(
    timeline: &Timeline,
    current_day: i64,
    outstanding: &FxHashSet<TaskId>,
    config: &EngineConfig,
) -> Result<SimulatedTimeline, SimulationError> {
    if current_day < 0 {
        return Err(SimulationError::InvalidSimulationDay { day: current_day });
    }

    let statuses = resolve_statuses(timeline, current_day, outstanding, config.verbosity);

    let mut simulated = timeline.clone();
    for (task, status) in simulated.tasks.iter_mut().zip(statuses) {
        task.status = Some(status);
    }

    let completed = simulated
        .tasks
        .iter()
        .filter(|t| t.status == Some(TaskStatus::Completed))
        .count();

    Ok(SimulatedTimeline {
        completion_percentage: completion_percentage(completed, simulated.tasks.len()),
        days_remaining: timeline.fastest_completion.saturating_sub(current_day).max(0),
        timeline: simulated,
        current_day,
    })
}

/// Per-task status, indexed like `timeline.tasks`.
///
/// Dependencies always start strictly before their dependents, so visiting
/// tasks by start day resolves every dependency first.
fn resolve_statuses(
    timeline: &Timeline,
    current_day: i64,
    outstanding: &FxHashSet<TaskId>,
    verbosity: u8,
) -> Vec<TaskStatus> {
    let tasks = &timeline.tasks;
    let position: FxHashMap<&str, usize> = tasks
        .iter()
        .enumerate()
        .map(|(idx, t)| (t.id(), idx))
        .collect();

    let mut order: Vec<usize> = (0..tasks.len()).collect();
    order.sort_by_key(|&idx| (tasks[idx].start_day, idx));

    let mut statuses: Vec<Option<TaskStatus>> = vec![None; tasks.len()];
    for idx in order {
        let task = &tasks[idx];
        let deps_completed = task.dependencies().iter().all(|dep| {
            position
                .get(dep.as_str())
                .is_some_and(|&d| statuses[d] == Some(TaskStatus::Completed))
        });
        let window_open = current_day >= task.start_day;
        let finished =
            current_day >= task.end_day && deps_completed && !outstanding.contains(task.id());

        let status = if finished {
            TaskStatus::Completed
        } else if window_open && deps_completed {
            TaskStatus::InProgress
        } else if window_open {
            TaskStatus::Blocked
        } else {
            TaskStatus::Pending
        };

        log_checks!(verbosity, "Day {}: {} is {:?}", current_day, task.id(), status);
        statuses[idx] = Some(status);
    }

    statuses
        .into_iter()
        .map(|s| s.unwrap_or(TaskStatus::Pending))
        .collect()
}

fn completion_percentage(completed: usize, total: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    100.0 * completed as f64 / total as f64
}

/// Simulate day 0, `step_days`, `2 * step_days`, ... and always the completion day.
pub fn progress_series(
    timeline: &Timeline,
    step_days: i64,
) -> Result<Vec<ProgressSnapshot>, SimulationError> {
    if step_days <= 0 {
        return Err(SimulationError::InvalidStep);
    }

    let mut days: Vec<i64> = (0..timeline.fastest_completion)
        .step_by(step_days as usize)
        .collect();
    days.push(timeline.fastest_completion);

    let mut series = Vec::with_capacity(days.len());
    for day in days {
        let simulated = simulate(timeline, day)?;
        series.push(ProgressSnapshot {
            day,
            completion_percentage: simulated.completion_percentage,
            days_remaining: simulated.days_remaining,
            counts: simulated.status_counts(),
        });
    }
    Ok(series)
}
