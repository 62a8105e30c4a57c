//! Critical path scheduler: turns a validated task set into a [`Timeline`].

use chrono::{Days, NaiveDate};

use crate::config::EngineConfig;
use crate::models::{ScheduledTask, Task, Timeline};
use crate::validation::{validate_with_config, GraphError, ValidatedTaskSet};
use crate::log_changes;

use super::calculation::calculate_critical_path;
use super::parallel::detect_parallel_groups;
use super::path::extract_critical_path;

/// Schedule a validated task set with default configuration.
pub fn schedule(set: &ValidatedTaskSet, reference_date: NaiveDate) -> Timeline {
    schedule_with_config(set, reference_date, &EngineConfig::default())
}

/// Schedule a validated task set.
///
/// Produces a fresh [`Timeline`] on every call; tasks keep their input order.
pub fn schedule_with_config(
    set: &ValidatedTaskSet,
    reference_date: NaiveDate,
    config: &EngineConfig,
) -> Timeline {
    let result = calculate_critical_path(set, config.verbosity);
    let parallel = detect_parallel_groups(set, &result);
    let path = extract_critical_path(set, &result);

    let tasks: Vec<ScheduledTask> = set
        .tasks()
        .iter()
        .zip(&result.task_timings)
        .zip(&parallel.can_run_in_parallel)
        .map(|((task, timing), &can_run_in_parallel)| ScheduledTask {
            task: task.clone(),
            start_day: timing.earliest_start,
            end_day: timing.earliest_finish,
            latest_start: timing.latest_start,
            latest_finish: timing.latest_finish,
            slack: timing.slack,
            is_critical_path: timing.is_critical(),
            can_run_in_parallel,
            status: None,
        })
        .collect();

    let id_of = |idx: usize| set.tasks()[idx].id.clone();
    let critical_path: Vec<String> = path.into_iter().map(id_of).collect();
    let parallel_groups: Vec<Vec<String>> = parallel
        .groups
        .into_iter()
        .map(|group| group.into_iter().map(id_of).collect())
        .collect();

    let completion_date = offset_date(reference_date, result.fastest_completion);

    log_changes!(
        config.verbosity,
        "Scheduled {} tasks: fastest completion {} days ({}), critical path {:?}",
        tasks.len(),
        result.fastest_completion,
        completion_date,
        critical_path
    );

    Timeline {
        tasks,
        reference_date,
        fastest_completion: result.fastest_completion,
        completion_date,
        critical_path,
        parallel_groups,
        total_work: result.total_work,
    }
}

/// Validate and schedule in one step.
///
/// The scheduler never runs on input that failed validation.
pub fn schedule_tasks(tasks: &[Task], reference_date: NaiveDate) -> Result<Timeline, GraphError> {
    schedule_tasks_with_config(tasks, reference_date, &EngineConfig::default())
}

pub fn schedule_tasks_with_config(
    tasks: &[Task],
    reference_date: NaiveDate,
    config: &EngineConfig,
) -> Result<Timeline, GraphError> {
    let set = validate_with_config(tasks, config)?;
    Ok(schedule_with_config(&set, reference_date, config))
}

/// Calendar date `days` after `reference_date`, saturating at the chrono range.
fn offset_date(reference_date: NaiveDate, days: i64) -> NaiveDate {
    let days = Days::new(days.max(0) as u64);
    reference_date
        .checked_add_days(days)
        .unwrap_or(NaiveDate::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate;

    fn make_task(id: &str, duration: i64, deps: &[&str]) -> Task {
        Task::new(id, id, duration).with_dependencies(deps.iter().copied())
    }

    fn reference_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    fn approval_tasks() -> Vec<Task> {
        vec![
            make_task("A", 3, &[]),
            make_task("B", 7, &["A"]),
            make_task("C", 10, &["A"]),
            make_task("D", 5, &["B"]),
            make_task("E", 5, &["B", "C"]),
        ]
    }

    #[test]
    fn test_approval_scenario() {
        let timeline = schedule_tasks(&approval_tasks(), reference_date()).unwrap();

        let windows: Vec<(&str, i64, i64)> = timeline
            .tasks
            .iter()
            .map(|t| (t.id(), t.start_day, t.end_day))
            .collect();
        assert_eq!(
            windows,
            vec![
                ("A", 0, 3),
                ("B", 3, 10),
                ("C", 3, 13),
                ("D", 10, 15),
                ("E", 13, 18),
            ]
        );
        assert_eq!(timeline.fastest_completion, 18);
        assert_eq!(timeline.critical_path, vec!["A", "C", "E"]);
        assert_eq!(
            timeline.completion_date,
            NaiveDate::from_ymd_opt(2025, 1, 19).unwrap()
        );
        assert_eq!(
            timeline.parallel_groups,
            vec![vec!["B", "C"], vec!["D", "E"]]
        );
    }

    #[test]
    fn test_computed_flags() {
        let timeline = schedule_tasks(&approval_tasks(), reference_date()).unwrap();

        let critical: Vec<&str> = timeline
            .tasks
            .iter()
            .filter(|t| t.is_critical_path)
            .map(|t| t.id())
            .collect();
        assert_eq!(critical, vec!["A", "C", "E"]);

        let a = timeline.get("A").unwrap();
        assert!(!a.can_run_in_parallel);
        assert!(a.status.is_none());
        assert!(timeline.get("B").unwrap().can_run_in_parallel);
        assert_eq!(timeline.get("D").unwrap().slack, 3);
    }

    #[test]
    fn test_tasks_keep_input_order() {
        let mut tasks = approval_tasks();
        tasks.reverse();
        let timeline = schedule_tasks(&tasks, reference_date()).unwrap();
        let ids: Vec<&str> = timeline.tasks.iter().map(|t| t.id()).collect();
        assert_eq!(ids, vec!["E", "D", "C", "B", "A"]);
        assert_eq!(timeline.critical_path, vec!["A", "C", "E"]);
    }

    #[test]
    fn test_schedule_is_deterministic() {
        let set = validate(&approval_tasks()).unwrap();
        assert_eq!(
            schedule(&set, reference_date()),
            schedule(&set, reference_date())
        );
    }

    #[test]
    fn test_invalid_input_is_rejected() {
        let tasks = vec![make_task("a", 1, &["b"]), make_task("b", 1, &["a"])];
        assert!(matches!(
            schedule_tasks(&tasks, reference_date()),
            Err(GraphError::CycleDetected { .. })
        ));
    }

    #[test]
    fn test_overflowing_durations_are_rejected() {
        let tasks = vec![make_task("a", i64::MAX, &[]), make_task("b", 1, &["a"])];
        assert_eq!(
            schedule_tasks(&tasks, reference_date()).unwrap_err(),
            GraphError::DurationOverflow {
                task: "b".to_string()
            }
        );

        let timeline = schedule_tasks(&tasks[..1], reference_date()).unwrap();
        assert_eq!(timeline.fastest_completion, i64::MAX);
        assert_eq!(timeline.tasks[0].slack, 0);
        assert_eq!(timeline.completion_date, NaiveDate::MAX);
    }

    #[test]
    fn test_empty_timeline() {
        let timeline = schedule_tasks(&[], reference_date()).unwrap();
        assert_eq!(timeline.fastest_completion, 0);
        assert_eq!(timeline.completion_date, reference_date());
        assert!(timeline.critical_path.is_empty());
        assert!(timeline.parallel_groups.is_empty());
    }
}
