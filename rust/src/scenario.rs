//! What-if scenario transforms over a baseline task set.
//!
//! Transforms run in a fixed order: removal, duration scaling, expedite.
//! Every step that changes a duration rounds up to a whole day with a floor
//! of one day. The baseline is never modified.

use chrono::NaiveDate;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::EngineConfig;
use crate::critical_path::schedule_tasks_with_config;
use crate::error::TimelineError;
use crate::models::{Task, TaskId, Timeline};
use crate::{log_changes, log_checks};

/// Absorbs float noise so that e.g. `10 * 0.3` rounds to 3, not 4.
const ROUNDING_EPSILON: f64 = 1e-9;

/// Errors raised by scenario transforms.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScenarioError {
    #[error("Scenario factor must be finite and positive, got {factor}")]
    InvalidFactor { factor: f64 },
}

/// What happens to references pointing at a removed task.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalPolicy {
    /// The step is skipped; references to it are deleted.
    #[default]
    Drop,
    /// Dependents take over the removed task's own dependencies.
    Inherit,
}

/// A scenario descriptor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    /// Multiplier applied to every duration.
    pub duration_factor: f64,
    /// Tasks that receive `expedite_factor` on top of the scaling.
    pub expedited_ids: Vec<TaskId>,
    pub expedite_factor: f64,
    /// Tasks dropped from the set.
    pub removed_ids: Vec<TaskId>,
    pub removal_policy: RemovalPolicy,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            duration_factor: 1.0,
            expedited_ids: Vec::new(),
            expedite_factor: 0.7,
            removed_ids: Vec::new(),
            removal_policy: RemovalPolicy::Drop,
        }
    }
}

impl Scenario {
    /// The scenario that changes nothing.
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn with_duration_factor(mut self, factor: f64) -> Self {
        self.duration_factor = factor;
        self
    }

    pub fn with_expedite_factor(mut self, factor: f64) -> Self {
        self.expedite_factor = factor;
        self
    }

    pub fn expedite<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<TaskId>,
    {
        self.expedited_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn remove<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<TaskId>,
    {
        self.removed_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn with_removal_policy(mut self, policy: RemovalPolicy) -> Self {
        self.removal_policy = policy;
        self
    }

    pub fn is_identity(&self) -> bool {
        self.duration_factor == 1.0 && self.expedited_ids.is_empty() && self.removed_ids.is_empty()
    }

    fn check_factors(&self) -> Result<(), ScenarioError> {
        check_factor(self.duration_factor)?;
        if !self.expedited_ids.is_empty() {
            check_factor(self.expedite_factor)?;
        }
        Ok(())
    }
}

fn check_factor(factor: f64) -> Result<(), ScenarioError> {
    if factor.is_finite() && factor > 0.0 {
        Ok(())
    } else {
        Err(ScenarioError::InvalidFactor { factor })
    }
}

/// Scale a duration, round up, floor at one day.
///
/// Non-positive durations pass through untouched so that validation still
/// reports them instead of the floor hiding them. A factor of exactly 1.0
/// returns the duration unchanged, even beyond f64 integer precision.
pub fn scale_duration(duration_days: i64, factor: f64) -> i64 {
    if duration_days <= 0 || factor == 1.0 {
        return duration_days;
    }
    let scaled = (duration_days as f64 * factor - ROUNDING_EPSILON).ceil() as i64;
    scaled.max(1)
}

/// Apply a scenario with default configuration.
pub fn transform(tasks: &[Task], scenario: &Scenario) -> Result<Vec<Task>, ScenarioError> {
    transform_with_config(tasks, scenario, &EngineConfig::default())
}

/// Derive a new task set from `tasks`.
///
/// The result is not validated; run it through validation before scheduling.
pub fn transform_with_config(
    tasks: &[Task],
    scenario: &Scenario,
    config: &EngineConfig,
) -> Result<Vec<Task>, ScenarioError> {
    scenario.check_factors()?;
    let verbosity = config.verbosity;

    let removed: FxHashSet<&str> = scenario.removed_ids.iter().map(String::as_str).collect();
    let expedited: FxHashSet<&str> = scenario.expedited_ids.iter().map(String::as_str).collect();
    let by_id: FxHashMap<&str, &Task> = tasks.iter().map(|t| (t.id.as_str(), t)).collect();

    for id in &scenario.removed_ids {
        if !by_id.contains_key(id.as_str()) {
            log_checks!(verbosity, "Ignoring removal of unknown task {}", id);
        }
    }

    let result: Vec<Task> = tasks
        .iter()
        .filter(|task| !removed.contains(task.id.as_str()))
        .map(|task| {
            let dependencies = match scenario.removal_policy {
                RemovalPolicy::Drop => task
                    .dependencies
                    .iter()
                    .filter(|dep| !removed.contains(dep.as_str()))
                    .cloned()
                    .collect(),
                RemovalPolicy::Inherit => inherit_dependencies(task, &by_id, &removed),
            };

            let mut duration_days = scale_duration(task.duration_days, scenario.duration_factor);
            if expedited.contains(task.id.as_str()) {
                duration_days = scale_duration(duration_days, scenario.expedite_factor);
            }

            Task {
                duration_days,
                dependencies,
                ..task.clone()
            }
        })
        .collect();

    if !scenario.is_identity() {
        log_changes!(
            verbosity,
            "Scenario applied: factor {}, {} expedited, {} removed ({:?}), {} -> {} tasks",
            scenario.duration_factor,
            scenario.expedited_ids.len(),
            scenario.removed_ids.len(),
            scenario.removal_policy,
            tasks.len(),
            result.len()
        );
    }

    Ok(result)
}

/// Replace references to removed tasks with their own dependencies.
///
/// Follows chains of removed tasks; keeps first-seen order without duplicates.
/// References to ids outside the set are kept so validation can report them.
fn inherit_dependencies(
    task: &Task,
    by_id: &FxHashMap<&str, &Task>,
    removed: &FxHashSet<&str>,
) -> Vec<TaskId> {
    let mut result: Vec<TaskId> = Vec::new();
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    let mut expanded: FxHashSet<&str> = FxHashSet::default();
    let mut stack: Vec<&str> = task.dependencies.iter().rev().map(String::as_str).collect();

    while let Some(dep) = stack.pop() {
        if !removed.contains(dep) {
            if seen.insert(dep) {
                result.push(dep.to_string());
            }
            continue;
        }
        if !expanded.insert(dep) {
            continue;
        }
        if let Some(removed_task) = by_id.get(dep) {
            stack.extend(removed_task.dependencies.iter().rev().map(String::as_str));
        }
    }

    result
}

/// Baseline and scenario schedules side by side.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioComparison {
    pub baseline: Timeline,
    pub scenario: Timeline,
    /// Positive when the scenario finishes earlier.
    pub days_saved: i64,
    /// Removed ids that were present in the baseline.
    pub removed: Vec<TaskId>,
}

pub fn compare_scenario(
    baseline: &[Task],
    scenario: &Scenario,
    reference_date: NaiveDate,
) -> Result<ScenarioComparison, TimelineError> {
    compare_scenario_with_config(baseline, scenario, reference_date, &EngineConfig::default())
}

/// Schedule the baseline and the transformed set and report the difference.
pub fn compare_scenario_with_config(
    baseline: &[Task],
    scenario: &Scenario,
    reference_date: NaiveDate,
    config: &EngineConfig,
) -> Result<ScenarioComparison, TimelineError> {
    let baseline_timeline = schedule_tasks_with_config(baseline, reference_date, config)?;
    let transformed = transform_with_config(baseline, scenario, config)?;
    let scenario_timeline = schedule_tasks_with_config(&transformed, reference_date, config)?;

    let removed = baseline
        .iter()
        .filter(|t| scenario.removed_ids.contains(&t.id))
        .map(|t| t.id.clone())
        .collect();

    Ok(ScenarioComparison {
        days_saved: baseline_timeline.fastest_completion - scenario_timeline.fastest_completion,
        baseline: baseline_timeline,
        scenario: scenario_timeline,
        removed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{validate, GraphError};

    fn make_task(id: &str, duration: i64, deps: &[&str]) -> Task {
        Task::new(id, id, duration).with_dependencies(deps.iter().copied())
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

    fn durations(tasks: &[Task]) -> Vec<i64> {
        tasks.iter().map(|t| t.duration_days).collect()
    }

    #[test]
    fn test_identity_returns_equal_set() {
        let tasks = approval_tasks();
        assert_eq!(transform(&tasks, &Scenario::identity()).unwrap(), tasks);
    }

    #[test]
    fn test_scale_duration_rounding() {
        assert_eq!(scale_duration(10, 0.3), 3); // 3.0000000000000004 in f64
        assert_eq!(scale_duration(7, 0.5), 4);
        assert_eq!(scale_duration(1, 0.1), 1); // floor of one day
        assert_eq!(scale_duration(3, 2.0), 6);
        assert_eq!(scale_duration(0, 0.5), 0);
        assert_eq!(scale_duration(-2, 0.5), -2);
    }

    #[test]
    fn test_unit_factor_is_exact_for_large_durations() {
        // 2^53 + 1 has no exact f64 representation
        let large = 9_007_199_254_740_993;
        assert_eq!(scale_duration(large, 1.0), large);

        let tasks = vec![make_task("big", large, &[])];
        assert_eq!(transform(&tasks, &Scenario::identity()).unwrap(), tasks);
    }

    #[test]
    fn test_duration_scaling() {
        let scenario = Scenario::identity().with_duration_factor(0.5);
        let result = transform(&approval_tasks(), &scenario).unwrap();
        assert_eq!(durations(&result), vec![2, 4, 5, 3, 3]);
    }

    #[test]
    fn test_expedite_applies_after_scaling() {
        // C: ceil(10 * 0.5) = 5, then ceil(5 * 0.7) = 4
        let scenario = Scenario::identity()
            .with_duration_factor(0.5)
            .expedite(["C"]);
        let result = transform(&approval_tasks(), &scenario).unwrap();
        assert_eq!(durations(&result), vec![2, 4, 4, 3, 3]);
    }

    #[test]
    fn test_baseline_is_not_mutated() {
        let tasks = approval_tasks();
        let scenario = Scenario::identity()
            .with_duration_factor(0.5)
            .remove(["B"]);
        let _ = transform(&tasks, &scenario).unwrap();
        assert_eq!(tasks, approval_tasks());
    }

    #[test]
    fn test_remove_drops_references() {
        let scenario = Scenario::identity().remove(["B"]);
        let result = transform(&approval_tasks(), &scenario).unwrap();

        let ids: Vec<&str> = result.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "C", "D", "E"]);
        let d = result.iter().find(|t| t.id == "D").unwrap();
        assert!(d.dependencies.is_empty());
        let e = result.iter().find(|t| t.id == "E").unwrap();
        assert_eq!(e.dependencies, vec!["C"]);
        assert!(validate(&result).is_ok());
    }

    #[test]
    fn test_remove_with_inherit_policy() {
        let scenario = Scenario::identity()
            .remove(["B"])
            .with_removal_policy(RemovalPolicy::Inherit);
        let result = transform(&approval_tasks(), &scenario).unwrap();

        let d = result.iter().find(|t| t.id == "D").unwrap();
        assert_eq!(d.dependencies, vec!["A"]);
        // A arrives through B, C is listed directly
        let e = result.iter().find(|t| t.id == "E").unwrap();
        assert_eq!(e.dependencies, vec!["A", "C"]);
    }

    #[test]
    fn test_inherit_follows_removed_chains() {
        let tasks = vec![
            make_task("a", 1, &[]),
            make_task("b", 1, &["a"]),
            make_task("c", 1, &["b"]),
            make_task("d", 1, &["c", "a"]),
        ];
        let scenario = Scenario::identity()
            .remove(["b", "c"])
            .with_removal_policy(RemovalPolicy::Inherit);
        let result = transform(&tasks, &scenario).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result[1].dependencies, vec!["a"]);
    }

    #[test]
    fn test_unknown_dependency_survives_transform() {
        let tasks = vec![make_task("a", 2, &["ghost"])];
        let result = transform(&tasks, &Scenario::identity().remove(["x"])).unwrap();
        assert!(matches!(
            validate(&result),
            Err(GraphError::UnknownDependency { .. })
        ));
    }

    #[test]
    fn test_invalid_factors() {
        for factor in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let scenario = Scenario::identity().with_duration_factor(factor);
            assert!(matches!(
                transform(&approval_tasks(), &scenario),
                Err(ScenarioError::InvalidFactor { .. })
            ));
        }

        let scenario = Scenario::identity().expedite(["A"]).with_expedite_factor(0.0);
        assert!(transform(&approval_tasks(), &scenario).is_err());
    }

    #[test]
    fn test_compare_scenario() {
        let reference = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let scenario = Scenario::identity().expedite(["C"]);
        let comparison = compare_scenario(&approval_tasks(), &scenario, reference).unwrap();

        // C: ceil(10 * 0.7) = 7 -> B and C tie at day 10, E ends on 15
        assert_eq!(comparison.baseline.fastest_completion, 18);
        assert_eq!(comparison.scenario.fastest_completion, 15);
        assert_eq!(comparison.days_saved, 3);
        assert!(comparison.removed.is_empty());
    }

    #[test]
    fn test_compare_reports_present_removals_only() {
        let reference = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let scenario = Scenario::identity().remove(["D", "missing"]);
        let comparison = compare_scenario(&approval_tasks(), &scenario, reference).unwrap();
        assert_eq!(comparison.removed, vec!["D"]);
        assert_eq!(comparison.days_saved, 0);
    }

    #[test]
    fn test_scenario_deserializes_with_defaults() {
        let scenario: Scenario = serde_json::from_str(r#"{"removed_ids": ["B"]}"#).unwrap();
        assert_eq!(scenario.removed_ids, vec!["B"]);
        assert_eq!(scenario.removal_policy, RemovalPolicy::Drop);
        assert!((scenario.duration_factor - 1.0).abs() < 1e-9);
    }
}
