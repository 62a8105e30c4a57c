//! Critical path calculation using forward and backward passes.

use crate::interner::TaskIdx;
use crate::validation::ValidatedTaskSet;
use crate::log_debug;

use super::types::TaskTiming;

/// Timings for every task of a validated set, indexed like the set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CriticalPathResult {
    pub task_timings: Vec<TaskTiming>,
    /// Maximum earliest finish over all tasks.
    pub fastest_completion: i64,
    /// Sum of all task durations.
    pub total_work: i64,
}

impl CriticalPathResult {
    pub fn timing(&self, idx: TaskIdx) -> &TaskTiming {
        &self.task_timings[idx]
    }
}

/// Run the forward and backward passes over a validated task set.
///
/// Every task is placed at its earliest feasible start; there is no resource
/// contention that could justify a delay.
pub fn calculate_critical_path(set: &ValidatedTaskSet, verbosity: u8) -> CriticalPathResult {
    let tasks = set.tasks();
    let topo_order = set.topological_order();
    let mut task_timings = vec![TaskTiming::default(); tasks.len()];
    let mut total_work = 0;

    // Forward pass: earliest start = max finish of dependencies.
    // Validation caps the summed duration at i64::MAX, so no day overflows.
    for &idx in topo_order {
        let duration = tasks[idx].duration_days;
        total_work += duration;

        let earliest_start = set
            .dependencies_of(idx)
            .iter()
            .map(|&dep| task_timings[dep].earliest_finish)
            .max()
            .unwrap_or(0);

        let timing = &mut task_timings[idx];
        timing.earliest_start = earliest_start;
        timing.earliest_finish = earliest_start + duration;
    }

    let fastest_completion = task_timings
        .iter()
        .map(|t| t.earliest_finish)
        .max()
        .unwrap_or(0);

    // Backward pass: latest finish = min latest start of dependents
    for &idx in topo_order.iter().rev() {
        let latest_finish = set
            .dependents_of(idx)
            .iter()
            .map(|&dependent| task_timings[dependent].latest_start)
            .min()
            .unwrap_or(fastest_completion);

        let timing = &mut task_timings[idx];
        timing.latest_finish = latest_finish;
        timing.latest_start = latest_finish - tasks[idx].duration_days;
        timing.slack = timing.latest_start - timing.earliest_start;

        log_debug!(
            verbosity,
            "{}: es={} ef={} ls={} lf={} slack={}",
            tasks[idx].id,
            timing.earliest_start,
            timing.earliest_finish,
            timing.latest_start,
            timing.latest_finish,
            timing.slack
        );
    }

    CriticalPathResult {
        task_timings,
        fastest_completion,
        total_work,
    }
}
