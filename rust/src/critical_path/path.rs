//! Critical path extraction.

use std::cmp::Reverse;

use crate::interner::TaskIdx;
use crate::validation::ValidatedTaskSet;

use super::calculation::CriticalPathResult;

/// Walk the zero-slack chain from the latest-finishing critical sink back to a source.
///
/// At every step the candidate with the largest finish wins; equal finishes
/// go to the lexicographically smallest id. Returns the chain in dependency
/// order (source first).
pub fn extract_critical_path(
    set: &ValidatedTaskSet,
    result: &CriticalPathResult,
) -> Vec<TaskIdx> {
    let sinks = (0..set.len()).filter(|&idx| set.dependents_of(idx).is_empty());
    let Some(mut current) = pick_latest_critical(set, result, sinks) else {
        return Vec::new();
    };

    let mut path = vec![current];
    while let Some(prev) =
        pick_latest_critical(set, result, set.dependencies_of(current).iter().copied())
    {
        path.push(prev);
        current = prev;
    }

    path.reverse();
    path
}

fn pick_latest_critical(
    set: &ValidatedTaskSet,
    result: &CriticalPathResult,
    candidates: impl Iterator<Item = TaskIdx>,
) -> Option<TaskIdx> {
    let tasks = set.tasks();
    candidates
        .filter(|&idx| result.timing(idx).is_critical())
        .max_by_key(|&idx| {
            (
                result.timing(idx).earliest_finish,
                Reverse(tasks[idx].id.as_str()),
            )
        })
}
