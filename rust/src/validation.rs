//! Graph validation for task sets.
//!
//! Checks structural integrity before scheduling:
//! - Duplicate task ids
//! - Non-positive durations, and totals that would overflow `i64`
//! - Dependencies on ids outside the set
//! - Circular dependencies (three-colour DFS)
//!
//! A successful validation yields a [`ValidatedTaskSet`] that carries the
//! resolved adjacency and a topological order for the scheduler.

use thiserror::Error;

use crate::config::EngineConfig;
use crate::interner::{TaskIdx, TaskIndex};
use crate::models::{Task, TaskId};
use crate::{log_changes, log_checks};

/// Errors that make a task set unschedulable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// Each id in `cycle` depends on the next; the last depends on the first.
    #[error("Circular dependency detected: {}", format_cycle(cycle))]
    CycleDetected { cycle: Vec<TaskId> },
    #[error("Task {task} depends on unknown task {missing}")]
    UnknownDependency { task: TaskId, missing: TaskId },
    #[error("Task {task} has a non-positive duration")]
    InvalidDuration { task: TaskId },
    #[error("Task id {task} appears more than once")]
    DuplicateTask { task: TaskId },
    /// Adding `task` pushes the summed duration past `i64::MAX`.
    #[error("Total duration overflows at task {task}")]
    DurationOverflow { task: TaskId },
}

fn format_cycle(cycle: &[TaskId]) -> String {
    let mut parts: Vec<&str> = cycle.iter().map(String::as_str).collect();
    if let Some(first) = cycle.first() {
        parts.push(first);
    }
    parts.join(" -> ")
}

/// A task set known to form a DAG with positive durations.
///
/// Only constructible through [`validate`], so the scheduler can rely on it.
#[derive(Debug, Clone)]
pub struct ValidatedTaskSet {
    tasks: Vec<Task>,
    index: TaskIndex,
    /// Resolved, de-duplicated dependencies per task.
    deps: Vec<Vec<TaskIdx>>,
    /// Reverse of `deps`.
    dependents: Vec<Vec<TaskIdx>>,
    /// Dependencies before dependents; ties follow input order.
    topo_order: Vec<TaskIdx>,
}

impl ValidatedTaskSet {
    /// Tasks in input order. A [`TaskIdx`] indexes into this slice.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Id lookup for the tasks in this set.
    pub fn index(&self) -> &TaskIndex {
        &self.index
    }

    /// Direct dependencies of `idx`, without duplicates, in listed order.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of range.
    pub fn dependencies_of(&self, idx: TaskIdx) -> &[TaskIdx] {
        &self.deps[idx]
    }

    /// Tasks that list `idx` as a direct dependency.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of range.
    pub fn dependents_of(&self, idx: TaskIdx) -> &[TaskIdx] {
        &self.dependents[idx]
    }

    /// Every task after all of its dependencies.
    pub fn topological_order(&self) -> &[TaskIdx] {
        &self.topo_order
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Give back the owned tasks, dropping the resolved graph.
    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }
}

/// Validate a task set with default configuration.
pub fn validate(tasks: &[Task]) -> Result<ValidatedTaskSet, GraphError> {
    validate_with_config(tasks, &EngineConfig::default())
}

/// Validate a task set.
///
/// Checks run in order (ids, durations, dependency references, cycles) and the
/// first failure is returned. Nothing is ever corrected implicitly.
pub fn validate_with_config(
    tasks: &[Task],
    config: &EngineConfig,
) -> Result<ValidatedTaskSet, GraphError> {
    let verbosity = config.verbosity;

    let mut index = TaskIndex::with_capacity(tasks.len());
    for task in tasks {
        if index.insert(&task.id).is_err() {
            log_checks!(verbosity, "Rejected duplicate task id {}", task.id);
            return Err(GraphError::DuplicateTask {
                task: task.id.clone(),
            });
        }
    }

    let mut deps: Vec<Vec<TaskIdx>> = vec![Vec::new(); tasks.len()];
    let mut dependents: Vec<Vec<TaskIdx>> = vec![Vec::new(); tasks.len()];
    // Bounds every start and finish day the passes can produce.
    let mut total_duration: i64 = 0;

    for (idx, task) in tasks.iter().enumerate() {
        if task.duration_days <= 0 {
            log_checks!(
                verbosity,
                "Rejected task {} with duration {}",
                task.id,
                task.duration_days
            );
            return Err(GraphError::InvalidDuration {
                task: task.id.clone(),
            });
        }
        total_duration = match total_duration.checked_add(task.duration_days) {
            Some(sum) => sum,
            None => {
                log_checks!(verbosity, "Total duration overflows at task {}", task.id);
                return Err(GraphError::DurationOverflow {
                    task: task.id.clone(),
                });
            }
        };

        for dep_id in &task.dependencies {
            let Some(dep_idx) = index.get(dep_id) else {
                log_checks!(verbosity, "Task {} depends on unknown {}", task.id, dep_id);
                return Err(GraphError::UnknownDependency {
                    task: task.id.clone(),
                    missing: dep_id.clone(),
                });
            };
            if !deps[idx].contains(&dep_idx) {
                deps[idx].push(dep_idx);
                dependents[dep_idx].push(idx);
            }
        }
    }

    let topo_order = topological_order(&deps, &index)?;
    log_changes!(verbosity, "Validated {} tasks", tasks.len());

    Ok(ValidatedTaskSet {
        tasks: tasks.to_vec(),
        index,
        deps,
        dependents,
        topo_order,
    })
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    White,
    Gray,
    Black,
}

/// Depth-first post-order over dependency edges.
///
/// Roots are visited in input order and dependencies in listed order, so the
/// result is deterministic. A gray node reached again is a back edge.
fn topological_order(
    deps: &[Vec<TaskIdx>],
    index: &TaskIndex,
) -> Result<Vec<TaskIdx>, GraphError> {
    let n = deps.len();
    let mut marks = vec![Mark::White; n];
    let mut order = Vec::with_capacity(n);
    // (task, position of the next dependency to visit)
    let mut stack: Vec<(TaskIdx, usize)> = Vec::new();

    for root in 0..n {
        if marks[root] != Mark::White {
            continue;
        }
        marks[root] = Mark::Gray;
        stack.push((root, 0));

        while let Some(frame) = stack.last_mut() {
            let (node, pos) = *frame;
            match deps[node].get(pos) {
                Some(&dep) => {
                    frame.1 += 1;
                    match marks[dep] {
                        Mark::White => {
                            marks[dep] = Mark::Gray;
                            stack.push((dep, 0));
                        }
                        Mark::Gray => {
                            let start = stack.iter().position(|&(t, _)| t == dep).unwrap_or(0);
                            let cycle = stack[start..]
                                .iter()
                                .filter_map(|&(t, _)| index.resolve(t).map(str::to_string))
                                .collect();
                            return Err(GraphError::CycleDetected { cycle });
                        }
                        Mark::Black => {}
                    }
                }
                None => {
                    marks[node] = Mark::Black;
                    order.push(node);
                    stack.pop();
                }
            }
        }
    }

    Ok(order)
}
