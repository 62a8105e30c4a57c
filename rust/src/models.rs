//! Core data types for the timeline engine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Stable task identifier. Never reused within a task set.
pub type TaskId = String;

/// Ordering hint used only to break ties between otherwise equal tasks.
///
/// Declaration order matters: `Low < Medium < High < Critical`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

/// Status of a task relative to a simulated "current day".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    /// The task's window has opened but a dependency is not complete.
    Blocked,
    Completed,
}

/// One approval step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    /// Working time once the step has started. Must be positive.
    pub duration_days: i64,
    /// Tasks that must be complete before this one may start.
    #[serde(default)]
    pub dependencies: Vec<TaskId>,
    /// Responsible party. Opaque to the engine.
    #[serde(default)]
    pub authority: String,
    #[serde(default)]
    pub priority: Priority,
}

impl Task {
    /// Create a task with no dependencies, no authority and `Medium` priority.
    pub fn new(id: impl Into<TaskId>, name: impl Into<String>, duration_days: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            duration_days,
            dependencies: Vec::new(),
            authority: String::new(),
            priority: Priority::default(),
        }
    }

    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<TaskId>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = authority.into();
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn has_dependencies(&self) -> bool {
        !self.dependencies.is_empty()
    }
}

/// A task together with the fields computed by the scheduler.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledTask {
    #[serde(flatten)]
    pub task: Task,
    /// Earliest start, in days from the reference date.
    pub start_day: i64,
    /// `start_day + duration_days`.
    pub end_day: i64,
    pub latest_start: i64,
    pub latest_finish: i64,
    pub slack: i64,
    pub is_critical_path: bool,
    pub can_run_in_parallel: bool,
    /// Only populated by the progress simulator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

impl ScheduledTask {
    pub fn id(&self) -> &str {
        &self.task.id
    }

    pub fn duration_days(&self) -> i64 {
        self.task.duration_days
    }

    pub fn dependencies(&self) -> &[TaskId] {
        &self.task.dependencies
    }

    pub fn priority(&self) -> Priority {
        self.task.priority
    }

    /// Whether `day` falls inside the half-open window `[start_day, end_day)`.
    pub fn is_active_on(&self, day: i64) -> bool {
        self.start_day <= day && day < self.end_day
    }
}

/// Result of scheduling a validated task set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    /// Computed tasks in input order.
    pub tasks: Vec<ScheduledTask>,
    pub reference_date: NaiveDate,
    /// Maximum `end_day` over all tasks.
    pub fastest_completion: i64,
    /// `reference_date + fastest_completion` calendar days.
    pub completion_date: NaiveDate,
    /// Zero-slack chain from a source to a sink, in dependency order.
    pub critical_path: Vec<TaskId>,
    /// Groups in which every pair of tasks is unrelated by dependency and has
    /// overlapping windows. A task may appear in more than one group.
    pub parallel_groups: Vec<Vec<TaskId>>,
    /// Sum of every task's duration.
    pub total_work: i64,
}

impl Timeline {
    pub fn get(&self, id: &str) -> Option<&ScheduledTask> {
        self.tasks.iter().find(|t| t.task.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Input tasks without computed fields, in input order.
    pub fn base_tasks(&self) -> Vec<Task> {
        self.tasks.iter().map(|t| t.task.clone()).collect()
    }
}

/// Per-status task counts for a simulated day.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub in_progress: usize,
    pub blocked: usize,
    pub completed: usize,
}

impl StatusCounts {
    pub fn total(&self) -> usize {
        self.pending + self.in_progress + self.blocked + self.completed
    }

    pub(crate) fn record(&mut self, status: TaskStatus) {
        match status {
            TaskStatus::Pending => self.pending += 1,
            TaskStatus::InProgress => self.in_progress += 1,
            TaskStatus::Blocked => self.blocked += 1,
            TaskStatus::Completed => self.completed += 1,
        }
    }
}

/// A timeline annotated with task status at `current_day`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulatedTimeline {
    /// Every task carries `Some(status)`.
    pub timeline: Timeline,
    pub current_day: i64,
    pub completion_percentage: f64,
    pub days_remaining: i64,
}

impl SimulatedTimeline {
    pub fn status_of(&self, id: &str) -> Option<TaskStatus> {
        self.timeline.get(id).and_then(|t| t.status)
    }

    pub fn status_counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for status in self.timeline.tasks.iter().filter_map(|t| t.status) {
            counts.record(status);
        }
        counts
    }
}

/// Aggregate progress at one point of a time-sliced simulation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub day: i64,
    pub completion_percentage: f64,
    pub days_remaining: i64,
    pub counts: StatusCounts,
}
