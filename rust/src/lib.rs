//! Approval-timeline scheduling engine.
//!
//! Turns a set of approval steps with durations and dependencies into a
//! concrete schedule using the Critical Path Method, and supports what-if
//! scenarios and day-by-day progress simulation on top of it.
//!
//! Every stage is a pure function returning a fresh value:
//! scenario transform -> validation -> scheduling -> simulation -> queries.

pub mod config;
pub mod critical_path;
pub mod error;
pub mod interner;
pub mod logging;
pub mod models;
#[cfg(feature = "extension-module")]
mod python;
pub mod query;
pub mod scenario;
pub mod simulation;
pub mod sorting;
pub mod validation;

pub use config::EngineConfig;
pub use critical_path::{
    schedule, schedule_tasks, schedule_tasks_with_config, schedule_with_config, TaskTiming,
};
pub use error::TimelineError;
pub use models::{
    Priority, ProgressSnapshot, ScheduledTask, SimulatedTimeline, StatusCounts, Task, TaskId,
    TaskStatus, Timeline,
};
pub use query::{
    active_tasks, completion_percentage, critical_path_duration, days_remaining, next_tasks,
    next_tasks_with_config, slack_of,
};
pub use scenario::{
    compare_scenario, compare_scenario_with_config, scale_duration, transform,
    transform_with_config, RemovalPolicy, Scenario, ScenarioComparison, ScenarioError,
};
pub use simulation::{
    progress_series, simulate, simulate_with_config, simulate_with_outstanding, SimulationError,
};
pub use validation::{validate, validate_with_config, GraphError, ValidatedTaskSet};
