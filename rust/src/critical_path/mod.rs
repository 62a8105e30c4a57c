//! Critical path scheduling.
//!
//! Forward and backward passes over a validated DAG, followed by critical
//! path extraction and parallel group detection.

mod calculation;
mod parallel;
mod path;
mod scheduler;
mod types;

pub use calculation::{calculate_critical_path, CriticalPathResult};
pub use parallel::{ancestor_sets, detect_parallel_groups, ParallelAnalysis};
pub use path::extract_critical_path;
pub use scheduler::{schedule, schedule_tasks, schedule_tasks_with_config, schedule_with_config};
pub use types::TaskTiming;
