//! Types for critical path scheduling.

/// Per-task timing from the forward and backward passes, in whole days.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TaskTiming {
    /// Earliest possible start time (from forward pass).
    pub earliest_start: i64,
    /// Earliest possible finish time (from forward pass).
    pub earliest_finish: i64,
    /// Latest allowable start time (from backward pass).
    pub latest_start: i64,
    /// Latest allowable finish time (from backward pass).
    pub latest_finish: i64,
    /// Slack = latest_start - earliest_start.
    pub slack: i64,
}

impl TaskTiming {
    pub fn is_critical(&self) -> bool {
        self.slack == 0
    }

    /// Whether the earliest windows `[start, finish)` of two tasks intersect.
    pub fn overlaps(&self, other: &TaskTiming) -> bool {
        self.earliest_start < other.earliest_finish && other.earliest_start < self.earliest_finish
    }
}
