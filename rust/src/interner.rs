//! Dense integer indexing for task ids.
//!
//! Maps string ids to positions in the caller's task list so the passes
//! can work on plain vectors instead of string-keyed maps.

use rustc_hash::FxHashMap;

/// Position of a task in its (input-ordered) task list.
pub type TaskIdx = usize;

/// Bidirectional id <-> index mapping that preserves insertion order.
#[derive(Debug, Clone, Default)]
pub struct TaskIndex {
    to_idx: FxHashMap<String, TaskIdx>,
    from_idx: Vec<String>,
}

impl TaskIndex {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            to_idx: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            from_idx: Vec::with_capacity(capacity),
        }
    }

    /// Register an id and return its index.
    ///
    /// Returns `Err` with the existing index if the id is already present.
    pub fn insert(&mut self, id: &str) -> Result<TaskIdx, TaskIdx> {
        if let Some(&existing) = self.to_idx.get(id) {
            return Err(existing);
        }
        let idx = self.from_idx.len();
        self.from_idx.push(id.to_string());
        self.to_idx.insert(id.to_string(), idx);
        Ok(idx)
    }

    #[inline]
    pub fn get(&self, id: &str) -> Option<TaskIdx> {
        self.to_idx.get(id).copied()
    }

    #[inline]
    pub fn resolve(&self, idx: TaskIdx) -> Option<&str> {
        self.from_idx.get(idx).map(|s| s.as_str())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.to_idx.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.from_idx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.from_idx.is_empty()
    }
}
