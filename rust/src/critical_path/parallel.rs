//! Parallel group detection.
//!
//! Two tasks run in parallel when neither is a transitive dependency of the
//! other and their scheduled windows overlap. Connected components of that
//! relation come from a disjoint-set forest; each component is then split so
//! that every pair inside a group can run in parallel.

use rustc_hash::FxHashSet;

use crate::interner::TaskIdx;
use crate::validation::ValidatedTaskSet;

use super::calculation::CriticalPathResult;

/// Union-find with path halving and union by rank.
struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }
}

/// Per-task parallel flags and the resulting groups.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParallelAnalysis {
    /// Indexed like the task set.
    pub can_run_in_parallel: Vec<bool>,
    /// Members are pairwise unrelated and overlapping, listed in input order;
    /// groups are sorted. Tasks without any partner are omitted.
    pub groups: Vec<Vec<TaskIdx>>,
}

/// Transitive dependencies of every task, computed in topological order.
pub fn ancestor_sets(set: &ValidatedTaskSet) -> Vec<FxHashSet<TaskIdx>> {
    let mut ancestors: Vec<FxHashSet<TaskIdx>> = vec![FxHashSet::default(); set.len()];
    for &idx in set.topological_order() {
        let mut acc = FxHashSet::default();
        for &dep in set.dependencies_of(idx) {
            acc.insert(dep);
            acc.extend(ancestors[dep].iter().copied());
        }
        ancestors[idx] = acc;
    }
    ancestors
}

/// Find tasks that can run in parallel and group them.
///
/// Connected components of the "unrelated and overlapping" relation are found
/// with union-find, then each component is split first-fit (input order) into
/// groups whose members are pairwise unrelated and overlapping. A task that
/// fits no group with others is paired with its first compatible partner, so
/// every flagged task appears in at least one group.
pub fn detect_parallel_groups(
    set: &ValidatedTaskSet,
    result: &CriticalPathResult,
) -> ParallelAnalysis {
    let n = set.len();
    let ancestors = ancestor_sets(set);
    let compatible = |i: TaskIdx, j: TaskIdx| {
        i != j
            && !ancestors[i].contains(&j)
            && !ancestors[j].contains(&i)
            && result.timing(i).overlaps(result.timing(j))
    };

    let mut forest = DisjointSet::new(n);
    let mut can_run_in_parallel = vec![false; n];
    for i in 0..n {
        for j in (i + 1)..n {
            if compatible(i, j) {
                forest.union(i, j);
                can_run_in_parallel[i] = true;
                can_run_in_parallel[j] = true;
            }
        }
    }

    // root -> position in `components`
    let mut slot: Vec<Option<usize>> = vec![None; n];
    let mut components: Vec<Vec<TaskIdx>> = Vec::new();
    for idx in (0..n).filter(|&idx| can_run_in_parallel[idx]) {
        let root = forest.find(idx);
        match slot[root] {
            Some(pos) => components[pos].push(idx),
            None => {
                slot[root] = Some(components.len());
                components.push(vec![idx]);
            }
        }
    }

    let mut groups: Vec<Vec<TaskIdx>> = Vec::new();
    for component in components {
        let mut split: Vec<Vec<TaskIdx>> = Vec::new();
        for &idx in &component {
            match split
                .iter_mut()
                .find(|group| group.iter().all(|&member| compatible(member, idx)))
            {
                Some(group) => group.push(idx),
                None => split.push(vec![idx]),
            }
        }
        for mut group in split {
            if group.len() == 1 {
                let lone = group[0];
                if let Some(&partner) = component.iter().find(|&&other| compatible(other, lone)) {
                    group.push(partner);
                    group.sort_unstable();
                }
            }
            groups.push(group);
        }
    }
    groups.sort();
    groups.dedup();

    ParallelAnalysis {
        can_run_in_parallel,
        groups,
    }
}
