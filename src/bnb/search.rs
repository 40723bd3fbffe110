//! Depth-first branch-and-bound over items in ratio order.
//!
//! # Algorithm
//!
//! 1. Preprocess: drop items that can never improve a selection (self
//!    conflicts, heavier than the capacity, zero value), sort the rest by
//!    non-increasing value/weight, ties by original index
//! 2. Optionally seed the incumbent with a greedy fill
//! 3. At each node (next undecided item `k`):
//!    a. stop if the time budget or cancellation flag says so
//!    b. record the current selection if it beats the incumbent
//!    c. prune if `value + bound(k) <= incumbent`
//!    d. branch "include `k`" (when it fits and no picked item conflicts
//!       with it), then "exclude `k`"
//!
//! The tree is walked with an explicit stack. A conflict is checked in O(1)
//! through a per-item counter of picked neighbours.

use std::cmp::Ordering as CmpOrdering;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use log::trace;

use super::bound::fractional_bound;
use super::termination::Termination;
use super::types::SearchStats;
use crate::error::SolveError;
use crate::instance::Instance;

/// An item that survived preprocessing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Item {
    /// Index in the original instance.
    pub index: usize,
    pub weight: i64,
    pub value: i64,
}

/// Search-ready view of an instance.
#[derive(Debug, Clone)]
pub(crate) struct Prepared {
    /// Candidate items in branching order.
    pub items: Vec<Item>,
    /// Conflict neighbours of each position, as positions.
    pub neighbours: Vec<Vec<usize>>,
    pub capacity: i64,
}

impl Prepared {
    pub(crate) fn new(instance: &Instance) -> Result<Self, SolveError> {
        let capacity = instance.capacity();
        let mut excluded = vec![false; instance.num_items()];
        for i in instance.excluded_items() {
            excluded[i] = true;
        }

        let mut items: Vec<Item> = instance
            .weights()
            .iter()
            .zip(instance.values())
            .enumerate()
            .filter(|&(i, (&w, &v))| !excluded[i] && w <= capacity && v > 0)
            .map(|(index, (&weight, &value))| Item { index, weight, value })
            .collect();

        let mut total_weight = 0i64;
        let mut total_value = 0i64;
        for item in &items {
            total_weight = total_weight
                .checked_add(item.weight)
                .ok_or(SolveError::Overflow { what: "item weights" })?;
            total_value = total_value
                .checked_add(item.value)
                .ok_or(SolveError::Overflow { what: "item values" })?;
        }

        items.sort_by(by_ratio);

        let mut position = vec![usize::MAX; instance.num_items()];
        for (k, item) in items.iter().enumerate() {
            position[item.index] = k;
        }
        let graph = instance.conflict_graph();
        let neighbours = items
            .iter()
            .map(|item| {
                let mut adj: Vec<usize> = graph[item.index]
                    .iter()
                    .map(|&j| position[j])
                    .filter(|&p| p != usize::MAX)
                    .collect();
                adj.sort_unstable();
                adj
            })
            .collect();

        Ok(Self {
            items,
            neighbours,
            capacity,
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    /// Original indices of a selection given as positions, ascending.
    pub(crate) fn original_indices(&self, positions: &[usize]) -> Vec<usize> {
        let mut picked: Vec<usize> = positions.iter().map(|&k| self.items[k].index).collect();
        picked.sort_unstable();
        picked
    }

    /// Takes items in branching order whenever they fit and do not conflict.
    pub(crate) fn greedy(&self) -> Incumbent {
        let mut blocked = vec![false; self.len()];
        let mut incumbent = Incumbent::empty();
        for (k, item) in self.items.iter().enumerate() {
            if blocked[k] || incumbent.weight + item.weight > self.capacity {
                continue;
            }
            incumbent.weight += item.weight;
            incumbent.value += item.value;
            incumbent.selection.push(k);
            for &nb in &self.neighbours[k] {
                blocked[nb] = true;
            }
        }
        incumbent
    }
}

/// Non-increasing value/weight, zero weights first, ties by original index.
fn by_ratio(a: &Item, b: &Item) -> CmpOrdering {
    let lhs = a.value as i128 * b.weight as i128;
    let rhs = b.value as i128 * a.weight as i128;
    rhs.cmp(&lhs).then(a.index.cmp(&b.index))
}

/// Best selection known, as positions into [`Prepared::items`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Incumbent {
    pub value: i64,
    pub weight: i64,
    pub selection: Vec<usize>,
}

impl Incumbent {
    pub(crate) fn empty() -> Self {
        Self::default()
    }
}

/// Incumbent shared by parallel workers.
///
/// `value` only ever grows and never exceeds the value of the selection
/// stored under the mutex, so pruning against it is always sound.
#[derive(Debug)]
pub(crate) struct SharedIncumbent {
    value: AtomicI64,
    best: Mutex<Incumbent>,
}

impl SharedIncumbent {
    pub(crate) fn new(initial: Incumbent) -> Self {
        Self {
            value: AtomicI64::new(initial.value),
            best: Mutex::new(initial),
        }
    }

    pub(crate) fn value(&self) -> i64 {
        self.value.load(Ordering::Acquire)
    }

    /// Replaces the stored selection if `candidate` is strictly better.
    pub(crate) fn offer(&self, candidate: &Incumbent) -> Result<bool, SolveError> {
        let mut best = self
            .best
            .lock()
            .map_err(|_| SolveError::Internal("shared incumbent lock poisoned".into()))?;
        if candidate.value <= best.value {
            return Ok(false);
        }
        *best = candidate.clone();
        self.value.fetch_max(candidate.value, Ordering::AcqRel);
        Ok(true)
    }

    pub(crate) fn into_inner(self) -> Result<Incumbent, SolveError> {
        self.best
            .into_inner()
            .map_err(|_| SolveError::Internal("shared incumbent lock poisoned".into()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Branch {
    /// Not expanded yet.
    Fresh,
    /// The include branch is being explored.
    Included,
    /// Both branches are done or scheduled.
    Excluded,
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    pos: usize,
    branch: Branch,
}

/// State of one depth-first search.
pub(crate) struct Search<'a> {
    problem: &'a Prepared,
    shared: Option<&'a SharedIncumbent>,
    termination: &'a Termination,
    /// Number of picked items conflicting with each position.
    blocked: Vec<u32>,
    picked: Vec<usize>,
    weight: i64,
    value: i64,
    best: Incumbent,
    stats: SearchStats,
}

impl<'a> Search<'a> {
    pub(crate) fn new(
        problem: &'a Prepared,
        incumbent: Incumbent,
        shared: Option<&'a SharedIncumbent>,
        termination: &'a Termination,
    ) -> Self {
        Self {
            problem,
            shared,
            termination,
            blocked: vec![0; problem.len()],
            picked: Vec::with_capacity(problem.len()),
            weight: 0,
            value: 0,
            best: incumbent,
            stats: SearchStats::default(),
        }
    }

    pub(crate) fn into_parts(self) -> (Incumbent, SearchStats) {
        (self.best, self.stats)
    }

    /// Whether position `k` can be added to the current selection.
    fn can_include(&self, k: usize) -> bool {
        self.blocked[k] == 0 && self.problem.items[k].weight <= self.problem.capacity - self.weight
    }

    fn include(&mut self, k: usize) {
        let item = self.problem.items[k];
        self.weight += item.weight;
        self.value += item.value;
        self.picked.push(k);
        for &nb in &self.problem.neighbours[k] {
            self.blocked[nb] += 1;
        }
    }

    fn undo_include(&mut self, k: usize) {
        let item = self.problem.items[k];
        self.weight -= item.weight;
        self.value -= item.value;
        self.picked.pop();
        for &nb in &self.problem.neighbours[k] {
            self.blocked[nb] -= 1;
        }
    }

    /// Value a node must beat to be worth exploring.
    fn threshold(&self) -> i64 {
        match self.shared {
            Some(shared) => self.best.value.max(shared.value()),
            None => self.best.value,
        }
    }

    fn record(&mut self) -> Result<(), SolveError> {
        self.best = Incumbent {
            value: self.value,
            weight: self.weight,
            selection: self.picked.clone(),
        };
        self.stats.improvements += 1;
        trace!("incumbent improved to {} (weight {})", self.value, self.weight);
        if let Some(shared) = self.shared {
            shared.offer(&self.best)?;
        }
        Ok(())
    }

    /// Fixes the first `prefix.len()` decisions; `true` means include.
    ///
    /// Fails if the prefix is not feasible.
    pub(crate) fn apply_prefix(&mut self, prefix: &[bool]) -> Result<(), SolveError> {
        for (k, &take) in prefix.iter().enumerate() {
            if !take {
                continue;
            }
            if !self.can_include(k) {
                return Err(SolveError::Internal(format!(
                    "prefix includes infeasible position {k}"
                )));
            }
            self.include(k);
        }
        Ok(())
    }

    /// Explores the subtree below position `start` with the current partial
    /// selection. Returns `Ok(true)` when the subtree was exhausted and
    /// `Ok(false)` when the search stopped early.
    pub(crate) fn explore(&mut self, start: usize) -> Result<bool, SolveError> {
        let m = self.problem.len();
        let mut stack = vec![Frame {
            pos: start,
            branch: Branch::Fresh,
        }];

        while let Some(&Frame { pos, branch }) = stack.last() {
            let top = stack.len() - 1;
            match branch {
                Branch::Fresh => {
                    if self.termination.should_stop() {
                        return Ok(false);
                    }
                    self.stats.nodes += 1;

                    if self.weight > self.problem.capacity {
                        return Err(SolveError::Internal(format!(
                            "selection weight {} exceeds capacity {}",
                            self.weight, self.problem.capacity
                        )));
                    }
                    if self.value > self.threshold() {
                        self.record()?;
                    }
                    if pos == m {
                        stack.pop();
                        continue;
                    }

                    let bound = fractional_bound(
                        &self.problem.items,
                        pos,
                        self.problem.capacity - self.weight,
                        &self.blocked,
                    );
                    if self.value + bound <= self.threshold() {
                        self.stats.pruned += 1;
                        stack.pop();
                        continue;
                    }

                    if self.can_include(pos) {
                        self.include(pos);
                        stack[top].branch = Branch::Included;
                    } else {
                        stack[top].branch = Branch::Excluded;
                    }
                    stack.push(Frame {
                        pos: pos + 1,
                        branch: Branch::Fresh,
                    });
                }
                Branch::Included => {
                    self.undo_include(pos);
                    stack[top].branch = Branch::Excluded;
                    stack.push(Frame {
                        pos: pos + 1,
                        branch: Branch::Fresh,
                    });
                }
                Branch::Excluded => {
                    stack.pop();
                }
            }
        }
        Ok(true)
    }
}

/// Enumerates the feasible include/exclude assignments of the first `depth`
/// positions, include-first. Every node of the search tree above `depth`
/// has the same selection as one of the returned prefixes, so exploring the
/// subtree of each prefix covers the whole tree.
///
/// Returns `None` if `termination` fires before the enumeration is complete.
pub(crate) fn feasible_prefixes(
    problem: &Prepared,
    depth: usize,
    termination: &Termination,
) -> Option<Vec<Vec<bool>>> {
    struct Walk<'a> {
        problem: &'a Prepared,
        depth: usize,
        termination: &'a Termination,
        blocked: Vec<u32>,
        prefix: Vec<bool>,
        out: Vec<Vec<bool>>,
    }

    impl Walk<'_> {
        /// `false` once the enumeration was cut short.
        fn descend(&mut self, weight: i64) -> bool {
            if self.termination.should_stop() {
                return false;
            }
            let k = self.prefix.len();
            if k == self.depth {
                self.out.push(self.prefix.clone());
                return true;
            }
            let item = self.problem.items[k];
            if self.blocked[k] == 0 && item.weight <= self.problem.capacity - weight {
                for &nb in &self.problem.neighbours[k] {
                    self.blocked[nb] += 1;
                }
                self.prefix.push(true);
                let finished = self.descend(weight + item.weight);
                self.prefix.pop();
                for &nb in &self.problem.neighbours[k] {
                    self.blocked[nb] -= 1;
                }
                if !finished {
                    return false;
                }
            }
            self.prefix.push(false);
            let finished = self.descend(weight);
            self.prefix.pop();
            finished
        }
    }

    let depth = depth.min(problem.len());
    let mut walk = Walk {
        problem,
        depth,
        termination,
        blocked: vec![0; problem.len()],
        prefix: Vec::with_capacity(depth),
        out: Vec::new(),
    };
    if walk.descend(0) {
        Some(walk.out)
    } else {
        None
    }
}
