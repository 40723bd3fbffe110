//! Validated knapsack-with-conflicts instances.

use crate::error::{SolutionError, ValidationError};

/// An unordered pair of items that may not both be picked.
///
/// The pair is normalized so that `a <= b`. A pair with `a == b` is a hard
/// exclusion: the item can never be picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Conflict {
    pub a: usize,
    pub b: usize,
}

impl Conflict {
    pub fn new(i: usize, j: usize) -> Self {
        Self {
            a: i.min(j),
            b: i.max(j),
        }
    }

    /// Whether this pair excludes a single item.
    pub fn is_self_loop(&self) -> bool {
        self.a == self.b
    }
}

impl From<(usize, usize)> for Conflict {
    fn from((i, j): (usize, usize)) -> Self {
        Conflict::new(i, j)
    }
}

/// A knapsack instance with pairwise item conflicts.
///
/// Construction validates the data once; afterwards the instance is
/// immutable and every accessor can rely on the invariants:
///
/// - `weights.len() == values.len()`
/// - capacity, weights and values are non-negative
/// - every conflict endpoint is a valid item index
///
/// # Examples
///
/// ```
/// use conflict_knapsack::instance::Instance;
///
/// let instance = Instance::new(vec![2, 3], vec![3, 4], 4, vec![(0, 1)]).unwrap();
/// assert_eq!(instance.num_items(), 2);
/// assert!(instance.check_selection(&[0, 1]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    weights: Vec<i64>,
    values: Vec<i64>,
    capacity: i64,
    conflicts: Vec<Conflict>,
}

impl Instance {
    /// Validates the raw data and builds an instance.
    pub fn new(
        weights: Vec<i64>,
        values: Vec<i64>,
        capacity: i64,
        conflicts: impl IntoIterator<Item = (usize, usize)>,
    ) -> Result<Self, ValidationError> {
        if weights.len() != values.len() {
            return Err(ValidationError::LengthMismatch {
                weights: weights.len(),
                values: values.len(),
            });
        }
        if capacity < 0 {
            return Err(ValidationError::NegativeCapacity(capacity));
        }
        if let Some((item, &weight)) = weights.iter().enumerate().find(|&(_, &w)| w < 0) {
            return Err(ValidationError::NegativeWeight { item, weight });
        }
        if let Some((item, &value)) = values.iter().enumerate().find(|&(_, &v)| v < 0) {
            return Err(ValidationError::NegativeValue { item, value });
        }

        let num_items = weights.len();
        let conflicts: Vec<Conflict> = conflicts.into_iter().map(Into::into).collect();
        for (index, c) in conflicts.iter().enumerate() {
            if c.b >= num_items {
                return Err(ValidationError::ConflictOutOfRange {
                    index,
                    a: c.a,
                    b: c.b,
                    num_items,
                });
            }
        }

        Ok(Self {
            weights,
            values,
            capacity,
            conflicts,
        })
    }

    /// Builds an instance from data that satisfies the invariants by construction.
    pub(crate) fn from_parts(
        weights: Vec<i64>,
        values: Vec<i64>,
        capacity: i64,
        conflicts: Vec<Conflict>,
    ) -> Self {
        debug_assert_eq!(weights.len(), values.len());
        debug_assert!(capacity >= 0);
        debug_assert!(conflicts.iter().all(|c| c.b < weights.len()));
        Self {
            weights,
            values,
            capacity,
            conflicts,
        }
    }

    pub fn num_items(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn weights(&self) -> &[i64] {
        &self.weights
    }

    pub fn values(&self) -> &[i64] {
        &self.values
    }

    pub fn capacity(&self) -> i64 {
        self.capacity
    }

    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    /// Items that appear in a self-conflict and can never be picked.
    pub fn excluded_items(&self) -> Vec<usize> {
        let mut items: Vec<usize> = self
            .conflicts
            .iter()
            .filter(|c| c.is_self_loop())
            .map(|c| c.a)
            .collect();
        items.sort_unstable();
        items.dedup();
        items
    }

    /// Adjacency lists of the conflict graph, without self-loops.
    ///
    /// Each neighbour appears at most once per list.
    pub fn conflict_graph(&self) -> Vec<Vec<usize>> {
        let mut adjacency = vec![Vec::new(); self.num_items()];
        for c in self.conflicts.iter().filter(|c| !c.is_self_loop()) {
            adjacency[c.a].push(c.b);
            adjacency[c.b].push(c.a);
        }
        for neighbours in &mut adjacency {
            neighbours.sort_unstable();
            neighbours.dedup();
        }
        adjacency
    }

    /// Total weight and value of a selection (saturating).
    ///
    /// Indices are assumed valid; use [`Instance::check_selection`] first for
    /// untrusted input.
    pub fn evaluate(&self, picked: &[usize]) -> (i64, i64) {
        picked.iter().fold((0i64, 0i64), |(w, v), &i| {
            (
                w.saturating_add(self.weights[i]),
                v.saturating_add(self.values[i]),
            )
        })
    }

    /// Checks that `picked` is a feasible solution: valid distinct indices,
    /// total weight within capacity and no conflict with both endpoints picked.
    pub fn check_selection(&self, picked: &[usize]) -> Result<(), SolutionError> {
        let mut selected = vec![false; self.num_items()];
        for &i in picked {
            if i >= self.num_items() {
                return Err(SolutionError::IndexOutOfRange(i));
            }
            if selected[i] {
                return Err(SolutionError::Duplicate(i));
            }
            selected[i] = true;
        }

        let (weight, _) = self.evaluate(picked);
        if weight > self.capacity {
            return Err(SolutionError::OverCapacity {
                weight,
                capacity: self.capacity,
            });
        }

        for c in &self.conflicts {
            if selected[c.a] && selected[c.b] {
                return Err(SolutionError::ConflictViolated(c.a, c.b));
            }
        }
        Ok(())
    }
}
