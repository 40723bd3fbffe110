//! Solve outcomes.

use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Status of a solve call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SolveStatus {
    /// The search tree was exhausted; the selection is value-maximal.
    Optimal,
    /// The budget ran out (or the solve was cancelled) first; the selection
    /// is the best one found but optimality is not proven.
    FeasibleUnproven,
    /// No subset satisfies the constraints.
    ///
    /// The empty selection is feasible for every valid instance, so this is
    /// only reachable for data that validation already rejects.
    Infeasible,
}

impl SolveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SolveStatus::Optimal => "optimal",
            SolveStatus::FeasibleUnproven => "feasible_unproven",
            SolveStatus::Infeasible => "infeasible",
        }
    }
}

impl std::fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Search counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchStats {
    /// Nodes expanded.
    pub nodes: u64,
    /// Nodes discarded by the relaxation bound.
    pub pruned: u64,
    /// Times the incumbent improved during the search.
    pub improvements: u64,
}

impl std::ops::AddAssign for SearchStats {
    fn add_assign(&mut self, other: Self) {
        self.nodes += other.nodes;
        self.pruned += other.pruned;
        self.improvements += other.improvements;
    }
}

/// Result of a solve call.
///
/// Built once per call and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Outcome {
    pub status: SolveStatus,
    /// Picked item indices, ascending.
    pub picked: Vec<usize>,
    pub total_weight: i64,
    pub total_value: i64,
    /// Wall-clock time spent in the solve call.
    #[cfg_attr(feature = "serde", serde(with = "duration_secs"))]
    pub elapsed: Duration,
    pub stats: SearchStats,
}

impl Outcome {
    /// Outcome of an instance with nothing to decide.
    pub fn empty() -> Self {
        Self {
            status: SolveStatus::Optimal,
            picked: Vec::new(),
            total_weight: 0,
            total_value: 0,
            elapsed: Duration::ZERO,
            stats: SearchStats::default(),
        }
    }

    pub fn is_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal
    }

    /// Whether `picked` is a usable selection.
    pub fn is_solution_found(&self) -> bool {
        matches!(
            self.status,
            SolveStatus::Optimal | SolveStatus::FeasibleUnproven
        )
    }
}

#[cfg(feature = "serde")]
mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_secs_f64())
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(d)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}
