//! Exact solver for the 0/1 knapsack problem with conflicts.
//!
//! Given items with non-negative weights and values, a capacity and a set of
//! conflicting item pairs, find a subset of maximum total value whose weight
//! fits the capacity and which contains no conflicting pair.
//!
//! - **Instances** ([`instance`]): validated item data, a reader for the
//!   `param`/`set E` benchmark format and a seeded random generator.
//! - **Branch and bound** ([`bnb`]): depth-first search with a fractional
//!   relaxation bound, greedy warm start, time budget, cancellation and an
//!   optional rayon-parallel subtree split.
//! - **Batch** ([`batch`]): discovery of instance files by glob pattern and
//!   sequential solving with per-file error reporting.
//!
//! ```
//! use conflict_knapsack::bnb::{solve, SolveStatus};
//! use std::time::Duration;
//!
//! let outcome = solve(
//!     &[2, 3, 4, 5, 9],
//!     &[3, 4, 5, 8, 10],
//!     10,
//!     &[(0, 1), (2, 3)],
//!     Duration::from_secs(5),
//! )
//! .unwrap();
//! assert_eq!(outcome.status, SolveStatus::Optimal);
//! assert_eq!(outcome.total_value, 12);
//! assert_eq!(outcome.picked, vec![1, 3]);
//! ```

pub mod batch;
pub mod bnb;
pub mod error;
pub mod instance;

#[cfg(test)]
mod test_utils;
