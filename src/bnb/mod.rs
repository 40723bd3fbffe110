//! Exact branch-and-bound solver for the knapsack problem with conflicts.
//!
//! Finds a subset of items of maximum total value whose total weight fits
//! the capacity and which contains no conflicting pair, or the best such
//! subset found within a time budget.
//!
//! # Key Components
//!
//! - [`SolverConfig`]: time budget, parallelism, warm start
//! - [`BnbRunner`]: runs the search on a validated [`Instance`](crate::instance::Instance)
//! - [`solve`]: flat entry point taking raw weights, values, capacity and conflicts
//! - [`Outcome`]: status, picked items, totals and search counters
//!
//! # Design
//!
//! Depth-first search over items ordered by value/weight ratio, pruned with
//! a fractional (Dantzig) relaxation bound that ignores conflicts. With the
//! `parallel` feature the tree can be split into independent subtrees that
//! rayon workers explore while sharing the incumbent value.
//!
//! # References
//!
//! - Dantzig (1957), "Discrete-Variable Extremum Problems", *Operations Research* 5(2)
//! - Pferschy & Schauer (2009), "The Knapsack Problem with Conflict Graphs",
//!   *Journal of Graph Algorithms and Applications* 13(2)

mod bound;
mod config;
mod runner;
mod search;
mod termination;
mod types;

pub use config::SolverConfig;
pub use runner::{solve, BnbRunner};
pub use types::{Outcome, SearchStats, SolveStatus};
