//! Branch-and-bound solver configuration.

use std::time::Duration;

/// Solver configuration.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use conflict_knapsack::bnb::SolverConfig;
///
/// let config = SolverConfig::default()
///     .with_time_budget(Duration::from_secs(5))
///     .with_parallel(true)
///     .with_split_depth(10);
/// assert_eq!(config.time_budget, Duration::from_secs(5));
/// assert!(config.parallel);
/// ```
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Wall-clock budget after which the best selection found so far is returned.
    pub time_budget: Duration,
    /// Explore independent subtrees on the rayon thread pool.
    ///
    /// Ignored (with a warning) when the crate is built without the
    /// `parallel` feature.
    pub parallel: bool,
    /// Number of leading branching decisions enumerated to form the
    /// subtrees handed to parallel workers.
    pub split_depth: usize,
    /// Seed the incumbent with a greedy, conflict-respecting fill.
    pub warm_start: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_budget: Duration::from_secs(30),
            parallel: false,
            split_depth: 8,
            warm_start: true,
        }
    }
}

impl SolverConfig {
    /// Sets the time budget.
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = budget;
        self
    }

    /// Sets the time budget in (fractional) seconds. Negative values count as zero.
    pub fn with_time_limit_secs(mut self, secs: f64) -> Self {
        self.time_budget = Duration::try_from_secs_f64(secs.max(0.0)).unwrap_or(Duration::MAX);
        self
    }

    /// Enables or disables parallel subtree exploration.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the split depth, capped at 20 (at most about a million subtrees).
    pub fn with_split_depth(mut self, depth: usize) -> Self {
        self.split_depth = depth.min(20);
        self
    }

    /// Enables or disables the greedy warm start.
    pub fn with_warm_start(mut self, warm_start: bool) -> Self {
        self.warm_start = warm_start;
        self
    }
}
