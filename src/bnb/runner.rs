//! Solve entry points.
//!
//! [`BnbRunner`] validates nothing itself: an [`Instance`] is valid by
//! construction. The flat [`solve`] function takes raw data, validates it and
//! delegates to the runner.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use log::debug;

use super::config::SolverConfig;
use super::search::{Incumbent, Prepared, Search};
use super::termination::{Termination, TimeBudget};
use super::types::{Outcome, SearchStats, SolveStatus};
use crate::error::SolveError;
use crate::instance::Instance;

/// Branch-and-bound runner.
pub struct BnbRunner;

impl BnbRunner {
    /// Solves the instance within the configured time budget.
    ///
    /// # Examples
    ///
    /// ```
    /// use conflict_knapsack::bnb::{BnbRunner, SolverConfig, SolveStatus};
    /// use conflict_knapsack::instance::Instance;
    ///
    /// let instance = Instance::new(
    ///     vec![2, 3, 4, 5, 9],
    ///     vec![3, 4, 5, 8, 10],
    ///     10,
    ///     vec![(0, 1), (2, 3)],
    /// ).unwrap();
    /// let outcome = BnbRunner::solve(&instance, &SolverConfig::default()).unwrap();
    /// assert_eq!(outcome.status, SolveStatus::Optimal);
    /// assert_eq!(outcome.total_value, 12);
    /// ```
    pub fn solve(instance: &Instance, config: &SolverConfig) -> Result<Outcome, SolveError> {
        Self::solve_with_cancel(instance, config, None)
    }

    /// Solves with an optional cancellation token.
    ///
    /// If `cancel` is `Some` and the flag is set to `true`, the search stops
    /// before the next node expansion and returns the best selection found
    /// so far as [`SolveStatus::FeasibleUnproven`].
    pub fn solve_with_cancel(
        instance: &Instance,
        config: &SolverConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<Outcome, SolveError> {
        let budget = TimeBudget::starting_now(config.time_budget);
        let termination = Termination::new(budget, cancel);

        let problem = Prepared::new(instance)?;
        debug!(
            "solving {} items ({} after preprocessing), capacity {}, {} conflicts",
            instance.num_items(),
            problem.len(),
            instance.capacity(),
            instance.conflicts().len()
        );
        if problem.len() == 0 {
            return Ok(Outcome {
                elapsed: budget.elapsed(),
                ..Outcome::empty()
            });
        }

        let incumbent = if config.warm_start {
            problem.greedy()
        } else {
            Incumbent::empty()
        };
        debug!("initial incumbent value {}", incumbent.value);

        let (best, stats, completed) = if config.parallel {
            explore_parallel(&problem, incumbent, config.split_depth, &termination)?
        } else {
            explore_sequential(&problem, incumbent, &termination)?
        };

        let picked = problem.original_indices(&best.selection);
        let (total_weight, total_value) = instance.evaluate(&picked);
        instance
            .check_selection(&picked)
            .map_err(|e| SolveError::Internal(format!("search produced an invalid selection: {e}")))?;
        if total_value != best.value || total_weight != best.weight {
            return Err(SolveError::Internal(format!(
                "incumbent totals ({}, {}) disagree with the selection ({}, {})",
                best.weight, best.value, total_weight, total_value
            )));
        }

        let status = if completed {
            SolveStatus::Optimal
        } else {
            SolveStatus::FeasibleUnproven
        };
        let elapsed = budget.elapsed();
        debug!(
            "{status}: value {total_value}, weight {total_weight}, {} nodes, {} pruned, {:.3}s",
            stats.nodes,
            stats.pruned,
            elapsed.as_secs_f64()
        );

        Ok(Outcome {
            status,
            picked,
            total_weight,
            total_value,
            elapsed,
            stats,
        })
    }
}

/// Validates raw data and solves it.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use conflict_knapsack::bnb::solve;
///
/// let outcome = solve(&[], &[], 0, &[], Duration::from_secs(1)).unwrap();
/// assert!(outcome.is_optimal());
/// assert!(outcome.picked.is_empty());
/// ```
pub fn solve(
    weights: &[i64],
    values: &[i64],
    capacity: i64,
    conflicts: &[(usize, usize)],
    time_budget: Duration,
) -> Result<Outcome, SolveError> {
    let instance = Instance::new(
        weights.to_vec(),
        values.to_vec(),
        capacity,
        conflicts.iter().copied(),
    )?;
    BnbRunner::solve(&instance, &SolverConfig::default().with_time_budget(time_budget))
}

fn explore_sequential(
    problem: &Prepared,
    incumbent: Incumbent,
    termination: &Termination,
) -> Result<(Incumbent, SearchStats, bool), SolveError> {
    let mut search = Search::new(problem, incumbent, None, termination);
    let completed = search.explore(0)?;
    let (best, stats) = search.into_parts();
    Ok((best, stats, completed))
}

#[cfg(feature = "parallel")]
fn explore_parallel(
    problem: &Prepared,
    incumbent: Incumbent,
    split_depth: usize,
    termination: &Termination,
) -> Result<(Incumbent, SearchStats, bool), SolveError> {
    use super::search::{feasible_prefixes, SharedIncumbent};
    use rayon::prelude::*;

    let Some(prefixes) = feasible_prefixes(problem, split_depth, termination) else {
        debug!("stopped while splitting the tree at depth {split_depth}");
        return Ok((incumbent, SearchStats::default(), false));
    };
    debug!("exploring {} subtrees in parallel", prefixes.len());

    let shared = SharedIncumbent::new(incumbent);
    let results: Vec<(SearchStats, bool)> = prefixes
        .par_iter()
        .map(|prefix| -> Result<(SearchStats, bool), SolveError> {
            if termination.should_stop() {
                return Ok((SearchStats::default(), false));
            }
            let mut search = Search::new(problem, Incumbent::empty(), Some(&shared), termination);
            search.apply_prefix(prefix)?;
            let completed = search.explore(prefix.len())?;
            let (_, stats) = search.into_parts();
            Ok((stats, completed))
        })
        .collect::<Result<_, _>>()?;

    let mut stats = SearchStats::default();
    let mut completed = true;
    for (s, c) in results {
        stats += s;
        completed &= c;
    }
    Ok((shared.into_inner()?, stats, completed))
}

#[cfg(not(feature = "parallel"))]
fn explore_parallel(
    problem: &Prepared,
    incumbent: Incumbent,
    _split_depth: usize,
    termination: &Termination,
) -> Result<(Incumbent, SearchStats, bool), SolveError> {
    log::warn!("built without the `parallel` feature; searching sequentially");
    explore_sequential(problem, incumbent, termination)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::instance::{generate, GeneratorConfig};
    use crate::test_utils::brute_force;
    use proptest::prelude::*;
    use std::sync::atomic::Ordering;
    use std::time::Instant;

    fn scenario() -> Instance {
        Instance::new(
            vec![2, 3, 4, 5, 9],
            vec![3, 4, 5, 8, 10],
            10,
            vec![(0, 1), (2, 3)],
        )
        .unwrap()
    }

    #[test]
    fn test_scenario_regression() {
        // brute force: {1, 3} with weight 8 is the unique best selection
        assert_eq!(brute_force(&scenario()), 12);
        let outcome = BnbRunner::solve(&scenario(), &SolverConfig::default()).unwrap();
        assert_eq!(outcome.status, SolveStatus::Optimal);
        assert_eq!(outcome.picked, vec![1, 3]);
        assert_eq!(outcome.total_weight, 8);
        assert_eq!(outcome.total_value, 12);
    }

    #[test]
    fn test_empty_instance() {
        let outcome = solve(&[], &[], 0, &[], Duration::from_secs(1)).unwrap();
        assert_eq!(outcome.status, SolveStatus::Optimal);
        assert!(outcome.picked.is_empty());
        assert_eq!(outcome.total_weight, 0);
        assert_eq!(outcome.total_value, 0);
    }

    #[test]
    fn test_empty_instance_with_zero_budget_is_still_optimal() {
        let outcome = solve(&[], &[], 5, &[], Duration::ZERO).unwrap();
        assert!(outcome.is_optimal());
    }

    #[test]
    fn test_zero_capacity_takes_only_weightless_items() {
        let outcome = solve(&[0, 1, 0], &[4, 9, 2], 0, &[], Duration::from_secs(1)).unwrap();
        assert!(outcome.is_optimal());
        assert_eq!(outcome.picked, vec![0, 2]);
        assert_eq!(outcome.total_value, 6);
    }

    #[test]
    fn test_self_conflict_excludes_item() {
        let outcome = solve(
            &[1, 1, 1],
            &[10, 1, 1],
            3,
            &[(0, 0)],
            Duration::from_secs(1),
        )
        .unwrap();
        assert!(outcome.is_optimal());
        assert_eq!(outcome.picked, vec![1, 2]);
        assert_eq!(outcome.total_value, 2);
    }

    #[test]
    fn test_validation_errors_surface() {
        assert_eq!(
            solve(&[1, 2], &[1], 3, &[], Duration::from_secs(1)).unwrap_err(),
            SolveError::Invalid(ValidationError::LengthMismatch {
                weights: 2,
                values: 1
            })
        );
        assert!(matches!(
            solve(&[1], &[1], 3, &[(0, 1)], Duration::from_secs(1)).unwrap_err(),
            SolveError::Invalid(ValidationError::ConflictOutOfRange { .. })
        ));
        assert!(matches!(
            solve(&[1], &[1], -3, &[], Duration::from_secs(1)).unwrap_err(),
            SolveError::Invalid(ValidationError::NegativeCapacity(-3))
        ));
    }

    #[test]
    fn test_overflow_is_reported() {
        let err = solve(&[1, 1], &[i64::MAX, 2], 5, &[], Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, SolveError::Overflow { .. }));
    }

    #[test]
    fn test_warm_start_does_not_change_optimum() {
        let instance = generate(&GeneratorConfig::new(40).with_conflict_density(0.1).with_seed(9));
        let cold = BnbRunner::solve(&instance, &SolverConfig::default().with_warm_start(false)).unwrap();
        let warm = BnbRunner::solve(&instance, &SolverConfig::default()).unwrap();
        assert!(cold.is_optimal() && warm.is_optimal());
        assert_eq!(cold.total_value, warm.total_value);
    }

    #[test]
    fn test_zero_budget_returns_unproven() {
        let instance = generate(&GeneratorConfig::new(2000).with_conflict_density(0.01).with_seed(1));
        let config = SolverConfig::default().with_time_budget(Duration::ZERO);
        let outcome = BnbRunner::solve(&instance, &config).unwrap();
        assert_eq!(outcome.status, SolveStatus::FeasibleUnproven);
        assert!(instance.check_selection(&outcome.picked).is_ok());
        assert!(outcome.total_value > 0, "greedy warm start should be returned");
    }

    #[test]
    fn test_time_budget_is_honored() {
        let instance = generate(
            &GeneratorConfig::new(3000)
                .with_correlated(true)
                .with_conflict_density(0.002)
                .with_seed(11),
        );
        let budget = Duration::from_millis(50);
        let config = SolverConfig::default().with_time_budget(budget);
        let start = Instant::now();
        let outcome = BnbRunner::solve(&instance, &config).unwrap();
        let wall = start.elapsed();
        assert!(wall < budget * 20 + Duration::from_secs(1), "took {wall:?}");
        assert!(instance.check_selection(&outcome.picked).is_ok());
        assert!(outcome.is_solution_found());
    }

    #[test]
    fn test_cancel_flag_stops_search() {
        let instance = generate(&GeneratorConfig::new(500).with_seed(5));
        let flag = Arc::new(AtomicBool::new(true));
        let outcome =
            BnbRunner::solve_with_cancel(&instance, &SolverConfig::default(), Some(Arc::clone(&flag)))
                .unwrap();
        assert!(flag.load(Ordering::Relaxed));
        assert_eq!(outcome.status, SolveStatus::FeasibleUnproven);
        assert_eq!(outcome.stats.nodes, 0);
    }

    #[test]
    fn test_determinism() {
        let instance = generate(&GeneratorConfig::new(60).with_conflict_density(0.05).with_seed(21));
        let first = BnbRunner::solve(&instance, &SolverConfig::default()).unwrap();
        let second = BnbRunner::solve(&instance, &SolverConfig::default()).unwrap();
        assert!(first.is_optimal() && second.is_optimal());
        assert_eq!(first.total_value, second.total_value);
        assert_eq!(first.picked, second.picked);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        for seed in 0..5 {
            let instance = generate(
                &GeneratorConfig::new(80)
                    .with_conflict_density(0.03)
                    .with_seed(seed),
            );
            let sequential = BnbRunner::solve(&instance, &SolverConfig::default()).unwrap();
            let parallel = BnbRunner::solve(
                &instance,
                &SolverConfig::default().with_parallel(true).with_split_depth(6),
            )
            .unwrap();
            assert!(sequential.is_optimal() && parallel.is_optimal());
            assert_eq!(sequential.total_value, parallel.total_value, "seed {seed}");
            assert!(instance.check_selection(&parallel.picked).is_ok());
        }
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_zero_budget() {
        let instance = generate(&GeneratorConfig::new(300).with_seed(8));
        let config = SolverConfig::default()
            .with_parallel(true)
            .with_time_budget(Duration::ZERO);
        let outcome = BnbRunner::solve(&instance, &config).unwrap();
        assert_eq!(outcome.status, SolveStatus::FeasibleUnproven);
        assert!(instance.check_selection(&outcome.picked).is_ok());
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_split_honors_time_budget() {
        let instance = generate(
            &GeneratorConfig::new(3000)
                .with_conflict_density(0.002)
                .with_seed(13),
        );
        let budget = Duration::from_millis(1);
        let config = SolverConfig::default()
            .with_parallel(true)
            .with_split_depth(20)
            .with_time_budget(budget);
        let start = Instant::now();
        let outcome = BnbRunner::solve(&instance, &config).unwrap();
        let wall = start.elapsed();
        assert!(wall < budget * 20 + Duration::from_secs(1), "took {wall:?}");
        assert_eq!(outcome.status, SolveStatus::FeasibleUnproven);
        assert!(instance.check_selection(&outcome.picked).is_ok());
    }

    #[test]
    fn test_fully_preprocessed_instance_is_optimal() {
        let outcome = solve(&[20, 1], &[5, 0], 10, &[], Duration::from_secs(1)).unwrap();
        assert!(outcome.is_optimal());
        assert!(outcome.picked.is_empty());
        assert_eq!(outcome.stats, SearchStats::default());
    }

    fn small_instance() -> impl Strategy<Value = Instance> {
        (0usize..=14).prop_flat_map(|n| {
            (
                prop::collection::vec(0i64..=25, n),
                prop::collection::vec(0i64..=40, n),
                0i64..=80,
                prop::collection::vec((0..n.max(1), 0..n.max(1)), 0..=n * 2),
            )
                .prop_map(move |(w, v, c, e)| {
                    let e = if n == 0 { Vec::new() } else { e };
                    Instance::new(w, v, c, e).unwrap()
                })
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(128))]

        #[test]
        fn prop_optimal_matches_brute_force(instance in small_instance()) {
            let outcome = BnbRunner::solve(&instance, &SolverConfig::default()).unwrap();
            prop_assert_eq!(outcome.status, SolveStatus::Optimal);
            prop_assert!(instance.check_selection(&outcome.picked).is_ok());
            prop_assert_eq!(outcome.total_value, brute_force(&instance));
            prop_assert_eq!(instance.evaluate(&outcome.picked), (outcome.total_weight, outcome.total_value));
            let mut sorted = outcome.picked.clone();
            sorted.sort_unstable();
            prop_assert_eq!(sorted, outcome.picked.clone());
        }

        #[test]
        fn prop_self_conflicts_are_never_picked(instance in small_instance()) {
            let outcome = BnbRunner::solve(&instance, &SolverConfig::default()).unwrap();
            for item in instance.excluded_items() {
                prop_assert!(!outcome.picked.contains(&item));
            }
        }

        #[test]
        fn prop_cold_start_matches_brute_force(instance in small_instance()) {
            let config = SolverConfig::default().with_warm_start(false);
            let outcome = BnbRunner::solve(&instance, &config).unwrap();
            prop_assert_eq!(outcome.total_value, brute_force(&instance));
        }
    }
}
