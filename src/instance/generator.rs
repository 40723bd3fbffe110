//! Seeded random instances for tests and benchmarks.
//!
//! Two families are produced, mirroring the benchmark sets: uncorrelated
//! (values independent of weights) and correlated (`value = weight + 10`).
//! Conflicts are drawn uniformly among item pairs.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::types::{Conflict, Instance};

/// Parameters of a random instance.
///
/// # Examples
///
/// ```
/// use conflict_knapsack::instance::{generate, GeneratorConfig};
///
/// let config = GeneratorConfig::new(30).with_conflict_density(0.1).with_seed(7);
/// let instance = generate(&config);
/// assert_eq!(instance.num_items(), 30);
/// assert_eq!(instance, generate(&config));
/// ```
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Number of items.
    pub num_items: usize,
    /// Weights are drawn from `1..=max_weight`.
    pub max_weight: i64,
    /// Uncorrelated values are drawn from `1..=max_value`.
    pub max_value: i64,
    /// Capacity as a fraction of the total weight.
    pub capacity_ratio: f64,
    /// Fraction of all item pairs that conflict.
    pub conflict_density: f64,
    /// Correlated values (`weight + 10`) instead of uniform ones.
    pub correlated: bool,
    /// Random seed.
    pub seed: u64,
}

impl GeneratorConfig {
    pub fn new(num_items: usize) -> Self {
        Self {
            num_items,
            max_weight: 100,
            max_value: 100,
            capacity_ratio: 0.5,
            conflict_density: 0.05,
            correlated: false,
            seed: 42,
        }
    }

    pub fn with_max_weight(mut self, w: i64) -> Self {
        self.max_weight = w.max(1);
        self
    }

    pub fn with_max_value(mut self, v: i64) -> Self {
        self.max_value = v.max(1);
        self
    }

    pub fn with_capacity_ratio(mut self, r: f64) -> Self {
        self.capacity_ratio = r.clamp(0.0, 1.0);
        self
    }

    pub fn with_conflict_density(mut self, d: f64) -> Self {
        self.conflict_density = d.clamp(0.0, 1.0);
        self
    }

    pub fn with_correlated(mut self, correlated: bool) -> Self {
        self.correlated = correlated;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Draws an instance. The same configuration always yields the same instance.
pub fn generate(config: &GeneratorConfig) -> Instance {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let n = config.num_items;

    let weights: Vec<i64> = (0..n)
        .map(|_| rng.random_range(1..=config.max_weight))
        .collect();
    let values: Vec<i64> = if config.correlated {
        weights.iter().map(|w| w + 10).collect()
    } else {
        (0..n)
            .map(|_| rng.random_range(1..=config.max_value))
            .collect()
    };

    let total_weight: i64 = weights.iter().sum();
    let capacity = (total_weight as f64 * config.capacity_ratio).floor() as i64;

    let mut conflicts = Vec::new();
    if n >= 2 {
        let pairs = n * (n - 1) / 2;
        let target = (pairs as f64 * config.conflict_density).round() as usize;
        conflicts.reserve(target);
        for _ in 0..target {
            let i = rng.random_range(0..n);
            let mut j = rng.random_range(0..n - 1);
            if j >= i {
                j += 1;
            }
            conflicts.push(Conflict::new(i, j));
        }
        conflicts.sort_unstable();
        conflicts.dedup();
    }

    Instance::from_parts(weights, values, capacity, conflicts)
}
