//! Solving many instance files in sequence.
//!
//! Each file is read, parsed, solved and (optionally) verified on its own;
//! a failure is recorded in that file's report and the batch moves on.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use log::{info, warn};

use crate::bnb::{BnbRunner, Outcome, SolverConfig};
use crate::error::{BatchError, SolutionError};
use crate::instance::{parse_file, Instance, ParseMode};

/// Batch configuration.
#[derive(Debug, Clone, Default)]
pub struct BatchConfig {
    /// Configuration handed to every solve call.
    pub solver: SolverConfig,
    /// Treatment of malformed data lines.
    pub parse_mode: ParseMode,
    /// Re-check every returned selection against its instance.
    pub verify: bool,
}

impl BatchConfig {
    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    pub fn with_parse_mode(mut self, mode: ParseMode) -> Self {
        self.parse_mode = mode;
        self
    }

    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }
}

/// Result for one instance file.
#[derive(Debug)]
pub struct InstanceReport {
    pub path: PathBuf,
    pub result: Result<Outcome, BatchError>,
    /// Time spent on this file, parsing included.
    pub elapsed: Duration,
}

/// Results of a batch, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub instances: Vec<InstanceReport>,
}

impl BatchReport {
    /// Reports that produced an outcome.
    pub fn solved(&self) -> impl Iterator<Item = (&Path, &Outcome)> {
        self.instances
            .iter()
            .filter_map(|r| r.result.as_ref().ok().map(|o| (r.path.as_path(), o)))
    }

    /// Reports that failed.
    pub fn failed(&self) -> impl Iterator<Item = (&Path, &BatchError)> {
        self.instances
            .iter()
            .filter_map(|r| r.result.as_ref().err().map(|e| (r.path.as_path(), e)))
    }

    pub fn optimal_count(&self) -> usize {
        self.solved().filter(|(_, o)| o.is_optimal()).count()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

impl fmt::Display for InstanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.result {
            Ok(o) => write!(
                f,
                "{}: Value={}, Weight={}, Picked={:?}, Status={}, Time Taken={:.4}s",
                self.path.display(),
                o.total_value,
                o.total_weight,
                o.picked,
                o.status,
                self.elapsed.as_secs_f64()
            ),
            Err(e) => write!(f, "{}: Error: {e}", self.path.display()),
        }
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Summary of all instances ---")?;
        for report in &self.instances {
            writeln!(f, "{report}")?;
        }
        write!(
            f,
            "{} instances: {} optimal, {} unproven, {} failed",
            self.len(),
            self.optimal_count(),
            self.solved().count() - self.optimal_count(),
            self.failed().count()
        )
    }
}

/// Batch runner.
pub struct BatchRunner;

impl BatchRunner {
    /// Solves every file in order.
    pub fn run<P: AsRef<Path>>(paths: &[P], config: &BatchConfig) -> BatchReport {
        Self::run_with_callback(paths, config, |_| {})
    }

    /// Like [`BatchRunner::run`], calling `on_report` as soon as each file is done.
    pub fn run_with_callback<P, F>(paths: &[P], config: &BatchConfig, mut on_report: F) -> BatchReport
    where
        P: AsRef<Path>,
        F: FnMut(&InstanceReport),
    {
        info!("solving {} instance files", paths.len());
        let mut report = BatchReport::default();
        for path in paths {
            let path = path.as_ref();
            info!("solving instance: {}", path.display());
            let started = Instant::now();
            let result = Self::run_one(path, config);
            if let Err(ref e) = result {
                warn!("{e}");
            }
            let instance_report = InstanceReport {
                path: path.to_path_buf(),
                result,
                elapsed: started.elapsed(),
            };
            on_report(&instance_report);
            report.instances.push(instance_report);
        }
        report
    }

    /// Parses, solves and optionally verifies a single file.
    pub fn run_one(path: &Path, config: &BatchConfig) -> Result<Outcome, BatchError> {
        let parsed = parse_file(path, config.parse_mode).map_err(|source| BatchError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if parsed.skipped_lines > 0 {
            warn!(
                "{}: {} malformed lines skipped",
                path.display(),
                parsed.skipped_lines
            );
        }

        let outcome = BnbRunner::solve(&parsed.instance, &config.solver).map_err(|source| {
            BatchError::Solve {
                path: path.to_path_buf(),
                source,
            }
        })?;

        if config.verify {
            verify(&parsed.instance, &outcome).map_err(|source| BatchError::Verify {
                path: path.to_path_buf(),
                source,
            })?;
        }
        Ok(outcome)
    }
}

/// Checks an outcome against its instance: the selection must be feasible
/// and the reported totals must match it.
pub fn verify(instance: &Instance, outcome: &Outcome) -> Result<(), SolutionError> {
    instance.check_selection(&outcome.picked)?;
    let (weight, value) = instance.evaluate(&outcome.picked);
    if weight != outcome.total_weight || value != outcome.total_value {
        return Err(SolutionError::InconsistentTotals {
            reported_weight: outcome.total_weight,
            reported_value: outcome.total_value,
            weight,
            value,
        });
    }
    Ok(())
}
