//! Stopping conditions checked before every node expansion.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Triggers once the specified time budget has been exceeded.
#[derive(Clone, Copy, Debug)]
pub(crate) struct TimeBudget {
    /// The point in time from which to measure the budget.
    started_at: Instant,
    /// The amount of time before [`TimeBudget::exceeded`] becomes true.
    budget: Duration,
}

impl TimeBudget {
    /// Starts the budget now.
    pub(crate) fn starting_now(budget: Duration) -> TimeBudget {
        TimeBudget {
            started_at: Instant::now(),
            budget,
        }
    }

    pub(crate) fn exceeded(&self) -> bool {
        self.started_at.elapsed() >= self.budget
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

/// Time budget combined with an optional external cancellation flag.
#[derive(Clone, Debug)]
pub(crate) struct Termination {
    budget: TimeBudget,
    cancel: Option<Arc<AtomicBool>>,
}

impl Termination {
    pub(crate) fn new(budget: TimeBudget, cancel: Option<Arc<AtomicBool>>) -> Self {
        Self { budget, cancel }
    }

    pub(crate) fn should_stop(&self) -> bool {
        if let Some(ref flag) = self.cancel {
            if flag.load(Ordering::Relaxed) {
                return true;
            }
        }
        self.budget.exceeded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_budget_is_exceeded_immediately() {
        assert!(TimeBudget::starting_now(Duration::ZERO).exceeded());
    }

    #[test]
    fn test_generous_budget_is_not_exceeded() {
        let budget = TimeBudget::starting_now(Duration::from_secs(3600));
        assert!(!budget.exceeded());
        assert!(budget.elapsed() < Duration::from_secs(3600));
    }

    #[test]
    fn test_cancel_flag_stops() {
        let flag = Arc::new(AtomicBool::new(false));
        let termination = Termination::new(
            TimeBudget::starting_now(Duration::from_secs(3600)),
            Some(Arc::clone(&flag)),
        );
        assert!(!termination.should_stop());
        flag.store(true, Ordering::Relaxed);
        assert!(termination.should_stop());
    }
}
