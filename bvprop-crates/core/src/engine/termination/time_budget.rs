use std::time::Duration;
use std::time::Instant;

use super::TerminationCondition;

/// A [`TerminationCondition`] which triggers when the specified time budget has been exceeded.
#[derive(Clone, Copy, Debug)]
pub struct TimeBudget {
    /// The point in time from which to measure the budget.
    started_at: Instant,
    /// The amount of time before [`TimeBudget::should_stop()`] becomes true.
    budget: Duration,
}

impl TimeBudget {
    /// Give the search a time budget, starting now.
    pub fn starting_now(budget: Duration) -> TimeBudget {
        TimeBudget {
            started_at: Instant::now(),
            budget,
        }
    }
}

impl TerminationCondition for TimeBudget {
    fn should_stop(&mut self) -> bool {
        self.started_at.elapsed() >= self.budget
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::TimeBudget;
    use crate::engine::termination::TerminationCondition;

    #[test]
    fn an_empty_budget_stops_immediately() {
        assert!(TimeBudget::starting_now(Duration::ZERO).should_stop());
        assert!(!TimeBudget::starting_now(Duration::from_secs(3600)).should_stop());
    }
}
