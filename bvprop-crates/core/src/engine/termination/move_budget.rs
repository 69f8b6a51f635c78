use super::TerminationCondition;

/// A [`TerminationCondition`] which triggers once the given number of moves has been made.
#[derive(Debug, Copy, Clone)]
pub struct MoveBudget {
    budget: u64,
    num_moves: u64,
}

impl MoveBudget {
    pub fn new(budget: u64) -> Self {
        Self {
            budget,
            num_moves: 0,
        }
    }
}

impl TerminationCondition for MoveBudget {
    fn should_stop(&mut self) -> bool {
        self.num_moves >= self.budget
    }

    fn move_has_been_made(&mut self) {
        self.num_moves += 1;
    }
}
