//! A [`TerminationCondition`] is polled by the local search before every round, move and walk. It
//! indicates when the search should give up, even though no satisfying assignment has been found;
//! the search then reports an unknown result. The most common example is [`TimeBudget`].

mod cancellation_flag;
mod combinator;
mod indefinite;
mod move_budget;
mod time_budget;

pub use cancellation_flag::CancellationFlag;
pub use combinator::Combinator;
pub use indefinite::Indefinite;
pub use move_budget::MoveBudget;
pub use time_budget::TimeBudget;

/// The central trait that defines a termination condition.
pub trait TerminationCondition {
    /// Returns `true` when the search should stop, `false` otherwise.
    fn should_stop(&mut self) -> bool;

    /// Called every time a move has been applied to the model.
    fn move_has_been_made(&mut self) {}
}

impl<T: TerminationCondition> TerminationCondition for Option<T> {
    fn should_stop(&mut self) -> bool {
        match self {
            Some(t) => t.should_stop(),
            None => false,
        }
    }

    fn move_has_been_made(&mut self) {
        if let Some(t) = self {
            t.move_has_been_made()
        }
    }
}
