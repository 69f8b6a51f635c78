pub use crate::basic_types::ProblemSolution;
use crate::basic_types::Solution;
pub use crate::basic_types::SolutionReference;
#[cfg(doc)]
use crate::termination::TerminationCondition;
#[cfg(doc)]
use crate::Solver;

/// The result of a call to [`Solver::solve`] or [`Solver::solve_under_assumptions`].
#[derive(Debug)]
pub enum SatisfactionResult {
    /// Indicates that a solution was found and provides the corresponding [`Solution`].
    Satisfiable(Solution),
    /// Indicates that there is no solution; the local search only concludes this when a
    /// constraint can never take its required value.
    Unsatisfiable,
    /// Indicates that it is not known whether a solution exists. This is likely due to a
    /// [`TerminationCondition`] triggering or a budget being exhausted.
    Unknown,
}

impl SatisfactionResult {
    pub fn is_satisfiable(&self) -> bool {
        matches!(self, SatisfactionResult::Satisfiable(_))
    }
}
