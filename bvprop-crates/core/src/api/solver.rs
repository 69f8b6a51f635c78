use super::outputs::SatisfactionResult;
use crate::basic_types::TermError;
use crate::engine::termination::TerminationCondition;
use crate::engine::LocalSearchResult;
use crate::engine::LocalSearchSolver;
use crate::engine::PropagationObserver;
use crate::engine::SolverStatistics;
use crate::options::SolverOptions;
use crate::terms::Literal;
use crate::terms::NodeId;
use crate::terms::TermGraph;

/// The main interaction point which allows the creation of terms, the addition of constraints,
/// and solving problems.
///
/// # Building terms and solving
/// Terms are created through the [`TermGraph`] of the solver; constraints are width-1 terms which
/// are asserted to be `1`.
///
/// ```rust
/// # use bvprop_core::BitVector;
/// # use bvprop_core::Solver;
/// # use bvprop_core::results::ProblemSolution;
/// # use bvprop_core::results::SatisfactionResult;
/// # use bvprop_core::termination::Indefinite;
/// let mut solver = Solver::default();
///
/// let x = solver.terms_mut().new_variable(8).unwrap();
/// let three = solver.terms_mut().constant(BitVector::new(3, 8));
/// let product = solver.terms_mut().mul(x, three).unwrap();
/// let target = solver.terms_mut().constant(BitVector::new(21, 8));
/// let equal = solver.terms_mut().eq(product, target).unwrap();
/// solver.assert(equal).unwrap();
///
/// let result = solver.solve(&mut Indefinite);
/// if let SatisfactionResult::Satisfiable(solution) = result {
///     assert_eq!(solution.value(x).wrapping_mul(BitVector::new(3, 8)), BitVector::new(21, 8));
/// }
/// ```
#[derive(Debug)]
pub struct Solver {
    terms: TermGraph,
    /// The asserted nodes, which are required to be `1`
    assertions: Vec<NodeId>,
    /// The internal [`LocalSearchSolver`] which is used to solve the problems.
    local_search: LocalSearchSolver,
}

impl Default for Solver {
    fn default() -> Self {
        Solver::new(SolverOptions::default())
    }
}

impl Solver {
    /// Creates a solver with the provided [`SolverOptions`].
    pub fn new(options: SolverOptions) -> Self {
        Solver {
            terms: TermGraph::default(),
            assertions: vec![],
            local_search: LocalSearchSolver::new(options),
        }
    }

    /// Installs a [`PropagationObserver`] which is notified of every walk and move.
    pub fn with_observer(mut self, observer: impl PropagationObserver) -> Self {
        self.local_search.set_observer(Box::new(observer));
        self
    }

    /// The installed observer; use [`downcast_ref`](downcast_rs::Downcast) to retrieve its
    /// concrete type.
    pub fn observer(&self) -> Option<&dyn PropagationObserver> {
        self.local_search.observer()
    }

    pub fn terms(&self) -> &TermGraph {
        &self.terms
    }

    pub fn terms_mut(&mut self) -> &mut TermGraph {
        &mut self.terms
    }

    /// Requires `node`, which should have width 1, to be `1` in every solution.
    pub fn assert(&mut self, node: NodeId) -> Result<(), TermError> {
        check_boolean(&self.terms, node)?;
        self.assertions.push(node);
        Ok(())
    }

    pub fn statistics(&self) -> &SolverStatistics {
        self.local_search.statistics()
    }

    /// Logs the statistics currently present in the solver; the counters of the engine are only
    /// logged if `verbose` is set.
    pub fn log_statistics(&self, verbose: bool) {
        self.local_search.statistics().log(verbose);
    }
}

/// Functions for solving the constraints which have been added to the [`Solver`].
impl Solver {
    /// Searches for an assignment satisfying the assertions until one is found, the constraints
    /// are found to be contradictory, or the provided [`TerminationCondition`] triggers.
    pub fn solve(&mut self, termination: &mut impl TerminationCondition) -> SatisfactionResult {
        let constraints = self
            .assertions
            .iter()
            .map(|&node| (node, true))
            .collect::<Vec<_>>();
        self.solve_constraints(&constraints, termination)
    }

    /// Searches for an assignment satisfying the assertions under which every assumption has its
    /// polarity; the assumptions only hold for this call.
    pub fn solve_under_assumptions(
        &mut self,
        assumptions: &[Literal],
        termination: &mut impl TerminationCondition,
    ) -> Result<SatisfactionResult, TermError> {
        for assumption in assumptions {
            check_boolean(&self.terms, assumption.node())?;
        }

        let constraints = self
            .assertions
            .iter()
            .map(|&node| (node, true))
            .chain(
                assumptions
                    .iter()
                    .map(|assumption| (assumption.node(), assumption.polarity())),
            )
            .collect::<Vec<_>>();
        Ok(self.solve_constraints(&constraints, termination))
    }

    fn solve_constraints(
        &mut self,
        constraints: &[(NodeId, bool)],
        termination: &mut impl TerminationCondition,
    ) -> SatisfactionResult {
        match self.local_search.solve(&self.terms, constraints, termination) {
            LocalSearchResult::Satisfiable(solution) => SatisfactionResult::Satisfiable(solution),
            LocalSearchResult::Unsatisfiable => SatisfactionResult::Unsatisfiable,
            LocalSearchResult::Unknown => SatisfactionResult::Unknown,
        }
    }
}

fn check_boolean(terms: &TermGraph, node: NodeId) -> Result<(), TermError> {
    match terms.width(node) {
        1 => Ok(()),
        width => Err(TermError::NotBoolean(width)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::BitVector;
    use crate::basic_types::ProblemSolution;
    use crate::engine::termination::Indefinite;

    #[test]
    fn assertions_have_to_be_boolean() {
        let mut solver = Solver::default();
        let x = solver.terms_mut().new_variable(4).unwrap();
        assert_eq!(solver.assert(x), Err(TermError::NotBoolean(4)));

        let result = solver.solve_under_assumptions(&[Literal::positive(x)], &mut Indefinite);
        assert!(matches!(result, Err(TermError::NotBoolean(4))));
    }

    #[test]
    fn assumptions_only_hold_for_a_single_call() {
        let mut solver = Solver::default();
        let x = solver.terms_mut().new_variable(4).unwrap();
        let y = solver.terms_mut().new_variable(4).unwrap();
        let less = solver.terms_mut().ult(x, y).unwrap();
        solver.assert(less).unwrap();

        let result = solver
            .solve_under_assumptions(&[Literal::negative(less)], &mut Indefinite)
            .unwrap();
        assert!(matches!(result, SatisfactionResult::Unsatisfiable));

        let SatisfactionResult::Satisfiable(solution) = solver.solve(&mut Indefinite) else {
            panic!("expected a satisfying assignment");
        };
        assert!(solution.value(x).ult(solution.value(y)).is_true());
        assert!(solution.literal_value(Literal::positive(less)));
    }

    #[test]
    fn solutions_assign_every_node() {
        let mut solver = Solver::default();
        let x = solver.terms_mut().new_variable(4).unwrap();
        let zero = solver.terms_mut().constant(BitVector::zero(4));
        let different = solver.terms_mut().eq(x, zero).unwrap();
        let not_zero = solver.terms_mut().not(different).unwrap();
        solver.assert(not_zero).unwrap();

        let SatisfactionResult::Satisfiable(solution) = solver.solve(&mut Indefinite) else {
            panic!("expected a satisfying assignment");
        };
        assert_eq!(solution.num_nodes(), solver.terms().len());
        assert!(!solution.value(x).is_zero());
    }
}
