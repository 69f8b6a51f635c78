mod outputs;
pub(crate) mod solver;

pub mod results {
    pub use crate::api::outputs::ProblemSolution;
    pub use crate::api::outputs::SatisfactionResult;
    pub use crate::api::outputs::SolutionReference;
    pub use crate::basic_types::Solution;
    #[cfg(doc)]
    use crate::Solver;
}

pub mod options {
    pub use crate::basic_types::sequence_generators::SequenceGeneratorType;
    pub use crate::engine::ConstraintSelection;
    pub use crate::engine::EntailedPropagation;
    pub use crate::engine::InitialValues;
    pub use crate::engine::RestartOptions;
    pub use crate::engine::SolverOptions;
    #[cfg(doc)]
    use crate::Solver;
}

pub mod termination {
    pub use crate::engine::termination::CancellationFlag;
    pub use crate::engine::termination::Combinator;
    pub use crate::engine::termination::Indefinite;
    pub use crate::engine::termination::MoveBudget;
    pub use crate::engine::termination::TerminationCondition;
    pub use crate::engine::termination::TimeBudget;
    #[cfg(doc)]
    use crate::Solver;
}

pub mod observers {
    pub use crate::engine::PathReport;
    pub use crate::engine::PathSummary;
    pub use crate::engine::PropagationObserver;
    pub use crate::engine::PropagationPathRecorder;
}

#[doc(hidden)]
pub mod asserts {
    pub use crate::bvprop_assert_advanced;
    pub use crate::bvprop_assert_eq_simple;
    pub use crate::bvprop_assert_moderate;
    pub use crate::bvprop_assert_simple;
    pub use crate::bvprop_asserts::BVPROP_ASSERT_ADVANCED;
    pub use crate::bvprop_asserts::BVPROP_ASSERT_LEVEL_DEFINITION;
    pub use crate::bvprop_asserts::BVPROP_ASSERT_MODERATE;
    pub use crate::bvprop_asserts::BVPROP_ASSERT_SIMPLE;
}
