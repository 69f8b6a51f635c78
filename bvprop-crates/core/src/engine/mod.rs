//! The propagation-based local search: a session repeatedly selects a violated constraint,
//! propagates its required value down to a variable and updates the values depending on it.
mod cone;
mod local_search_solver;
mod model;
mod observer;
mod propagation_loop;
mod propagation_queue;
mod restart_strategy;
mod roots;
mod score;
mod selection;
mod solver_statistics;
pub mod termination;

pub use local_search_solver::ConstraintSelection;
pub use local_search_solver::EntailedPropagation;
pub use local_search_solver::InitialValues;
pub(crate) use local_search_solver::LocalSearchResult;
pub(crate) use local_search_solver::LocalSearchSolver;
pub use local_search_solver::SolverOptions;
pub use observer::PathReport;
pub use observer::PathSummary;
pub use observer::PropagationObserver;
pub use observer::PropagationPathRecorder;
pub use restart_strategy::RestartOptions;
pub use solver_statistics::EngineStatistics;
pub use solver_statistics::SolverStatistics;
