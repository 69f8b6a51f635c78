//! # bvprop
//! A local search solver for quantifier-free bit-vector constraints, based on propagating target
//! values from violated constraints down to the variables.
//!
//! A problem is built as a term graph: variables, constants and operator nodes over bit-vectors of
//! width 1 to 64. Width-1 nodes are asserted to be true; the solver then starts from an initial
//! assignment and repeatedly selects a violated constraint, propagates its required value down
//! the term graph by computing inverse (or consistent) values for the operands, and assigns the
//! variable at the end of this path. The values of all nodes depending on the variable are
//! updated afterwards.
//!
//! The local search is incomplete: it reports [`SatisfactionResult::Unknown`] when it gives up and
//! only reports [`SatisfactionResult::Unsatisfiable`] if a constraint can never take its required
//! value (e.g. because its constant bits are fixed to the other value).
//!
//! # Example
//! ```rust
//! # use bvprop_core::BitVector;
//! # use bvprop_core::Solver;
//! # use bvprop_core::results::ProblemSolution;
//! # use bvprop_core::results::SatisfactionResult;
//! # use bvprop_core::termination::Indefinite;
//! let mut solver = Solver::default();
//!
//! // x + 1 = 0 over 4 bits
//! let x = solver.terms_mut().new_variable(4).unwrap();
//! let one = solver.terms_mut().constant(BitVector::one(4));
//! let zero = solver.terms_mut().constant(BitVector::zero(4));
//! let sum = solver.terms_mut().add(x, one).unwrap();
//! let equal = solver.terms_mut().eq(sum, zero).unwrap();
//! solver.assert(equal).unwrap();
//!
//! let SatisfactionResult::Satisfiable(solution) = solver.solve(&mut Indefinite) else {
//!     panic!("x + 1 = 0 has a solution");
//! };
//! assert_eq!(solution.value(x), BitVector::ones(4));
//! ```
pub(crate) mod basic_types;
pub(crate) mod bvprop_asserts;
pub mod containers;
pub mod domains;
pub(crate) mod engine;
pub(crate) mod math;
pub mod propagators;
pub mod statistics;
pub mod terms;

pub use convert_case;
pub use rand;

// We declare a private module with public use, so that all exports from API are exports directly
// from the crate.
//
// Example:
// `use bvprop_core::Solver;`
// vs.
// `use bvprop_core::api::Solver;`
mod api;

pub use api::*;

pub use crate::api::solver::Solver;
pub use crate::basic_types::BitVector;
pub use crate::basic_types::Random;
pub use crate::basic_types::TermError;
pub use crate::basic_types::MAX_WIDTH;
pub use crate::engine::EngineStatistics;
pub use crate::engine::SolverStatistics;
#[cfg(doc)]
use crate::results::SatisfactionResult;
