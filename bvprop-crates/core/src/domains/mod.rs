//! Ternary bit-vector domains and the sets of values which solve propagation problems.
mod bit_domain;
pub(crate) mod forward;
mod solution_set;

pub use bit_domain::BitDomain;
pub(crate) use solution_set::Piece;
pub(crate) use solution_set::Scattered;
pub(crate) use solution_set::SolutionSet;

#[cfg(test)]
pub(crate) use bit_domain::tests::all_domains;
