mod bit_vector;
mod random;
pub(crate) mod sequence_generators;
mod solution;
mod term_error;

pub use bit_vector::BitVector;
pub use bit_vector::MAX_WIDTH;
pub(crate) use bit_vector::width_mask;
pub use random::Random;
pub(crate) use random::shuffle;
#[cfg(test)]
pub(crate) use random::tests::TestRandom;
pub use solution::ProblemSolution;
pub use solution::Solution;
pub use solution::SolutionReference;
pub use term_error::TermError;
