use crate::basic_types::BitVector;
use crate::containers::KeyedVec;
use crate::terms::Literal;
use crate::terms::NodeId;

/// A trait which specifies the common behaviours of [`Solution`] and [`SolutionReference`].
pub trait ProblemSolution {
    /// Returns the number of nodes which have a value.
    fn num_nodes(&self) -> usize;

    /// Returns the value of the given node; the node should have been created by the term graph
    /// which was solved.
    fn value(&self, node: NodeId) -> BitVector;

    /// Whether the literal is satisfied, i.e. whether its (width 1) node has the value of its
    /// polarity.
    fn literal_value(&self, literal: Literal) -> bool {
        self.value(literal.node()).is_true() == literal.polarity()
    }
}

/// A solution which keeps reference to the values of the local search.
#[derive(Debug, Copy, Clone)]
pub struct SolutionReference<'a> {
    values: &'a KeyedVec<NodeId, BitVector>,
}

impl<'a> SolutionReference<'a> {
    pub(crate) fn new(values: &'a KeyedVec<NodeId, BitVector>) -> SolutionReference<'a> {
        SolutionReference { values }
    }
}

impl ProblemSolution for SolutionReference<'_> {
    fn num_nodes(&self) -> usize {
        self.values.len()
    }

    fn value(&self, node: NodeId) -> BitVector {
        self.values[node]
    }
}

/// A solution which takes ownership of the values; every node of the term graph (including the
/// operators) is assigned and every operator value is consistent with the values of its children.
///
/// Implements [`ProblemSolution`].
#[derive(Clone, Debug, Default)]
pub struct Solution {
    values: KeyedVec<NodeId, BitVector>,
}

impl Solution {
    pub fn as_reference(&self) -> SolutionReference<'_> {
        SolutionReference {
            values: &self.values,
        }
    }
}

impl ProblemSolution for Solution {
    fn num_nodes(&self) -> usize {
        self.values.len()
    }

    fn value(&self, node: NodeId) -> BitVector {
        self.values[node]
    }
}

impl From<SolutionReference<'_>> for Solution {
    fn from(value: SolutionReference<'_>) -> Self {
        Self {
            values: value.values.clone(),
        }
    }
}
