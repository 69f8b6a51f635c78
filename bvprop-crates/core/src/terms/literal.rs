use std::ops::Not;

use super::NodeId;

/// A node of width 1 together with the polarity it is required to take; used to pass assumptions
/// to the solver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Literal {
    node: NodeId,
    polarity: bool,
}

impl Literal {
    pub fn new(node: NodeId, polarity: bool) -> Literal {
        Literal { node, polarity }
    }

    pub fn positive(node: NodeId) -> Literal {
        Literal::new(node, true)
    }

    pub fn negative(node: NodeId) -> Literal {
        Literal::new(node, false)
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn polarity(&self) -> bool {
        self.polarity
    }
}

impl Not for Literal {
    type Output = Literal;

    fn not(self) -> Self::Output {
        Literal {
            node: self.node,
            polarity: !self.polarity,
        }
    }
}
