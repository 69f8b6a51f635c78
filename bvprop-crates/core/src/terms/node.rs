use super::BvOp;
use super::NodeId;
use crate::basic_types::BitVector;

/// What a [`Node`] represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A free input; the only kind of node the local search assigns directly.
    Variable,
    Constant(BitVector),
    Operator(BvOp),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) children: Vec<NodeId>,
    pub(crate) width: u32,
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn width(&self) -> u32 {
        self.width
    }
}
