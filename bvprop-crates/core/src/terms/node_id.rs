use std::fmt::Display;

use crate::containers::StorageKey;

/// The identifier of a node in a [`TermGraph`](crate::terms::TermGraph).
///
/// Children are always created before their parents, hence ascending identifiers form a
/// topological order of the graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub(crate) id: u32,
}

impl NodeId {
    pub fn id(&self) -> u32 {
        self.id
    }
}

impl StorageKey for NodeId {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        NodeId { id: index as u32 }
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "n{}", self.id)
    }
}
