use super::model::Model;
use crate::containers::SparseSet;
use crate::containers::StorageKey;
use crate::terms::NodeId;

/// The top-level constraints together with the subset of them which is currently violated.
///
/// A constraint is a width-1 node with a required value: assertions require `1` and assumptions
/// require the polarity of their literal.
#[derive(Debug, Clone)]
pub(crate) struct RootSet {
    /// The constraints in ascending order of their node
    required: Vec<(NodeId, bool)>,
    violated: SparseSet<NodeId>,
}

fn node_index(node: &NodeId) -> usize {
    node.index()
}

impl RootSet {
    pub(crate) fn new(mut required: Vec<(NodeId, bool)>) -> RootSet {
        required.sort();
        required.dedup();
        RootSet {
            required,
            violated: SparseSet::new(node_index),
        }
    }

    /// The constraints and their required values.
    pub(crate) fn constraints(&self) -> &[(NodeId, bool)] {
        &self.required
    }

    pub(crate) fn required_value(&self, node: NodeId) -> Option<bool> {
        self.required
            .binary_search_by_key(&node, |&(root, _)| root)
            .ok()
            .map(|position| self.required[position].1)
    }

    /// Recomputes which constraints are violated under `model`.
    pub(crate) fn rebuild(&mut self, model: &Model) {
        self.violated.clear();
        for &(node, required) in &self.required {
            if model.value(node).is_true() != required {
                self.violated.insert(node);
            }
        }
    }

    /// Updates the membership of `node` after its value has changed; nodes which are not
    /// constraints are ignored.
    pub(crate) fn refresh(&mut self, node: NodeId, model: &Model) {
        let Some(required) = self.required_value(node) else {
            return;
        };
        if model.value(node).is_true() == required {
            self.violated.remove(&node);
        } else {
            self.violated.insert(node);
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.violated.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.violated.len()
    }

    /// The `index`-th violated constraint.
    pub(crate) fn get(&self, index: usize) -> NodeId {
        *self.violated.get(index)
    }

    pub(crate) fn contains(&self, node: NodeId) -> bool {
        self.violated.contains(&node)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.violated.iter().copied()
    }

    /// Whether the violated constraints are exactly the constraints which do not have their
    /// required value under `model`.
    pub(crate) fn agrees_with(&self, model: &Model) -> bool {
        self.required.iter().all(|&(node, required)| {
            (model.value(node).is_true() != required) == self.violated.contains(&node)
        }) && self
            .violated
            .iter()
            .all(|&node| self.required_value(node).is_some())
    }
}
