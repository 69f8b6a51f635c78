use super::model::Model;
use crate::containers::HashSet;
use crate::terms::NodeId;
use crate::terms::TermGraph;

/// Recomputes the values of the nodes which depend on changed variables.
///
/// Node identifiers are allocated such that children precede their parents, so processing the cone
/// in ascending order of identifiers evaluates every node after all of its children.
#[derive(Debug, Default)]
pub(crate) struct ConeUpdater {
    visited: HashSet<NodeId>,
    stack: Vec<NodeId>,
    cone: Vec<NodeId>,
}

impl ConeUpdater {
    /// Re-evaluates every node which transitively depends on one of `changed`, whose values have
    /// already been written to the model.
    ///
    /// Returns the affected nodes in ascending order, including the changed nodes themselves.
    pub(crate) fn update(
        &mut self,
        terms: &TermGraph,
        model: &mut Model,
        changed: &[NodeId],
    ) -> &[NodeId] {
        self.visited.clear();
        self.cone.clear();
        self.stack.extend_from_slice(changed);

        while let Some(node) = self.stack.pop() {
            if !self.visited.insert(node) {
                continue;
            }
            self.cone.push(node);
            self.stack.extend(
                terms
                    .parents(node)
                    .iter()
                    .filter(|&&parent| !self.visited.contains(&parent)),
            );
        }

        self.cone.sort_unstable();
        for &node in &self.cone {
            if !changed.contains(&node) {
                let value = model.evaluate(terms, node);
                model.set(node, value);
            }
        }
        &self.cone
    }
}
