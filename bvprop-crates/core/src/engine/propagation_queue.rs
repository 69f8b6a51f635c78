use super::EntailedPropagation;
use crate::basic_types::BitVector;
use crate::terms::NodeId;

/// A pending propagation of `target` to `node`; if `forced_child` is set, the propagation has to
/// continue through that child.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PropagationEntry {
    pub(crate) node: NodeId,
    pub(crate) target: BitVector,
    pub(crate) forced_child: Option<usize>,
}

impl PropagationEntry {
    pub(crate) fn new(node: NodeId, target: BitVector) -> PropagationEntry {
        PropagationEntry {
            node,
            target,
            forced_child: None,
        }
    }
}

/// The entailed propagations which remain after a recoverable conflict; the most recently added
/// entry is handled first.
#[derive(Clone, Debug, Default)]
pub(crate) struct PropagationQueue {
    entries: Vec<PropagationEntry>,
}

impl PropagationQueue {
    pub(crate) fn pop(&mut self) -> Option<PropagationEntry> {
        self.entries.pop()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Adds the entries recorded during a walk, in the order in which they were recorded; the
    /// first recorded entry is popped first.
    pub(crate) fn push_entailed(&mut self, recorded: &[PropagationEntry], mode: EntailedPropagation) {
        match mode {
            EntailedPropagation::Off => {}
            EntailedPropagation::All => self.entries.extend(recorded.iter().rev()),
            EntailedPropagation::First => self.entries.extend(recorded.first()),
            EntailedPropagation::Last => self.entries.extend(recorded.last()),
        }
    }
}
