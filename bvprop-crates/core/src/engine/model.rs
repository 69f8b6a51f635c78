use super::InitialValues;
use crate::basic_types::BitVector;
use crate::basic_types::Random;
use crate::basic_types::SolutionReference;
use crate::containers::KeyedVec;
use crate::domains::BitDomain;
use crate::terms::NodeId;
use crate::terms::NodeKind;
use crate::terms::TermGraph;

/// The current value of every node of the term graph.
///
/// Outside of a move the value of every operator node equals the operator applied to the values of
/// its children.
#[derive(Clone, Debug, Default)]
pub(crate) struct Model {
    values: KeyedVec<NodeId, BitVector>,
}

impl Model {
    /// Assigns the variables according to `initial_values` and evaluates all other nodes.
    pub(crate) fn initialise(
        terms: &TermGraph,
        domains: &KeyedVec<NodeId, BitDomain>,
        initial_values: InitialValues,
        random: &mut dyn Random,
    ) -> Model {
        let mut model = Model {
            values: KeyedVec::default(),
        };
        for node in terms.node_ids() {
            let value = match terms.kind(node) {
                NodeKind::Variable => {
                    let domain = domains[node];
                    let value = match initial_values {
                        InitialValues::Zero => domain.lower_bound(),
                        InitialValues::Random => domain.random_value(random),
                    };
                    BitVector::new(value, terms.width(node))
                }
                NodeKind::Constant(value) => value,
                NodeKind::Operator(_) => model.evaluate(terms, node),
            };
            let _ = model.values.push(value);
        }
        model
    }

    pub(crate) fn value(&self, node: NodeId) -> BitVector {
        self.values[node]
    }

    pub(crate) fn set(&mut self, node: NodeId, value: BitVector) {
        self.values[node] = value;
    }

    /// The current values of the children of `node`.
    pub(crate) fn operands(&self, terms: &TermGraph, node: NodeId) -> Vec<BitVector> {
        terms
            .children(node)
            .iter()
            .map(|&child| self.values[child])
            .collect()
    }

    /// Applies the operator of `node` to the current values of its children.
    pub(crate) fn evaluate(&self, terms: &TermGraph, node: NodeId) -> BitVector {
        match terms.kind(node) {
            NodeKind::Operator(op) => op.evaluate(&self.operands(terms, node)),
            NodeKind::Variable | NodeKind::Constant(_) => self.values[node],
        }
    }

    pub(crate) fn as_reference(&self) -> SolutionReference<'_> {
        SolutionReference::new(&self.values)
    }
}
