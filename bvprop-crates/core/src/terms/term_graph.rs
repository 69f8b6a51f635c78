use super::BvOp;
use super::Node;
use super::NodeId;
use super::NodeKind;
use crate::basic_types::BitVector;
use crate::basic_types::TermError;
use crate::basic_types::MAX_WIDTH;
use crate::bvprop_assert_moderate;
use crate::containers::HashMap;
use crate::containers::KeyedVec;

/// An arena of bit-vector terms.
///
/// Constants and operator applications are hash-consed: building the same operator over the same
/// children twice returns the same [`NodeId`]. Every builder validates the widths of its operands
/// and reports violations as a [`TermError`].
///
/// # Example
/// ```rust
/// # use bvprop_core::terms::TermGraph;
/// # use bvprop_core::BitVector;
/// let mut terms = TermGraph::default();
/// let x = terms.new_named_variable(8, "x").unwrap();
/// let one = terms.constant(BitVector::one(8));
/// let sum = terms.add(x, one).unwrap();
///
/// assert_eq!(terms.width(sum), 8);
/// assert_eq!(terms.add(x, one), Ok(sum));
/// assert_eq!(terms.parents(x), &[sum]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct TermGraph {
    nodes: KeyedVec<NodeId, Node>,
    /// The parents of every node, derived from the children when a node is created
    parents: KeyedVec<NodeId, Vec<NodeId>>,
    names: HashMap<NodeId, String>,
    unique_table: HashMap<(NodeKind, Vec<NodeId>), NodeId>,
}

impl TermGraph {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over all nodes in creation (i.e. topological) order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys()
    }

    pub fn node(&self, node: NodeId) -> &Node {
        &self.nodes[node]
    }

    pub fn kind(&self, node: NodeId) -> NodeKind {
        self.nodes[node].kind
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node].children
    }

    pub fn width(&self, node: NodeId) -> u32 {
        self.nodes[node].width
    }

    pub fn parents(&self, node: NodeId) -> &[NodeId] {
        &self.parents[node]
    }

    pub fn name(&self, node: NodeId) -> Option<&str> {
        self.names.get(&node).map(String::as_str)
    }

    pub fn new_variable(&mut self, width: u32) -> Result<NodeId, TermError> {
        check_width(width)?;
        Ok(self.insert(NodeKind::Variable, vec![], width))
    }

    pub fn new_named_variable(
        &mut self,
        width: u32,
        name: impl Into<String>,
    ) -> Result<NodeId, TermError> {
        let variable = self.new_variable(width)?;
        let _ = self.names.insert(variable, name.into());
        Ok(variable)
    }

    pub fn constant(&mut self, value: BitVector) -> NodeId {
        self.intern(NodeKind::Constant(value), vec![], value.width())
    }

    pub fn not(&mut self, operand: NodeId) -> Result<NodeId, TermError> {
        self.apply(BvOp::Not, &[operand])
    }

    pub fn and(&mut self, lhs: NodeId, rhs: NodeId) -> Result<NodeId, TermError> {
        self.apply(BvOp::And, &[lhs, rhs])
    }

    pub fn or(&mut self, lhs: NodeId, rhs: NodeId) -> Result<NodeId, TermError> {
        self.apply(BvOp::Or, &[lhs, rhs])
    }

    pub fn xor(&mut self, lhs: NodeId, rhs: NodeId) -> Result<NodeId, TermError> {
        self.apply(BvOp::Xor, &[lhs, rhs])
    }

    pub fn add(&mut self, lhs: NodeId, rhs: NodeId) -> Result<NodeId, TermError> {
        self.apply(BvOp::Add, &[lhs, rhs])
    }

    pub fn sub(&mut self, lhs: NodeId, rhs: NodeId) -> Result<NodeId, TermError> {
        self.apply(BvOp::Sub, &[lhs, rhs])
    }

    pub fn mul(&mut self, lhs: NodeId, rhs: NodeId) -> Result<NodeId, TermError> {
        self.apply(BvOp::Mul, &[lhs, rhs])
    }

    pub fn udiv(&mut self, lhs: NodeId, rhs: NodeId) -> Result<NodeId, TermError> {
        self.apply(BvOp::Udiv, &[lhs, rhs])
    }

    pub fn urem(&mut self, lhs: NodeId, rhs: NodeId) -> Result<NodeId, TermError> {
        self.apply(BvOp::Urem, &[lhs, rhs])
    }

    pub fn sdiv(&mut self, lhs: NodeId, rhs: NodeId) -> Result<NodeId, TermError> {
        self.apply(BvOp::Sdiv, &[lhs, rhs])
    }

    pub fn srem(&mut self, lhs: NodeId, rhs: NodeId) -> Result<NodeId, TermError> {
        self.apply(BvOp::Srem, &[lhs, rhs])
    }

    pub fn shl(&mut self, value: NodeId, amount: NodeId) -> Result<NodeId, TermError> {
        self.apply(BvOp::Shl, &[value, amount])
    }

    pub fn lshr(&mut self, value: NodeId, amount: NodeId) -> Result<NodeId, TermError> {
        self.apply(BvOp::Lshr, &[value, amount])
    }

    pub fn ashr(&mut self, value: NodeId, amount: NodeId) -> Result<NodeId, TermError> {
        self.apply(BvOp::Ashr, &[value, amount])
    }

    pub fn ult(&mut self, lhs: NodeId, rhs: NodeId) -> Result<NodeId, TermError> {
        self.apply(BvOp::Ult, &[lhs, rhs])
    }

    pub fn slt(&mut self, lhs: NodeId, rhs: NodeId) -> Result<NodeId, TermError> {
        self.apply(BvOp::Slt, &[lhs, rhs])
    }

    pub fn eq(&mut self, lhs: NodeId, rhs: NodeId) -> Result<NodeId, TermError> {
        self.apply(BvOp::Eq, &[lhs, rhs])
    }

    /// Concatenates `high` (most significant bits) and `low`.
    pub fn concat(&mut self, high: NodeId, low: NodeId) -> Result<NodeId, TermError> {
        self.apply(BvOp::Concat, &[high, low])
    }

    pub fn extract(&mut self, operand: NodeId, upper: u32, lower: u32) -> Result<NodeId, TermError> {
        self.apply(BvOp::Extract { upper, lower }, &[operand])
    }

    pub fn sign_extend(&mut self, operand: NodeId, by: u32) -> Result<NodeId, TermError> {
        self.apply(BvOp::SignExtend { by }, &[operand])
    }

    pub fn ite(
        &mut self,
        condition: NodeId,
        then_branch: NodeId,
        else_branch: NodeId,
    ) -> Result<NodeId, TermError> {
        self.apply(BvOp::Ite, &[condition, then_branch, else_branch])
    }

    fn apply(&mut self, op: BvOp, children: &[NodeId]) -> Result<NodeId, TermError> {
        bvprop_assert_moderate!(children.len() == op.arity());
        let width = self.result_width(op, children)?;
        Ok(self.intern(NodeKind::Operator(op), children.to_vec(), width))
    }

    fn result_width(&self, op: BvOp, children: &[NodeId]) -> Result<u32, TermError> {
        let widths = children
            .iter()
            .map(|&child| self.width(child))
            .collect::<Vec<_>>();

        match op {
            BvOp::Not => Ok(widths[0]),
            BvOp::Concat => {
                let width = widths[0] + widths[1];
                check_width(width)?;
                Ok(width)
            }
            BvOp::Extract { upper, lower } => {
                if lower > upper || upper >= widths[0] {
                    return Err(TermError::InvalidExtract {
                        upper,
                        lower,
                        width: widths[0],
                    });
                }
                Ok(upper - lower + 1)
            }
            BvOp::SignExtend { by } => {
                let width = widths[0] + by;
                check_width(width)?;
                Ok(width)
            }
            BvOp::Ite => {
                if widths[0] != 1 {
                    return Err(TermError::NotBoolean(widths[0]));
                }
                check_same_width(widths[1], widths[2])?;
                Ok(widths[1])
            }
            _ => {
                check_same_width(widths[0], widths[1])?;
                if op.is_predicate() {
                    Ok(1)
                } else {
                    Ok(widths[0])
                }
            }
        }
    }

    fn intern(&mut self, kind: NodeKind, children: Vec<NodeId>, width: u32) -> NodeId {
        let key = (kind, children);
        if let Some(&existing) = self.unique_table.get(&key) {
            return existing;
        }

        let node = self.insert(key.0, key.1.clone(), width);
        let _ = self.unique_table.insert(key, node);
        node
    }

    fn insert(&mut self, kind: NodeKind, children: Vec<NodeId>, width: u32) -> NodeId {
        let node = self.nodes.push(Node {
            kind,
            children,
            width,
        });
        let _ = self.parents.push(vec![]);

        for index in 0..self.nodes[node].children.len() {
            let child = self.nodes[node].children[index];
            // A node may use the same child more than once.
            if !self.parents[child].contains(&node) {
                self.parents[child].push(node);
            }
        }

        node
    }
}

fn check_width(width: u32) -> Result<(), TermError> {
    if (1..=MAX_WIDTH).contains(&width) {
        Ok(())
    } else {
        Err(TermError::InvalidWidth(width))
    }
}

fn check_same_width(left: u32, right: u32) -> Result<(), TermError> {
    if left == right {
        Ok(())
    } else {
        Err(TermError::WidthMismatch { left, right })
    }
}

#[cfg(test)]
mod tests {
    use super::TermGraph;
    use crate::basic_types::BitVector;
    use crate::basic_types::TermError;
    use crate::terms::BvOp;
    use crate::terms::NodeKind;

    #[test]
    fn operators_are_hash_consed() {
        let mut terms = TermGraph::default();
        let x = terms.new_variable(4).unwrap();
        let y = terms.new_variable(4).unwrap();

        let first = terms.and(x, y).unwrap();
        let second = terms.and(x, y).unwrap();
        let swapped = terms.and(y, x).unwrap();

        assert_eq!(first, second);
        assert_ne!(first, swapped);
        assert_eq!(terms.constant(BitVector::one(4)), terms.constant(BitVector::one(4)));
    }

    #[test]
    fn variables_are_never_shared() {
        let mut terms = TermGraph::default();
        let x = terms.new_named_variable(4, "x").unwrap();
        let y = terms.new_named_variable(4, "x").unwrap();

        assert_ne!(x, y);
        assert_eq!(terms.name(x), Some("x"));
        assert_eq!(terms.kind(y), NodeKind::Variable);
    }

    #[test]
    fn parents_are_derived_from_children() {
        let mut terms = TermGraph::default();
        let x = terms.new_variable(4).unwrap();
        let doubled = terms.add(x, x).unwrap();
        let negated = terms.not(x).unwrap();

        assert_eq!(terms.parents(x), &[doubled, negated]);
        assert!(terms.parents(doubled).is_empty());
        assert!(x < doubled && doubled < negated);
    }

    #[test]
    fn widths_are_validated() {
        let mut terms = TermGraph::default();
        let x = terms.new_variable(4).unwrap();
        let y = terms.new_variable(3).unwrap();
        let wide = terms.new_variable(64).unwrap();

        assert_eq!(terms.new_variable(0), Err(TermError::InvalidWidth(0)));
        assert_eq!(terms.new_variable(65), Err(TermError::InvalidWidth(65)));
        assert_eq!(
            terms.add(x, y),
            Err(TermError::WidthMismatch { left: 4, right: 3 })
        );
        assert_eq!(terms.ite(x, x, x), Err(TermError::NotBoolean(4)));
        assert_eq!(
            terms.extract(x, 4, 0),
            Err(TermError::InvalidExtract {
                upper: 4,
                lower: 0,
                width: 4
            })
        );
        assert_eq!(terms.concat(wide, x), Err(TermError::InvalidWidth(68)));
        assert_eq!(terms.sign_extend(wide, 1), Err(TermError::InvalidWidth(65)));
    }

    #[test]
    fn result_widths() {
        let mut terms = TermGraph::default();
        let x = terms.new_variable(4).unwrap();
        let y = terms.new_variable(3).unwrap();

        let comparison = terms.ult(x, x).unwrap();
        let concatenation = terms.concat(x, y).unwrap();
        let extraction = terms.extract(x, 2, 1).unwrap();
        let extension = terms.sign_extend(y, 5).unwrap();
        let ite = terms.ite(comparison, y, y).unwrap();

        assert_eq!(terms.width(comparison), 1);
        assert_eq!(terms.width(concatenation), 7);
        assert_eq!(terms.width(extraction), 2);
        assert_eq!(terms.width(extension), 8);
        assert_eq!(terms.width(ite), 3);
        assert_eq!(
            terms.kind(extraction),
            NodeKind::Operator(BvOp::Extract { upper: 2, lower: 1 })
        );
    }
}
