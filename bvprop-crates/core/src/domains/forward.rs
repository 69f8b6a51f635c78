//! Forward propagation of fixed bits: computes for every node a [`BitDomain`] which contains every
//! value the node can take under any assignment to the variables.
use super::BitDomain;
use crate::basic_types::width_mask;
use crate::basic_types::BitVector;
use crate::containers::KeyedVec;
use crate::terms::BvOp;
use crate::terms::NodeId;
use crate::terms::NodeKind;
use crate::terms::TermGraph;

/// Computes the domains of all nodes in topological order.
///
/// Variables are free and constants are fixed; the operators are propagated from the domains of
/// their children if `constant_bits` is set and are free otherwise.
pub(crate) fn compute_domains(terms: &TermGraph, constant_bits: bool) -> KeyedVec<NodeId, BitDomain> {
    let mut domains: KeyedVec<NodeId, BitDomain> = KeyedVec::default();
    for node in terms.node_ids() {
        let domain = match terms.kind(node) {
            NodeKind::Variable => BitDomain::free(terms.width(node)),
            NodeKind::Constant(value) => BitDomain::fixed_to(value),
            NodeKind::Operator(op) if constant_bits => {
                let operands = terms
                    .children(node)
                    .iter()
                    .map(|&child| domains[child])
                    .collect::<Vec<_>>();
                propagate(op, &operands)
            }
            NodeKind::Operator(_) => BitDomain::free(terms.width(node)),
        };
        let _ = domains.push(domain);
    }
    domains
}

/// The domain of the result of `op` applied to operands from the given domains.
pub(crate) fn propagate(op: BvOp, operands: &[BitDomain]) -> BitDomain {
    if operands.iter().all(BitDomain::is_fixed) {
        let values = operands
            .iter()
            .map(|domain| BitVector::new(domain.fixed_values(), domain.width()))
            .collect::<Vec<_>>();
        return BitDomain::fixed_to(op.evaluate(&values));
    }

    match op {
        BvOp::Not => {
            let a = operands[0];
            BitDomain::new(a.width(), a.fixed_bits(), !a.fixed_values())
        }
        BvOp::And => {
            let (a, b) = (operands[0], operands[1]);
            let ones = a.fixed_values() & b.fixed_values();
            let zeros = zeros(&a) | zeros(&b);
            BitDomain::new(a.width(), ones | zeros, ones)
        }
        BvOp::Or => {
            let (a, b) = (operands[0], operands[1]);
            let ones = a.fixed_values() | b.fixed_values();
            let zeros = zeros(&a) & zeros(&b);
            BitDomain::new(a.width(), ones | zeros, ones)
        }
        BvOp::Xor => {
            let (a, b) = (operands[0], operands[1]);
            let fixed = a.fixed_bits() & b.fixed_bits();
            BitDomain::new(a.width(), fixed, a.fixed_values() ^ b.fixed_values())
        }
        BvOp::Add => ripple_carry_add(operands[0], operands[1], false),
        BvOp::Sub => ripple_carry_add(operands[0], operands[1].complement(), true),
        BvOp::Mul => {
            let (a, b) = (operands[0], operands[1]);
            let width = a.width();
            let trailing_zeros = (known_trailing_zeros(&a) + known_trailing_zeros(&b)).min(width);
            BitDomain::new(width, width_mask(trailing_zeros), 0)
        }
        BvOp::Shl | BvOp::Lshr | BvOp::Ashr => shift(op, operands[0], operands[1]),
        BvOp::Ult => compare(
            (operands[0].lower_bound(), operands[0].upper_bound()),
            (operands[1].lower_bound(), operands[1].upper_bound()),
        ),
        BvOp::Slt => compare(signed_bounds(&operands[0]), signed_bounds(&operands[1])),
        BvOp::Eq => {
            let (a, b) = (operands[0], operands[1]);
            let conflicting = a.fixed_bits() & b.fixed_bits() & (a.fixed_values() ^ b.fixed_values());
            if conflicting != 0 {
                BitDomain::fixed_to(BitVector::from_bool(false))
            } else {
                BitDomain::free(1)
            }
        }
        BvOp::Concat => {
            let (high, low) = (operands[0], operands[1]);
            BitDomain::new(
                high.width() + low.width(),
                (high.fixed_bits() << low.width()) | low.fixed_bits(),
                (high.fixed_values() << low.width()) | low.fixed_values(),
            )
        }
        BvOp::Extract { upper, lower } => {
            let a = operands[0];
            BitDomain::new(
                upper - lower + 1,
                a.fixed_bits() >> lower,
                a.fixed_values() >> lower,
            )
        }
        BvOp::SignExtend { by } => {
            let a = operands[0];
            let width = a.width() + by;
            let extension = width_mask(width) & !a.mask();
            match a.bit(a.width() - 1) {
                Some(sign) => BitDomain::new(
                    width,
                    a.fixed_bits() | extension,
                    a.fixed_values() | if sign { extension } else { 0 },
                ),
                None => BitDomain::new(width, a.fixed_bits(), a.fixed_values()),
            }
        }
        BvOp::Ite => {
            let (condition, then_branch, else_branch) = (operands[0], operands[1], operands[2]);
            match condition.bit(0) {
                Some(true) => then_branch,
                Some(false) => else_branch,
                None => {
                    let agreeing = then_branch.fixed_bits()
                        & else_branch.fixed_bits()
                        & !(then_branch.fixed_values() ^ else_branch.fixed_values());
                    BitDomain::new(then_branch.width(), agreeing, then_branch.fixed_values())
                }
            }
        }
        BvOp::Udiv | BvOp::Urem | BvOp::Sdiv | BvOp::Srem => BitDomain::free(operands[0].width()),
    }
}

/// The bits which are fixed to 0.
fn zeros(domain: &BitDomain) -> u64 {
    domain.fixed_bits() & !domain.fixed_values()
}

/// The number of least significant bits which are fixed to 0.
fn known_trailing_zeros(domain: &BitDomain) -> u32 {
    (!zeros(domain)).trailing_zeros().min(domain.width())
}

/// Ternary ripple-carry addition of `a + b + carry_in`.
fn ripple_carry_add(a: BitDomain, b: BitDomain, carry_in: bool) -> BitDomain {
    let width = a.width();
    let mut carry = Some(carry_in);
    let mut fixed = 0;
    let mut value = 0;
    for index in 0..width {
        let (x, y) = (a.bit(index), b.bit(index));
        if let (Some(x), Some(y), Some(c)) = (x, y, carry) {
            fixed |= 1 << index;
            value |= ((x ^ y ^ c) as u64) << index;
        }

        let inputs = [x, y, carry];
        let ones = inputs.iter().filter(|bit| **bit == Some(true)).count();
        let zeros = inputs.iter().filter(|bit| **bit == Some(false)).count();
        carry = if ones >= 2 {
            Some(true)
        } else if zeros >= 2 {
            Some(false)
        } else {
            None
        };
    }
    BitDomain::new(width, fixed, value)
}

fn shift(op: BvOp, value: BitDomain, amount: BitDomain) -> BitDomain {
    let width = value.width();
    let mask = width_mask(width);
    if !amount.is_fixed() {
        return BitDomain::free(width);
    }

    let amount = amount.fixed_values();
    let sign = value.bit(width - 1);
    match op {
        BvOp::Shl if amount >= width as u64 => BitDomain::fixed_to(BitVector::zero(width)),
        BvOp::Shl => BitDomain::new(
            width,
            (value.fixed_bits() << amount) | width_mask(amount as u32),
            value.fixed_values() << amount,
        ),
        BvOp::Lshr if amount >= width as u64 => BitDomain::fixed_to(BitVector::zero(width)),
        BvOp::Lshr => {
            let vacated = mask & !(mask >> amount);
            BitDomain::new(
                width,
                (value.fixed_bits() >> amount) | vacated,
                value.fixed_values() >> amount,
            )
        }
        _ => {
            let amount = amount.min(width as u64 - 1);
            let vacated = mask & !(mask >> amount);
            match sign {
                Some(sign) => BitDomain::new(
                    width,
                    (value.fixed_bits() >> amount) | vacated,
                    (value.fixed_values() >> amount) | if sign { vacated } else { 0 },
                ),
                None => BitDomain::new(
                    width,
                    (value.fixed_bits() >> amount) & !vacated,
                    value.fixed_values() >> amount,
                ),
            }
        }
    }
}

/// The bounds of the domain in the order in which the signed values are ordered, i.e. with the
/// sign bit flipped.
fn signed_bounds(domain: &BitDomain) -> (u64, u64) {
    let sign = 1 << (domain.width() - 1);
    let biased = match domain.bit(domain.width() - 1) {
        Some(_) => BitDomain::new(
            domain.width(),
            domain.fixed_bits(),
            domain.fixed_values() ^ sign,
        ),
        None => *domain,
    };
    (biased.lower_bound(), biased.upper_bound())
}

/// Decides `a < b` from bounds on both sides if possible.
fn compare((a_min, a_max): (u64, u64), (b_min, b_max): (u64, u64)) -> BitDomain {
    if a_max < b_min {
        BitDomain::fixed_to(BitVector::from_bool(true))
    } else if a_min >= b_max {
        BitDomain::fixed_to(BitVector::from_bool(false))
    } else {
        BitDomain::free(1)
    }
}

#[cfg(test)]
mod tests {
    use super::compute_domains;
    use super::propagate;
    use crate::basic_types::BitVector;
    use crate::domains::all_domains;
    use crate::domains::BitDomain;
    use crate::terms::BvOp;
    use crate::terms::TermGraph;

    fn members(domain: &BitDomain) -> Vec<BitVector> {
        (0..1_u64 << domain.width())
            .filter(|&value| domain.contains(value))
            .map(|value| BitVector::new(value, domain.width()))
            .collect()
    }

    /// Checks that every result of `op` over values from the operand domains is consistent with
    /// the propagated domain.
    fn assert_sound(op: BvOp, operand_domains: &[Vec<BitDomain>]) {
        let mut combinations: Vec<Vec<BitDomain>> = vec![vec![]];
        for domains in operand_domains {
            combinations = combinations
                .into_iter()
                .flat_map(|prefix| {
                    domains.iter().map(move |domain| {
                        let mut extended = prefix.clone();
                        extended.push(*domain);
                        extended
                    })
                })
                .collect();
        }

        for domains in combinations {
            let result = propagate(op, &domains);
            let mut assignments: Vec<Vec<BitVector>> = vec![vec![]];
            for domain in &domains {
                assignments = assignments
                    .into_iter()
                    .flat_map(|prefix| {
                        members(domain).into_iter().map(move |value| {
                            let mut extended = prefix.clone();
                            extended.push(value);
                            extended
                        })
                    })
                    .collect();
            }
            for values in assignments {
                let evaluated = op.evaluate(&values);
                assert!(
                    result.matches(evaluated),
                    "{op} over {domains:?} gives {result} which excludes {evaluated}"
                );
            }
        }
    }

    #[test]
    fn binary_operators_are_sound() {
        let operators = [
            BvOp::And,
            BvOp::Or,
            BvOp::Xor,
            BvOp::Add,
            BvOp::Sub,
            BvOp::Mul,
            BvOp::Udiv,
            BvOp::Urem,
            BvOp::Sdiv,
            BvOp::Srem,
            BvOp::Shl,
            BvOp::Lshr,
            BvOp::Ashr,
            BvOp::Ult,
            BvOp::Slt,
            BvOp::Eq,
        ];
        for width in 1..=3 {
            let domains = all_domains(width);
            for op in operators {
                assert_sound(op, &[domains.clone(), domains.clone()]);
            }
        }
    }

    #[test]
    fn structural_operators_are_sound() {
        let three = all_domains(3);
        let two = all_domains(2);
        assert_sound(BvOp::Not, &[three.clone()]);
        assert_sound(BvOp::Concat, &[two.clone(), three.clone()]);
        assert_sound(BvOp::Extract { upper: 2, lower: 1 }, &[three.clone()]);
        assert_sound(BvOp::SignExtend { by: 2 }, &[three.clone()]);
        assert_sound(BvOp::Ite, &[all_domains(1), two.clone(), two]);
    }

    #[test]
    fn fixed_bits_are_derived() {
        let x = BitDomain::free(4);
        let mask = BitDomain::fixed_to(BitVector::new(0b0100, 4));
        let conjunction = propagate(BvOp::And, &[x, mask]);
        assert_eq!(conjunction.to_string(), "0x00");

        let target = BitDomain::fixed_to(BitVector::new(0b1000, 4));
        let equality = propagate(BvOp::Eq, &[conjunction, target]);
        assert_eq!(equality, BitDomain::fixed_to(BitVector::from_bool(false)));

        let even = BitDomain::new(4, 0b0001, 0);
        assert_eq!(propagate(BvOp::Mul, &[even, even]).to_string(), "xx00");
        assert_eq!(propagate(BvOp::Add, &[even, even]).to_string(), "xxx0");
    }

    #[test]
    fn domains_of_a_term_graph() {
        let mut terms = TermGraph::default();
        let x = terms.new_variable(4).unwrap();
        let constant = terms.constant(BitVector::new(0b0100, 4));
        let conjunction = terms.and(x, constant).unwrap();

        let propagated = compute_domains(&terms, true);
        assert_eq!(propagated[x], BitDomain::free(4));
        assert!(propagated[constant].is_fixed());
        assert_eq!(propagated[conjunction].to_string(), "0x00");

        let unpropagated = compute_domains(&terms, false);
        assert!(unpropagated[constant].is_fixed());
        assert_eq!(unpropagated[conjunction], BitDomain::free(4));
    }
}
