//! The propagator library: for every operator, the computation of inverse and consistent values.
//!
//! Given an operator node with target value `t` and the current values of its operands, an
//! operand `x` at some position is *invertible* if it can take a value consistent with its
//! domain such that the node evaluates to `t` while all other operands keep their current values.
//! It is *consistent* if it can take a value consistent with its domain such that the node
//! evaluates to `t` for some values of the other operands.
//!
//! Every check is exact: the solutions of the operand are described as a [`SolutionSet`] which is
//! intersected with the domain of the operand. Selecting a value picks a random member of this
//! intersection.
mod arithmetic;
mod bitwise;
mod comparison;
mod division;
mod ite;
mod shift;
mod structural;

use arithmetic::*;
use bitwise::*;
use comparison::*;
use division::*;
use ite::*;
use shift::*;
use structural::*;

use crate::basic_types::BitVector;
use crate::basic_types::Random;
use crate::bvprop_assert_advanced;
use crate::bvprop_assert_moderate;
use crate::domains::BitDomain;
use crate::domains::SolutionSet;
use crate::terms::BvOp;

/// The value of the operand next to `position` of a binary operator.
fn sibling(operands: &[BitVector], position: usize) -> BitVector {
    operands[1 - position]
}

/// The values of the operand at `position` which make the operator evaluate to `target`, given
/// the values of the other operands.
fn inverse_solutions(
    op: &BvOp,
    target: BitVector,
    operands: &[BitVector],
    position: usize,
) -> SolutionSet {
    bvprop_assert_moderate!(operands.len() == op.arity() && position < op.arity());
    match op {
        BvOp::Not => not_inverse(target),
        BvOp::And => and_inverse(target, sibling(operands, position)),
        BvOp::Or => or_inverse(target, sibling(operands, position)),
        BvOp::Xor => xor_inverse(target, sibling(operands, position)),
        BvOp::Add => add_inverse(target, sibling(operands, position)),
        BvOp::Sub => sub_inverse(target, sibling(operands, position), position),
        BvOp::Mul => mul_inverse(target, sibling(operands, position)),
        BvOp::Udiv => udiv_inverse(target, sibling(operands, position), position),
        BvOp::Urem => urem_inverse(target, sibling(operands, position), position),
        BvOp::Sdiv => sdiv_inverse(target, sibling(operands, position), position),
        BvOp::Srem => srem_inverse(target, sibling(operands, position), position),
        BvOp::Shl => shl_inverse(target, operands, position),
        BvOp::Lshr => lshr_inverse(target, operands, position),
        BvOp::Ashr => ashr_inverse(target, operands, position),
        BvOp::Ult => ult_inverse(target, sibling(operands, position), position),
        BvOp::Slt => slt_inverse(target, sibling(operands, position), position),
        BvOp::Eq => eq_inverse(target, sibling(operands, position)),
        BvOp::Concat => concat_inverse(target, operands, position),
        BvOp::Extract { lower, .. } => extract_solutions(target, operands[0].width(), *lower),
        BvOp::SignExtend { by } => sign_extend_solutions(target, *by),
        BvOp::Ite => ite_inverse(target, operands, position),
    }
}

/// The values of the operand at `position` which make the operator evaluate to `target` for some
/// values of the other operands; only the widths of the other operands are used.
fn consistent_solutions(
    op: &BvOp,
    target: BitVector,
    operands: &[BitVector],
    position: usize,
) -> SolutionSet {
    bvprop_assert_moderate!(operands.len() == op.arity() && position < op.arity());
    let width = operands[position].width();
    match op {
        BvOp::Not => not_inverse(target),
        BvOp::And => and_consistent(target),
        BvOp::Or => or_consistent(target),
        BvOp::Xor | BvOp::Add | BvOp::Sub | BvOp::Eq | BvOp::Ite => SolutionSet::all(width),
        BvOp::Mul => mul_consistent(target),
        BvOp::Udiv => udiv_consistent(target, position),
        BvOp::Urem => urem_consistent(target, position),
        BvOp::Sdiv => sdiv_consistent(target, position),
        BvOp::Srem => srem_consistent(target, position),
        BvOp::Shl => shl_consistent(target, position),
        BvOp::Lshr => lshr_consistent(target, position),
        BvOp::Ashr => ashr_consistent(target, position),
        BvOp::Ult => ult_consistent(target, width, position),
        BvOp::Slt => slt_consistent(target, width, position),
        BvOp::Concat => concat_consistent(target, operands, position),
        BvOp::Extract { lower, .. } => extract_solutions(target, width, *lower),
        BvOp::SignExtend { by } => sign_extend_solutions(target, *by),
    }
}

/// Whether the operand at `position` has a value in `domain` for which the operator evaluates to
/// `target` while the other operands keep their values.
pub fn is_invertible(
    op: &BvOp,
    target: BitVector,
    operands: &[BitVector],
    position: usize,
    domain: &BitDomain,
) -> bool {
    inverse_solutions(op, target, operands, position).meets(domain)
}

/// Selects a random inverse value for the operand at `position`; returns `None` if the operand is
/// not invertible.
pub fn inverse_value(
    op: &BvOp,
    target: BitVector,
    operands: &[BitVector],
    position: usize,
    domain: &BitDomain,
    random: &mut dyn Random,
) -> Option<BitVector> {
    let width = operands[position].width();
    let value = inverse_solutions(op, target, operands, position)
        .pick(domain, random)
        .map(|value| BitVector::new(value, width))?;

    bvprop_assert_advanced!(
        {
            let mut updated = operands.to_vec();
            updated[position] = value;
            op.evaluate(&updated) == target
        },
        "The inverse value {value} of {op} does not produce {target}"
    );
    Some(value)
}

/// Whether the operand at `position` has a value in `domain` for which the operator can evaluate
/// to `target` with suitable values for the other operands.
pub fn is_consistent(
    op: &BvOp,
    target: BitVector,
    operands: &[BitVector],
    position: usize,
    domain: &BitDomain,
) -> bool {
    consistent_solutions(op, target, operands, position).meets(domain)
}

/// Selects a random consistent value for the operand at `position`; returns `None` if no value in
/// the domain is consistent.
pub fn consistent_value(
    op: &BvOp,
    target: BitVector,
    operands: &[BitVector],
    position: usize,
    domain: &BitDomain,
    random: &mut dyn Random,
) -> Option<BitVector> {
    let width = operands[position].width();
    consistent_solutions(op, target, operands, position)
        .pick(domain, random)
        .map(|value| BitVector::new(value, width))
}

/// An operand is essential if no other operand is invertible, i.e. the target can only be produced
/// by changing this operand. The operand of a unary operator is always essential.
pub fn is_essential(
    op: &BvOp,
    target: BitVector,
    operands: &[BitVector],
    position: usize,
    domains: &[BitDomain],
) -> bool {
    (0..op.arity())
        .filter(|&other| other != position)
        .all(|other| !is_invertible(op, target, operands, other, &domains[other]))
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::*;
    use crate::basic_types::width_mask;
    use crate::domains::all_domains;

    /// All tuples of values of the given widths.
    fn assignments(widths: &[u32]) -> Vec<Vec<BitVector>> {
        widths.iter().fold(vec![vec![]], |tuples, &width| {
            tuples
                .into_iter()
                .flat_map(|tuple| {
                    (0..=width_mask(width)).map(move |value| {
                        let mut extended = tuple.clone();
                        extended.push(BitVector::new(value, width));
                        extended
                    })
                })
                .collect()
        })
    }

    fn with_operand(operands: &[BitVector], position: usize, value: u64) -> Vec<BitVector> {
        let mut updated = operands.to_vec();
        updated[position] = BitVector::new(value, operands[position].width());
        updated
    }

    /// Compares the propagators of `op` against enumerating all operand values.
    fn check_against_enumeration(op: BvOp, widths: &[u32]) {
        let mut rng = SmallRng::seed_from_u64(42);
        let all = assignments(widths);
        let target_width = op.evaluate(&all[0]).width();
        let targets = (0..=width_mask(target_width))
            .map(|value| BitVector::new(value, target_width))
            .collect::<Vec<_>>();

        for position in 0..op.arity() {
            let domains = all_domains(widths[position]);
            let values = 0..=width_mask(widths[position]);

            for operands in all.iter().filter(|operands| operands[position].is_zero()) {
                for &target in &targets {
                    for domain in &domains {
                        let expected = values.clone().any(|value| {
                            domain.contains(value)
                                && op.evaluate(&with_operand(operands, position, value)) == target
                        });
                        assert_eq!(
                            is_invertible(&op, target, operands, position, domain),
                            expected,
                            "invertibility of {op} at {position} for {target} with {operands:?} in {domain}"
                        );

                        match inverse_value(&op, target, operands, position, domain, &mut rng) {
                            Some(value) => {
                                assert!(domain.matches(value));
                                let updated = with_operand(operands, position, value.value());
                                assert_eq!(op.evaluate(&updated), target);
                            }
                            None => assert!(!expected),
                        }
                    }
                }
            }

            // Consistency only depends on the operand itself.
            for &target in &targets {
                let reachable = |value: u64| {
                    all.iter().any(|operands| {
                        operands[position].value() == value && op.evaluate(operands) == target
                    })
                };
                for domain in &domains {
                    let expected = values
                        .clone()
                        .any(|value| domain.contains(value) && reachable(value));
                    assert_eq!(
                        is_consistent(&op, target, &all[0], position, domain),
                        expected,
                        "consistency of {op} at {position} for {target} in {domain}"
                    );

                    match consistent_value(&op, target, &all[0], position, domain, &mut rng) {
                        Some(value) => {
                            assert!(domain.matches(value));
                            assert!(reachable(value.value()));
                        }
                        None => assert!(!expected),
                    }
                }
            }
        }
    }

    #[test]
    fn bitwise_operators() {
        for width in 1..=4 {
            for op in [BvOp::Not] {
                check_against_enumeration(op, &[width]);
            }
            for op in [BvOp::And, BvOp::Or, BvOp::Xor] {
                check_against_enumeration(op, &[width, width]);
            }
        }
    }

    #[test]
    fn arithmetic_operators() {
        for width in 1..=4 {
            for op in [BvOp::Add, BvOp::Sub, BvOp::Mul] {
                check_against_enumeration(op, &[width, width]);
            }
        }
    }

    #[test]
    fn division_operators() {
        for width in 1..=4 {
            for op in [BvOp::Udiv, BvOp::Urem, BvOp::Sdiv, BvOp::Srem] {
                check_against_enumeration(op, &[width, width]);
            }
        }
    }

    #[test]
    fn shift_operators() {
        for width in 1..=4 {
            for op in [BvOp::Shl, BvOp::Lshr, BvOp::Ashr] {
                check_against_enumeration(op, &[width, width]);
            }
        }
    }

    #[test]
    fn comparison_operators() {
        for width in 1..=4 {
            for op in [BvOp::Ult, BvOp::Slt, BvOp::Eq] {
                check_against_enumeration(op, &[width, width]);
            }
        }
    }

    #[test]
    fn structural_operators() {
        check_against_enumeration(BvOp::Concat, &[1, 1]);
        check_against_enumeration(BvOp::Concat, &[2, 3]);
        check_against_enumeration(BvOp::Concat, &[3, 1]);
        check_against_enumeration(BvOp::Extract { upper: 0, lower: 0 }, &[1]);
        check_against_enumeration(BvOp::Extract { upper: 2, lower: 1 }, &[4]);
        check_against_enumeration(BvOp::Extract { upper: 3, lower: 3 }, &[4]);
        check_against_enumeration(BvOp::SignExtend { by: 1 }, &[1]);
        check_against_enumeration(BvOp::SignExtend { by: 2 }, &[2]);
        check_against_enumeration(BvOp::SignExtend { by: 0 }, &[3]);
    }

    #[test]
    fn if_then_else() {
        for width in 1..=3 {
            check_against_enumeration(BvOp::Ite, &[1, width, width]);
        }
    }

    #[test]
    fn large_widths_use_closed_forms() {
        let mut rng = SmallRng::seed_from_u64(1);
        let target = BitVector::new(0x1234_5678_9abc_def0, 64);
        let sibling = BitVector::new(0x10, 64);
        let domain = BitDomain::free(64);

        let value = inverse_value(&BvOp::Mul, target, &[sibling, sibling], 0, &domain, &mut rng)
            .unwrap();
        assert_eq!(value.wrapping_mul(sibling), target);

        let target = BitVector::new(0x1234_5678, 64);
        let value = inverse_value(&BvOp::Udiv, target, &[sibling, sibling], 0, &domain, &mut rng)
            .unwrap();
        assert_eq!(value.udiv(sibling), target);

        assert!(!is_invertible(
            &BvOp::Shl,
            BitVector::new(1, 64),
            &[sibling, sibling],
            0,
            &domain
        ));
    }

    #[test]
    fn wide_dividends_with_large_divisors() {
        let mut rng = SmallRng::seed_from_u64(42);
        let quotient = BitVector::new(1 << 40, 64);
        let dividend = BitVector::new(5000 << 40, 64);
        let operands = [BitVector::zero(64), BitVector::zero(64)];
        let domain = BitDomain::fixed_to(dividend);

        for op in [BvOp::Udiv, BvOp::Sdiv] {
            assert!(is_consistent(&op, quotient, &operands, 0, &domain));
            assert_eq!(
                consistent_value(&op, quotient, &operands, 0, &domain, &mut rng),
                Some(dividend)
            );
            assert!(is_invertible(
                &op,
                quotient,
                &[dividend, BitVector::new(5000, 64)],
                0,
                &domain
            ));
        }
    }

    #[test]
    fn wide_divisors_with_large_cofactors() {
        let mut rng = SmallRng::seed_from_u64(42);
        let zero = BitVector::zero(64);
        let dividend = BitVector::new(131_071 * 524_287, 64);
        let divisor = BitVector::new(131_071, 64);
        let domain = BitDomain::fixed_to(divisor);

        for op in [BvOp::Urem, BvOp::Srem] {
            assert!(is_invertible(&op, zero, &[dividend, zero], 1, &domain));
            assert_eq!(
                inverse_value(&op, zero, &[dividend, zero], 1, &domain, &mut rng),
                Some(divisor)
            );
        }

        // Without constant bits, every divisor is a candidate.
        let free = BitDomain::free(64);
        for _ in 0..8 {
            let value =
                inverse_value(&BvOp::Urem, zero, &[dividend, zero], 1, &free, &mut rng).unwrap();
            assert_eq!(dividend.urem(value), zero);
        }
    }

    #[test]
    fn essential_operands() {
        let (one, zero) = (BitVector::new(1, 1), BitVector::new(0, 1));
        let free = [BitDomain::free(1), BitDomain::free(1)];

        // x & y = 1 with x = 1 and y = 0: only a change of y produces the target.
        assert!(is_essential(&BvOp::And, one, &[one, zero], 1, &free));
        assert!(!is_essential(&BvOp::And, one, &[one, zero], 0, &free));

        // With y fixed to 0, x is essential as well.
        let fixed = [BitDomain::free(1), BitDomain::fixed_to(zero)];
        assert!(is_essential(&BvOp::And, one, &[one, zero], 0, &fixed));

        assert!(is_essential(&BvOp::Not, one, &[one], 0, &free[..1]));
    }
}
