//! The score of a constraint estimates how close it is to having its required value; the bandit
//! selector prefers constraints with a high score.
use super::model::Model;
use crate::basic_types::BitVector;
use crate::terms::BvOp;
use crate::terms::NodeId;
use crate::terms::NodeKind;
use crate::terms::TermGraph;

/// The factor scaling the score of a violated comparison, which keeps it below the score `1` of a
/// satisfied one.
const SCORE_FACTOR: f64 = 0.5;

/// Computes the score in `[0, 1]` of `node` having the value `required`.
pub(crate) fn compute_score(terms: &TermGraph, model: &Model, node: NodeId, required: bool) -> f64 {
    let satisfied = model.value(node).is_true() == required;
    let NodeKind::Operator(op) = terms.kind(node) else {
        return if satisfied { 1.0 } else { 0.0 };
    };
    let children = terms.children(node);

    match op {
        BvOp::Not => compute_score(terms, model, children[0], !required),
        BvOp::And if terms.width(node) == 1 => {
            let scores = children
                .iter()
                .map(|&child| compute_score(terms, model, child, required));
            if required {
                scores.sum::<f64>() / children.len() as f64
            } else {
                scores.fold(0.0, f64::max)
            }
        }
        _ if satisfied => 1.0,
        BvOp::Eq if required => {
            let (lhs, rhs) = (model.value(children[0]), model.value(children[1]));
            SCORE_FACTOR * (1.0 - lhs.hamming_distance(rhs) as f64 / lhs.width() as f64)
        }
        BvOp::Ult | BvOp::Slt => {
            let (mut lhs, mut rhs) = (model.value(children[0]), model.value(children[1]));
            if op == BvOp::Slt {
                let sign = BitVector::min_signed(lhs.width());
                lhs = lhs ^ sign;
                rhs = rhs ^ sign;
            }
            let flips = if required {
                min_flip(lhs, rhs)
            } else {
                min_flip_inverse(lhs, rhs)
            };
            SCORE_FACTOR * (1.0 - flips as f64 / lhs.width() as f64)
        }
        _ => 0.0,
    }
}

/// The number of one-bits of `lhs` which have to be cleared, from the most significant one on,
/// until `lhs < rhs`; clearing all of them is needed if `rhs` is zero.
fn min_flip(lhs: BitVector, rhs: BitVector) -> u32 {
    if rhs.is_zero() {
        return lhs.value().count_ones();
    }
    let mut value = lhs.value();
    let mut flips = 0;
    for index in (0..lhs.width()).rev() {
        let bit = 1 << index;
        if value & bit == 0 || rhs.value() & bit != 0 {
            continue;
        }
        value &= !bit;
        flips += 1;
        if value < rhs.value() {
            break;
        }
    }
    flips
}

/// The number of zero-bits of `lhs` which have to be set, from the most significant one on, until
/// `lhs >= rhs`.
fn min_flip_inverse(lhs: BitVector, rhs: BitVector) -> u32 {
    let mut value = lhs.value();
    let mut flips = 0;
    for index in (0..lhs.width()).rev() {
        let bit = 1 << index;
        if value & bit != 0 || rhs.value() & bit == 0 {
            continue;
        }
        value |= bit;
        flips += 1;
        if value >= rhs.value() {
            break;
        }
    }
    flips
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::*;
    use crate::domains::forward::compute_domains;
    use crate::engine::model::Model;
    use crate::engine::InitialValues;

    #[test]
    fn flips_are_counted_from_the_top() {
        let bv = |value| BitVector::new(value, 4);
        assert_eq!(min_flip(bv(0b1100), bv(0b0101)), 1);
        assert_eq!(min_flip(bv(0b0111), bv(0b0000)), 3);
        assert_eq!(min_flip_inverse(bv(0b0001), bv(0b1010)), 2);
        assert_eq!(min_flip_inverse(bv(0b0001), bv(0b1000)), 1);
    }

    #[test]
    fn scores_of_comparisons() {
        let mut terms = TermGraph::default();
        let x = terms.new_variable(4).unwrap();
        let y = terms.constant(BitVector::new(0b0011, 4));
        let equal = terms.eq(x, y).unwrap();
        let less = terms.ult(y, x).unwrap();
        let both = terms.and(equal, less).unwrap();
        let domains = compute_domains(&terms, true);
        let model = Model::initialise(
            &terms,
            &domains,
            InitialValues::Zero,
            &mut SmallRng::seed_from_u64(42),
        );

        // x = 0000 differs from 0011 in two bits
        assert_eq!(compute_score(&terms, &model, equal, true), 0.25);
        assert_eq!(compute_score(&terms, &model, equal, false), 1.0);
        // 0011 < 0000 needs both ones of the left-hand side to be cleared
        assert_eq!(compute_score(&terms, &model, less, true), 0.25);
        assert_eq!(compute_score(&terms, &model, both, true), 0.25);
        assert_eq!(compute_score(&terms, &model, both, false), 1.0);
    }
}
