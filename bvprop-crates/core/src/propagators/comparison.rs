use crate::basic_types::BitVector;
use crate::domains::SolutionSet;

/// The unsigned solutions of `x < s = t` (position 0) or `s < x = t` (position 1), as a range.
fn unsigned_range(target: bool, sibling: u64, mask: u64, position: usize) -> Option<(u64, u64)> {
    match (position, target) {
        (0, true) => sibling.checked_sub(1).map(|upper| (0, upper)),
        (0, false) => Some((sibling, mask)),
        (_, true) => (sibling < mask).then(|| (sibling + 1, mask)),
        (_, false) => Some((0, sibling)),
    }
}

pub(super) fn ult_inverse(target: BitVector, sibling: BitVector, position: usize) -> SolutionSet {
    let width = sibling.width();
    match unsigned_range(target.is_true(), sibling.value(), sibling.mask(), position) {
        Some((lower, upper)) => SolutionSet::range(width, lower, upper),
        None => SolutionSet::empty(width),
    }
}

/// For `t = 1` the smaller operand cannot be the maximum and the larger one cannot be zero.
pub(super) fn ult_consistent(target: BitVector, width: u32, position: usize) -> SolutionSet {
    let mask = BitVector::ones(width).value();
    match (target.is_true(), position) {
        (false, _) => SolutionSet::all(width),
        (true, 0) => SolutionSet::range(width, 0, mask - 1),
        (true, _) => SolutionSet::range(width, 1, mask),
    }
}

/// Signed comparisons become unsigned ones after flipping the sign bit; a range over the biased
/// values corresponds to at most two ranges over the actual values.
pub(super) fn slt_inverse(target: BitVector, sibling: BitVector, position: usize) -> SolutionSet {
    let width = sibling.width();
    let sign = 1 << (width - 1);
    let mut set = SolutionSet::empty(width);
    if let Some((lower, upper)) = unsigned_range(
        target.is_true(),
        sibling.value() ^ sign,
        sibling.mask(),
        position,
    ) {
        add_biased_range(&mut set, lower, upper, sign, sibling.mask());
    }
    set
}

pub(super) fn slt_consistent(target: BitVector, width: u32, position: usize) -> SolutionSet {
    let mask = BitVector::ones(width).value();
    let sign = 1 << (width - 1);
    let mut set = SolutionSet::empty(width);
    match (target.is_true(), position) {
        (false, _) => return SolutionSet::all(width),
        (true, 0) => add_biased_range(&mut set, 0, mask - 1, sign, mask),
        (true, _) => add_biased_range(&mut set, 1, mask, sign, mask),
    }
    set
}

fn add_biased_range(set: &mut SolutionSet, lower: u64, upper: u64, sign: u64, mask: u64) {
    if lower < sign && upper >= sign {
        set.add_range(lower ^ sign, mask);
        set.add_range(0, upper ^ sign);
    } else {
        set.add_range(lower ^ sign, upper ^ sign);
    }
}

pub(super) fn eq_inverse(target: BitVector, sibling: BitVector) -> SolutionSet {
    if target.is_true() {
        SolutionSet::point(sibling.width(), sibling.value())
    } else {
        SolutionSet::except(sibling.width(), sibling.value())
    }
}
