use crate::basic_types::BitVector;
use crate::domains::SolutionSet;

pub(super) fn not_inverse(target: BitVector) -> SolutionSet {
    SolutionSet::point(target.width(), (!target).value())
}

/// `x & s = t` requires the bits of `t` to be covered by `s`; under the ones of `s` the value of
/// `x` is determined by `t`, the other bits are free.
pub(super) fn and_inverse(target: BitVector, sibling: BitVector) -> SolutionSet {
    let (t, s) = (target.value(), sibling.value());
    if t & !s != 0 {
        return SolutionSet::empty(target.width());
    }
    SolutionSet::pattern(target.width(), s, t)
}

/// Some `s` gives `x & s = t` iff `x` has all the ones of `t`.
pub(super) fn and_consistent(target: BitVector) -> SolutionSet {
    SolutionSet::pattern(target.width(), target.value(), target.value())
}

pub(super) fn or_inverse(target: BitVector, sibling: BitVector) -> SolutionSet {
    let (t, s) = (target.value(), sibling.value());
    if s & !t != 0 {
        return SolutionSet::empty(target.width());
    }
    SolutionSet::pattern(target.width(), !s, t & !s)
}

/// Some `s` gives `x | s = t` iff `x` has none of the zeros of `t`.
pub(super) fn or_consistent(target: BitVector) -> SolutionSet {
    SolutionSet::pattern(target.width(), !target.value(), 0)
}

pub(super) fn xor_inverse(target: BitVector, sibling: BitVector) -> SolutionSet {
    SolutionSet::point(target.width(), (target ^ sibling).value())
}
