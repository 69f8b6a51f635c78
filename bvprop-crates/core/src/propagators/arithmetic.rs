use crate::basic_types::width_mask;
use crate::basic_types::BitVector;
use crate::domains::SolutionSet;

pub(super) fn add_inverse(target: BitVector, sibling: BitVector) -> SolutionSet {
    SolutionSet::point(target.width(), target.wrapping_sub(sibling).value())
}

pub(super) fn sub_inverse(target: BitVector, sibling: BitVector, position: usize) -> SolutionSet {
    let solution = if position == 0 {
        // x - s = t
        target.wrapping_add(sibling)
    } else {
        // s - x = t
        sibling.wrapping_sub(target)
    };
    SolutionSet::point(target.width(), solution.value())
}

/// `x * s = t`: with `s = 2^c * o` for odd `o`, `t` needs at least `c` trailing zeros and then
/// the lowest `width - c` bits of `x` are `(t >> c) * o^-1`.
pub(super) fn mul_inverse(target: BitVector, sibling: BitVector) -> SolutionSet {
    let width = target.width();
    let (t, s) = (target.value(), sibling.value());
    if s == 0 {
        return if t == 0 {
            SolutionSet::all(width)
        } else {
            SolutionSet::empty(width)
        };
    }

    let shift = s.trailing_zeros();
    if t & width_mask(shift) != 0 {
        return SolutionSet::empty(width);
    }
    let inverse = multiplicative_inverse(s >> shift);
    let determined = width_mask(width - shift);
    SolutionSet::pattern(width, determined, (t >> shift).wrapping_mul(inverse))
}

/// Some `s` gives `x * s = t` iff `x` has at most as many trailing zeros as `t`.
pub(super) fn mul_consistent(target: BitVector) -> SolutionSet {
    let width = target.width();
    if target.is_zero() {
        return SolutionSet::all(width);
    }

    let mut set = SolutionSet::empty(width);
    for lowest_one in 0..=target.count_trailing_zeros() {
        set.add_pattern(width_mask(lowest_one + 1), 1 << lowest_one);
    }
    set
}

/// The inverse of an odd number modulo `2^64`, by Newton iteration; every iteration doubles the
/// number of correct bits, starting from the three bits for which `o * o = 1 (mod 8)`.
fn multiplicative_inverse(odd: u64) -> u64 {
    let mut inverse = odd;
    for _ in 0..5 {
        inverse = inverse.wrapping_mul(2_u64.wrapping_sub(odd.wrapping_mul(inverse)));
    }
    inverse
}
