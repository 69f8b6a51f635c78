//! Solutions of the division operators.
//!
//! The unsigned operators are solved for an interval of sibling values; this covers both the
//! inverse value computation (a single sibling) and the consistent value computation (every
//! sibling). The signed operators are reduced to the unsigned ones on the magnitudes of their
//! operands, one case per combination of signs.
use crate::basic_types::width_mask;
use crate::basic_types::BitVector;
use crate::domains::Piece;
use crate::domains::Scattered;
use crate::domains::SolutionSet;
use crate::math::divisors;

/// Families of at most this many separate intervals are added interval by interval; larger ones
/// are described in closed form.
const LISTED_INTERVALS: u64 = 64;

/// The dividends `x` such that `x / d = quotient` for some `d` in `[divisor_lower,
/// divisor_upper]`.
fn dividends_for_quotient(
    width: u32,
    quotient: u64,
    divisor_lower: u64,
    divisor_upper: u64,
) -> SolutionSet {
    let mask = width_mask(width);
    let mut set = SolutionSet::empty(width);
    if divisor_lower == 0 && quotient == mask {
        return SolutionSet::all(width);
    }
    let divisor_lower = divisor_lower.max(1);
    if divisor_lower > divisor_upper {
        return set;
    }
    if quotient == 0 {
        set.add_range(0, divisor_upper - 1);
        return set;
    }

    // x / d = q iff x is in [q * d, q * d + d - 1]; beyond this bound q * d overflows.
    let divisor_upper = divisor_upper.min(mask / quotient);
    let (q, limit) = (u128::from(quotient), u128::from(mask));

    // Below d = q the intervals of consecutive divisors are separated by gaps.
    let separated_upper = divisor_upper.min(quotient - 1);
    if divisor_lower <= separated_upper {
        if separated_upper - divisor_lower < LISTED_INTERVALS {
            for divisor in divisor_lower..=separated_upper {
                let d = u128::from(divisor);
                set.add_range((q * d) as u64, (q * d + d - 1).min(limit) as u64);
            }
        } else {
            let dividends = Scattered::Dividends {
                quotient,
                divisor_lower,
                divisor_upper: separated_upper,
            };
            set.add_scattered(dividends, 0, mask, false);
        }
    }
    // From d >= q on they touch.
    let touching_lower = divisor_lower.max(quotient);
    if touching_lower <= divisor_upper {
        let (first, last) = (u128::from(touching_lower), u128::from(divisor_upper));
        set.add_range((q * first) as u64, (q * last + last - 1).min(limit) as u64);
    }
    set
}

/// The divisors `x` such that `a / x = quotient` for some `a` in `[dividend_lower,
/// dividend_upper]`.
fn divisors_for_quotient(
    width: u32,
    quotient: u64,
    dividend_lower: u64,
    dividend_upper: u64,
) -> SolutionSet {
    let mask = width_mask(width);
    let mut set = SolutionSet::empty(width);
    if dividend_lower > dividend_upper {
        return set;
    }
    if quotient == mask {
        set.add_point(0);
    }

    // a / x = q iff q * x <= a <= q * x + x - 1.
    let q = u128::from(quotient);
    let lower = ((u128::from(dividend_lower) + 1 + q) / (q + 1)).max(1);
    let upper = if quotient == 0 {
        mask
    } else {
        dividend_upper / quotient
    };
    if let Ok(lower) = u64::try_from(lower) {
        set.add_range(lower, upper);
    }
    set
}

/// The dividends `x` such that `x % d = remainder` for some `d` in `[divisor_lower,
/// divisor_upper]`.
fn dividends_for_remainder(
    width: u32,
    remainder: u64,
    divisor_lower: u64,
    divisor_upper: u64,
) -> SolutionSet {
    let mask = width_mask(width);
    let mut set = SolutionSet::empty(width);
    if divisor_lower > divisor_upper {
        return set;
    }
    if divisor_lower == 0 {
        set.add_point(remainder);
    }
    let Some(smallest_divisor) = remainder.checked_add(1) else {
        return set;
    };
    let lower = divisor_lower.max(smallest_divisor);
    if lower > divisor_upper {
        return set;
    }
    if lower == divisor_upper {
        set.add_progression(remainder, mask, lower, remainder);
        return set;
    }

    // x = r + k * d for some k >= 0 and d in [lower, upper].
    set.add_point(remainder);
    let multiples = Scattered::Multiples {
        offset: remainder,
        divisor_lower: lower,
        divisor_upper,
    };
    set.add_scattered(multiples, 0, mask, false);
    set
}

/// The divisors `x` such that `a % x = remainder` for some `a` in `[dividend_lower,
/// dividend_upper]`.
fn divisors_for_remainder(
    width: u32,
    remainder: u64,
    dividend_lower: u64,
    dividend_upper: u64,
) -> SolutionSet {
    let mask = width_mask(width);
    let mut set = SolutionSet::empty(width);
    if dividend_lower > dividend_upper {
        return set;
    }
    if (dividend_lower..=dividend_upper).contains(&remainder) {
        // a % 0 = a
        set.add_point(0);
    }
    let Some(smallest_divisor) = remainder.checked_add(1) else {
        return set;
    };
    if dividend_upper < remainder {
        return set;
    }
    if dividend_lower <= remainder {
        // a = r gives the remainder for every divisor larger than it.
        set.add_range(smallest_divisor, mask);
        return set;
    }

    // a - r must be a positive multiple of x.
    let (low, high) = (dividend_lower - remainder, dividend_upper - remainder);
    if low == high {
        for divisor in divisors(low).into_iter().filter(|&divisor| divisor > remainder) {
            set.add_point(divisor);
        }
        return set;
    }

    // Any `high - low + 1` consecutive values contain a multiple of x.
    let dense = high - low + 1;
    set.add_range(smallest_divisor, dense);
    set.add_range(smallest_divisor.max(low), high);
    // In between only some values have a multiple in [low, high].
    let sparse_lower = smallest_divisor.max(dense + 1);
    if sparse_lower < low {
        set.add_scattered(Scattered::Divisors { low, high }, sparse_lower, low - 1, false);
    }
    set
}

/// The interval of magnitudes of the values with the given sign.
fn magnitudes(width: u32, negative: bool) -> (u64, u64) {
    let sign = 1 << (width - 1);
    if negative {
        (1, sign)
    } else {
        (0, sign - 1)
    }
}

/// Maps a set of magnitudes to the values of the given sign with those magnitudes.
fn signed_values(width: u32, magnitude_set: SolutionSet, negative: bool) -> SolutionSet {
    let mask = width_mask(width);
    let (smallest, largest) = magnitudes(width, negative);
    let negate = |magnitude: u64| (mask - magnitude).wrapping_add(1) & mask;
    let mut set = SolutionSet::empty(width);

    for piece in magnitude_set.pieces() {
        let (lower, upper, progression) = match *piece {
            Piece::Range { lower, upper } => (lower, upper, None),
            Piece::Progression {
                lower,
                upper,
                modulus,
                residue,
            } => (lower, upper, Some((modulus, residue))),
            Piece::Scattered {
                family,
                lower,
                upper,
                negated: false,
            } => {
                set.add_scattered(family, lower.max(smallest), upper.min(largest), negative);
                continue;
            }
            Piece::Pattern { .. } | Piece::Except(_) | Piece::Scattered { .. } => {
                unreachable!("magnitude sets consist of non-negated ranges and progressions")
            }
        };
        let (lower, upper) = (lower.max(smallest), upper.min(largest));
        if lower > upper {
            continue;
        }

        match (progression, negative) {
            (None, false) => set.add_range(lower, upper),
            (None, true) => set.add_range(negate(upper), negate(lower)),
            (Some((modulus, residue)), false) => {
                set.add_progression(lower, upper, modulus, residue)
            }
            (Some((modulus, residue)), true) => {
                // -m = r (mod d) iff m = -r (mod d), evaluated modulo 2^width
                let power = 1_u128 << width;
                let modulus_wide = u128::from(modulus);
                let residue = ((power % modulus_wide + modulus_wide - u128::from(residue))
                    % modulus_wide) as u64;
                set.add_progression(negate(upper), negate(lower), modulus, residue)
            }
        }
    }
    set
}

pub(super) fn udiv_inverse(
    target: BitVector,
    sibling: BitVector,
    position: usize,
) -> SolutionSet {
    let (width, t, s) = (target.width(), target.value(), sibling.value());
    if position == 0 {
        dividends_for_quotient(width, t, s, s)
    } else {
        divisors_for_quotient(width, t, s, s)
    }
}

pub(super) fn udiv_consistent(target: BitVector, position: usize) -> SolutionSet {
    let (width, t, mask) = (target.width(), target.value(), target.mask());
    if position == 0 {
        dividends_for_quotient(width, t, 0, mask)
    } else {
        divisors_for_quotient(width, t, 0, mask)
    }
}

pub(super) fn urem_inverse(
    target: BitVector,
    sibling: BitVector,
    position: usize,
) -> SolutionSet {
    let (width, t, s) = (target.width(), target.value(), sibling.value());
    if position == 0 {
        dividends_for_remainder(width, t, s, s)
    } else {
        divisors_for_remainder(width, t, s, s)
    }
}

pub(super) fn urem_consistent(target: BitVector, position: usize) -> SolutionSet {
    let (width, t, mask) = (target.width(), target.value(), target.mask());
    if position == 0 {
        dividends_for_remainder(width, t, 0, mask)
    } else {
        divisors_for_remainder(width, t, 0, mask)
    }
}

/// The unsigned quotient of the magnitudes for which the signed quotient is `target`.
fn magnitude_quotient(target: BitVector, different_signs: bool) -> u64 {
    if different_signs {
        target.wrapping_neg().value()
    } else {
        target.value()
    }
}

/// Solves the signed division for the sibling magnitudes in the given interval; the sibling has
/// sign `sibling_negative`.
fn sdiv_solutions(
    target: BitVector,
    position: usize,
    sibling_negative: bool,
    (lower, upper): (u64, u64),
) -> SolutionSet {
    let width = target.width();
    let mut set = SolutionSet::empty(width);
    for negative in [false, true] {
        let quotient = magnitude_quotient(target, negative != sibling_negative);
        let magnitude_set = if position == 0 {
            dividends_for_quotient(width, quotient, lower, upper)
        } else {
            divisors_for_quotient(width, quotient, lower, upper)
        };
        set.extend(signed_values(width, magnitude_set, negative));
    }
    set
}

pub(super) fn sdiv_inverse(
    target: BitVector,
    sibling: BitVector,
    position: usize,
) -> SolutionSet {
    let magnitude = sibling.magnitude().value();
    sdiv_solutions(
        target,
        position,
        sibling.is_negative(),
        (magnitude, magnitude),
    )
}

pub(super) fn sdiv_consistent(target: BitVector, position: usize) -> SolutionSet {
    let width = target.width();
    let mut set = sdiv_solutions(target, position, false, magnitudes(width, false));
    set.extend(sdiv_solutions(
        target,
        position,
        true,
        magnitudes(width, true),
    ));
    set
}

/// Solves the signed remainder for the sibling magnitudes in the given interval; the sign of the
/// remainder is the sign of the dividend.
fn srem_solutions(
    target: BitVector,
    position: usize,
    sibling_negative: bool,
    (lower, upper): (u64, u64),
) -> SolutionSet {
    let width = target.width();
    let mut set = SolutionSet::empty(width);
    for negative in [false, true] {
        let set_for_sign = if position == 0 {
            let remainder = magnitude_quotient(target, negative);
            dividends_for_remainder(width, remainder, lower, upper)
        } else {
            let remainder = magnitude_quotient(target, sibling_negative);
            divisors_for_remainder(width, remainder, lower, upper)
        };
        set.extend(signed_values(width, set_for_sign, negative));
    }
    set
}

pub(super) fn srem_inverse(
    target: BitVector,
    sibling: BitVector,
    position: usize,
) -> SolutionSet {
    let magnitude = sibling.magnitude().value();
    srem_solutions(
        target,
        position,
        sibling.is_negative(),
        (magnitude, magnitude),
    )
}

pub(super) fn srem_consistent(target: BitVector, position: usize) -> SolutionSet {
    let width = target.width();
    let mut set = srem_solutions(target, position, false, magnitudes(width, false));
    set.extend(srem_solutions(
        target,
        position,
        true,
        magnitudes(width, true),
    ));
    set
}

#[cfg(test)]
mod tests {
    use super::dividends_for_quotient;
    use super::dividends_for_remainder;
    use super::divisors_for_remainder;
    use crate::basic_types::BitVector;
    use crate::domains::BitDomain;

    fn contains(set: &super::SolutionSet, value: u64) -> bool {
        set.meets(&BitDomain::fixed_to(BitVector::new(value, set.width())))
    }

    #[test]
    fn remainder_sets_at_full_width() {
        let set = dividends_for_remainder(64, 3, 10, 10);
        assert!(contains(&set, 3));
        assert!(contains(&set, u64::MAX - 2));
        assert!(!contains(&set, 4));

        let set = divisors_for_remainder(64, 1, 1_000_001, 1_000_001);
        for divisor in [2, 4, 5, 8, 1_000_000] {
            assert!(contains(&set, divisor));
        }
        assert!(!contains(&set, 3));
        assert!(!contains(&set, 1));
    }

    #[test]
    fn quotient_sets_with_many_divisors() {
        let quotient = 1 << 40;
        let set = dividends_for_quotient(64, quotient, 0, u64::MAX);
        assert!(contains(&set, quotient));
        assert!(contains(&set, 5000 << 40));
        assert!(contains(&set, (5000 << 40) + 4999));
        assert!(!contains(&set, (5000 << 40) + 5000));
        assert!(contains(&set, ((1 << 24) - 1) << 40));
        assert!(!contains(&set, quotient - 1));
        assert!(!contains(&set, u64::MAX));
    }

    #[test]
    fn divisors_with_large_cofactors() {
        let dividend = 131_071 * 524_287;
        let set = divisors_for_remainder(64, 0, dividend, dividend);
        for divisor in [1, 131_071, 524_287, dividend] {
            assert!(contains(&set, divisor));
        }
        assert!(!contains(&set, 131_070));
        assert!(!contains(&set, 3));

        let set = divisors_for_remainder(64, 131_070, dividend + 131_070, dividend + 131_070);
        assert!(contains(&set, 131_071));
        assert!(contains(&set, 524_287));
        assert!(!contains(&set, 1));
    }

    #[test]
    fn remainder_sets_with_many_separate_intervals() {
        let set = dividends_for_remainder(64, 7, 1_000_000, 1_000_001);
        assert!(contains(&set, 7));
        assert!(!contains(&set, 8));
        assert!(contains(&set, 7 + 5000 * 1_000_000));
        assert!(contains(&set, 7 + 5000 * 1_000_001));
        assert!(!contains(&set, 8 + 5000 * 1_000_001));
        assert!(!contains(&set, 6 + 5000 * 1_000_000));
    }

    #[test]
    fn sets_agree_with_enumeration_at_width_eight() {
        let udiv = |x: u64, d: u64| if d == 0 { 255 } else { x / d };
        let urem = |x: u64, d: u64| if d == 0 { x } else { x % d };
        for (lower, upper) in [(0, 255), (3, 200), (17, 17), (100, 101)] {
            // Indexed by the target and then by the value of the operand.
            let mut dividends_by_quotient = vec![vec![false; 256]; 256];
            let mut dividends_by_remainder = vec![vec![false; 256]; 256];
            let mut divisors_by_remainder = vec![vec![false; 256]; 256];
            for sibling in lower..=upper {
                for x in 0..256 {
                    dividends_by_quotient[udiv(x, sibling) as usize][x as usize] = true;
                    dividends_by_remainder[urem(x, sibling) as usize][x as usize] = true;
                    divisors_by_remainder[urem(sibling, x) as usize][x as usize] = true;
                }
            }

            for target in 0..256 {
                let sets = [
                    (dividends_for_quotient(8, target, lower, upper), &dividends_by_quotient),
                    (dividends_for_remainder(8, target, lower, upper), &dividends_by_remainder),
                    (divisors_for_remainder(8, target, lower, upper), &divisors_by_remainder),
                ];
                for (index, (set, expected)) in sets.iter().enumerate() {
                    for x in 0..256 {
                        assert_eq!(
                            contains(set, x),
                            expected[target as usize][x as usize],
                            "set {index} for {target} with [{lower}, {upper}] at {x}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn closed_form_dividends_agree_with_enumeration() {
        let mask = (1 << 14) - 1;
        for (lower, upper) in [(1, 150), (5, 160)] {
            for quotient in [66, 100, 120, 150] {
                let set = dividends_for_quotient(14, quotient, lower, upper);
                for dividend in 0..=mask {
                    let expected = (lower..=upper).any(|divisor| dividend / divisor == quotient);
                    assert_eq!(
                        contains(&set, dividend),
                        expected,
                        "{dividend} / [{lower}, {upper}] = {quotient}"
                    );
                }
            }
        }
    }
}
