use super::BitDomain;
use crate::basic_types::width_mask;
use crate::basic_types::Random;
use crate::bvprop_assert_moderate;

/// A set of values of a fixed width with a closed-form description.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Piece {
    /// The values which agree with `value` on the bits of `mask`.
    Pattern { mask: u64, value: u64 },
    /// The values in `[lower, upper]`.
    Range { lower: u64, upper: u64 },
    /// The values in `[lower, upper]` which are congruent to `residue` modulo `modulus`.
    Progression {
        lower: u64,
        upper: u64,
        modulus: u64,
        residue: u64,
    },
    /// Every value except the given one.
    Except(u64),
    /// The members of `family` in `[lower, upper]`; if `negated` is set, the piece contains the
    /// two's complement negations of these members instead.
    Scattered {
        family: Scattered,
        lower: u64,
        upper: u64,
        negated: bool,
    },
}

/// A set of values spread over too many intervals to list them, described by a membership test
/// together with the nearest members above and below a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Scattered {
    /// The values `x` with `x / d = quotient` for some `d` in `[divisor_lower, divisor_upper]`;
    /// requires `quotient >= 1` and `divisor_lower >= 1`.
    Dividends {
        quotient: u64,
        divisor_lower: u64,
        divisor_upper: u64,
    },
    /// The values `offset + k * d` for some `k >= 1` and `d` in `[divisor_lower,
    /// divisor_upper]`; requires `divisor_lower >= 1`.
    Multiples {
        offset: u64,
        divisor_lower: u64,
        divisor_upper: u64,
    },
    /// The values which divide some value in `[low, high]`; requires `low >= 1`.
    Divisors { low: u64, high: u64 },
}

impl Scattered {
    pub(crate) fn contains(self, value: u64) -> bool {
        match self {
            Scattered::Dividends {
                quotient,
                divisor_lower,
                divisor_upper,
            } => {
                // x / d = q iff x / (q + 1) < d <= x / q
                let (x, q) = (u128::from(value), u128::from(quotient));
                let smallest = (x / (q + 1) + 1).max(u128::from(divisor_lower));
                let largest = (x / q).min(u128::from(divisor_upper));
                smallest <= largest
            }
            Scattered::Multiples {
                offset,
                divisor_lower,
                divisor_upper,
            } => {
                let Some(excess) = value.checked_sub(offset) else {
                    return false;
                };
                // The only candidate k is the smallest one with k * divisor_upper >= excess.
                excess >= divisor_lower
                    && u128::from(excess.div_ceil(divisor_upper)) * u128::from(divisor_lower)
                        <= u128::from(excess)
            }
            Scattered::Divisors { low, high } => {
                value >= 1 && value <= high && (high / value) * value >= low
            }
        }
    }

    /// The smallest member which is at least `value`.
    pub(crate) fn next_at_least(self, value: u64) -> Option<u64> {
        if self.contains(value) {
            return Some(value);
        }
        match self {
            Scattered::Dividends {
                quotient,
                divisor_lower,
                divisor_upper,
            } => {
                // The first divisor whose interval [q * d, q * d + d - 1] ends at or after value.
                let (q, x) = (u128::from(quotient), u128::from(value));
                let divisor = ((x + 1).div_ceil(q + 1)).max(u128::from(divisor_lower));
                if divisor > u128::from(divisor_upper) {
                    return None;
                }
                u64::try_from(q * divisor).ok()
            }
            Scattered::Multiples {
                offset,
                divisor_lower,
                divisor_upper,
            } => {
                let first = u128::from(offset) + u128::from(divisor_lower);
                let next = match value.checked_sub(offset) {
                    Some(excess) if u128::from(value) >= first => {
                        // The first k whose interval [k * lower, k * upper] ends at or after value.
                        let k = u128::from(excess.div_ceil(divisor_upper));
                        u128::from(offset) + k * u128::from(divisor_lower)
                    }
                    _ => first,
                };
                u64::try_from(next).ok()
            }
            Scattered::Divisors { low, high } => {
                let mut candidate = value.max(1);
                loop {
                    if candidate > high {
                        return None;
                    }
                    // The values with the same largest multiple below high form a block; within
                    // the block the members are the values from ceil(low / k) on.
                    let k = high / candidate;
                    if k * candidate >= low {
                        return Some(candidate);
                    }
                    let first_member = low.div_ceil(k);
                    if first_member <= high / k {
                        return Some(first_member);
                    }
                    candidate = high / k + 1;
                }
            }
        }
    }

    /// The largest member which is at most `value`.
    pub(crate) fn previous_at_most(self, value: u64) -> Option<u64> {
        if self.contains(value) {
            return Some(value);
        }
        match self {
            Scattered::Dividends {
                quotient,
                divisor_lower,
                divisor_upper,
            } => {
                // The last divisor whose interval starts at or before value.
                let divisor = (value / quotient).min(divisor_upper);
                if divisor < divisor_lower {
                    return None;
                }
                let end = (u128::from(quotient) + 1) * u128::from(divisor) - 1;
                Some(end.min(u128::from(value)) as u64)
            }
            Scattered::Multiples {
                offset,
                divisor_lower,
                divisor_upper,
            } => {
                let excess = value.checked_sub(offset)?;
                if excess < divisor_lower {
                    return None;
                }
                let k = u128::from(excess / divisor_lower);
                let end = (k * u128::from(divisor_upper)).min(u128::from(excess));
                Some(offset + end as u64)
            }
            Scattered::Divisors { low, high } => {
                let mut candidate = value.min(high);
                while candidate > 0 {
                    let k = high / candidate;
                    if k * candidate >= low {
                        return Some(candidate);
                    }
                    candidate = high / (k + 1);
                }
                None
            }
        }
    }
}

/// The exact set of operand values which solve a single propagation problem, described as a union
/// of [`Piece`]s.
///
/// Deciding whether an operand can take a value in its domain then amounts to checking whether the
/// set meets the domain; selecting such a value amounts to picking a random piece which meets the
/// domain and a random consistent member of that piece.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct SolutionSet {
    width: u32,
    pieces: Vec<Piece>,
}

impl SolutionSet {
    pub(crate) fn empty(width: u32) -> SolutionSet {
        SolutionSet {
            width,
            pieces: vec![],
        }
    }

    pub(crate) fn all(width: u32) -> SolutionSet {
        SolutionSet::range(width, 0, width_mask(width))
    }

    pub(crate) fn point(width: u32, value: u64) -> SolutionSet {
        SolutionSet::range(width, value, value)
    }

    pub(crate) fn range(width: u32, lower: u64, upper: u64) -> SolutionSet {
        let mut set = SolutionSet::empty(width);
        set.add_range(lower, upper);
        set
    }

    pub(crate) fn pattern(width: u32, mask: u64, value: u64) -> SolutionSet {
        let mut set = SolutionSet::empty(width);
        set.add_pattern(mask, value);
        set
    }

    pub(crate) fn except(width: u32, value: u64) -> SolutionSet {
        SolutionSet {
            width,
            pieces: vec![Piece::Except(value & width_mask(width))],
        }
    }

    pub(crate) fn width(&self) -> u32 {
        self.width
    }

    pub(crate) fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Adds `[lower, upper]`, clamped to the values of the width; an empty range is ignored.
    pub(crate) fn add_range(&mut self, lower: u64, upper: u64) {
        let upper = upper.min(width_mask(self.width));
        if lower <= upper {
            self.pieces.push(Piece::Range { lower, upper });
        }
    }

    pub(crate) fn add_point(&mut self, value: u64) {
        self.add_range(value, value);
    }

    pub(crate) fn add_pattern(&mut self, mask: u64, value: u64) {
        let mask = mask & width_mask(self.width);
        self.pieces.push(Piece::Pattern {
            mask,
            value: value & mask,
        });
    }

    pub(crate) fn add_progression(&mut self, lower: u64, upper: u64, modulus: u64, residue: u64) {
        bvprop_assert_moderate!(modulus > 0 && residue < modulus);
        let upper = upper.min(width_mask(self.width));
        if lower > upper {
            return;
        }
        if modulus == 1 {
            self.add_range(lower, upper);
        } else {
            self.pieces.push(Piece::Progression {
                lower,
                upper,
                modulus,
                residue,
            });
        }
    }

    /// Adds the members of `family` in `[lower, upper]`, or their negations if `negated` is set.
    pub(crate) fn add_scattered(
        &mut self,
        family: Scattered,
        lower: u64,
        upper: u64,
        negated: bool,
    ) {
        let upper = upper.min(width_mask(self.width));
        if lower <= upper {
            self.pieces.push(Piece::Scattered {
                family,
                lower,
                upper,
                negated,
            });
        }
    }

    pub(crate) fn extend(&mut self, other: SolutionSet) {
        bvprop_assert_moderate!(self.width == other.width);
        self.pieces.extend(other.pieces);
    }

    /// Whether some member of the set is consistent with the domain.
    pub(crate) fn meets(&self, domain: &BitDomain) -> bool {
        bvprop_assert_moderate!(self.width == domain.width());
        self.pieces
            .iter()
            .any(|piece| piece_meets(piece, domain))
    }

    /// Selects a random member of the set which is consistent with the domain; first a piece
    /// meeting the domain is selected uniformly at random, then a member of that piece.
    pub(crate) fn pick(&self, domain: &BitDomain, random: &mut dyn Random) -> Option<u64> {
        bvprop_assert_moderate!(self.width == domain.width());
        let meeting = self
            .pieces
            .iter()
            .filter(|piece| piece_meets(piece, domain))
            .collect::<Vec<_>>();
        if meeting.is_empty() {
            return None;
        }

        let piece = meeting[random.generate_usize_in_range(0..meeting.len())];
        let value = sample_piece(piece, domain, random);
        bvprop_assert_moderate!(value.map_or(true, |value| domain.contains(value)));
        value
    }
}

fn piece_meets(piece: &Piece, domain: &BitDomain) -> bool {
    match *piece {
        Piece::Pattern { mask, value } => {
            mask & domain.fixed_bits() & (value ^ domain.fixed_values()) == 0
        }
        Piece::Range { lower, upper } => domain
            .min_at_least(lower)
            .is_some_and(|minimum| minimum <= upper),
        Piece::Progression {
            lower,
            upper,
            modulus,
            residue,
        } => first_in_progression(domain, lower, upper, modulus, residue).is_some(),
        Piece::Except(excluded) => !domain.is_fixed() || domain.fixed_values() != excluded,
        Piece::Scattered {
            family,
            lower,
            upper,
            negated,
        } => first_scattered(domain, family, lower, upper, negated).is_some(),
    }
}

fn sample_piece(piece: &Piece, domain: &BitDomain, random: &mut dyn Random) -> Option<u64> {
    match *piece {
        Piece::Pattern { mask, value } => {
            let fixed = domain.fixed_bits() | mask;
            let free = !fixed & domain.mask();
            Some(value | domain.fixed_values() | (random.generate_u64() & free))
        }
        Piece::Range { lower, upper } => domain.random_in_range(lower, upper, random),
        Piece::Progression {
            lower,
            upper,
            modulus,
            residue,
        } => {
            let start = random.generate_u64_in_range(lower, upper);
            first_in_progression(domain, start, upper, modulus, residue)
                .or_else(|| first_in_progression(domain, lower, upper, modulus, residue))
        }
        Piece::Except(excluded) => {
            let value = domain.random_value(random);
            if value != excluded {
                return Some(value);
            }
            let free = domain.free_bits();
            if free == 0 {
                return None;
            }
            let position = random.generate_usize_in_range(0..free.count_ones() as usize);
            Some(value ^ nth_set_bit(free, position))
        }
        Piece::Scattered {
            family,
            lower,
            upper,
            negated,
        } => {
            let pivot = random.generate_u64_in_range(lower, upper);
            let around_pivot = if negated {
                first_scattered(domain, family, lower, pivot, true)
            } else {
                first_scattered(domain, family, pivot, upper, false)
            };
            around_pivot.or_else(|| first_scattered(domain, family, lower, upper, negated))
        }
    }
}

/// Returns the bit of `bits` which is set and has exactly `n` set bits below it.
fn nth_set_bit(mut bits: u64, n: usize) -> u64 {
    for _ in 0..n {
        bits &= bits - 1;
    }
    bits & bits.wrapping_neg()
}

/// The smallest member of the domain in `[lower, upper]` which is congruent to `residue` modulo
/// `modulus`.
///
/// Alternates between jumping to the next consistent value and to the next member of the
/// progression until both coincide. The power of two dividing the modulus fixes the lowest bits of
/// every member, so these bits are fixed in the domain before the search.
fn first_in_progression(
    domain: &BitDomain,
    lower: u64,
    upper: u64,
    modulus: u64,
    residue: u64,
) -> Option<u64> {
    let aligned = ((1_u64 << modulus.trailing_zeros()) - 1) & domain.mask();
    if aligned & domain.fixed_bits() & (residue ^ domain.fixed_values()) != 0 {
        return None;
    }
    let domain = BitDomain::new(
        domain.width(),
        domain.fixed_bits() | aligned,
        domain.fixed_values() | (residue & aligned),
    );

    let mut candidate = next_in_progression(lower, modulus, residue)?;
    loop {
        if candidate > upper {
            return None;
        }
        let consistent = domain.min_at_least(candidate)?;
        if consistent > upper {
            return None;
        }
        if consistent % modulus == residue {
            return Some(consistent);
        }
        candidate = next_in_progression(consistent, modulus, residue)?;
    }
}

/// The smallest member of the domain in a [`Piece::Scattered`].
///
/// Like [`first_in_progression`], alternates between the next consistent value and the next member
/// of the family. Negation reverses the order of the (non-zero) magnitudes, so for negated pieces
/// the magnitudes are searched downward.
fn first_scattered(
    domain: &BitDomain,
    family: Scattered,
    lower: u64,
    upper: u64,
    negated: bool,
) -> Option<u64> {
    let mask = domain.mask();
    let upper = upper.min(mask);

    if !negated {
        let mut candidate = family.next_at_least(lower)?;
        loop {
            if candidate > upper {
                return None;
            }
            let consistent = domain.min_at_least(candidate)?;
            if consistent > upper {
                return None;
            }
            if family.contains(consistent) {
                return Some(consistent);
            }
            candidate = family.next_at_least(consistent)?;
        }
    }

    let negate = |value: u64| value.wrapping_neg() & mask;
    let lower = lower.max(1);
    let mut magnitude = family.previous_at_most(upper)?;
    loop {
        if magnitude < lower {
            return None;
        }
        let consistent = domain.min_at_least(negate(magnitude))?;
        let consistent_magnitude = negate(consistent);
        if consistent_magnitude < lower {
            return None;
        }
        if family.contains(consistent_magnitude) {
            return Some(consistent);
        }
        magnitude = family.previous_at_most(consistent_magnitude)?;
    }
}

/// The smallest value which is at least `value` and congruent to `residue` modulo `modulus`.
fn next_in_progression(value: u64, modulus: u64, residue: u64) -> Option<u64> {
    let offset = (residue as u128 + modulus as u128 - (value % modulus) as u128) % modulus as u128;
    u64::try_from(value as u128 + offset).ok()
}
