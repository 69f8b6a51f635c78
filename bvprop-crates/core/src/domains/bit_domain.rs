use std::fmt::Display;
use std::fmt::Formatter;

use crate::basic_types::width_mask;
use crate::basic_types::BitVector;
use crate::basic_types::Random;
use crate::bvprop_assert_moderate;

/// A ternary bit-vector domain: every bit is either fixed to `0`, fixed to `1`, or free.
///
/// The domain is stored as a mask of the fixed bits together with the values of those bits. A
/// value is consistent with the domain if it agrees with every fixed bit. Besides membership the
/// domain answers the closed-form range queries needed by the propagators, e.g.
/// [`BitDomain::min_at_least`] returns the smallest consistent value which is at least a given
/// bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BitDomain {
    width: u32,
    /// The bits which are fixed
    fixed: u64,
    /// The values of the fixed bits; the free bits are always 0
    value: u64,
}

/// The bits strictly above position `bit`.
fn bits_above(bit: u32) -> u64 {
    if bit >= 63 {
        0
    } else {
        u64::MAX << (bit + 1)
    }
}

/// The bits strictly below position `bit`.
fn bits_below(bit: u32) -> u64 {
    (1_u64 << bit) - 1
}

impl BitDomain {
    /// The domain in which every bit is free.
    pub fn free(width: u32) -> BitDomain {
        BitDomain::new(width, 0, 0)
    }

    /// The domain which only contains `value`.
    pub fn fixed_to(value: BitVector) -> BitDomain {
        BitDomain::new(value.width(), u64::MAX, value.value())
    }

    /// Creates a domain of the given width where the bits in `fixed` take the corresponding bits
    /// of `value`.
    pub fn new(width: u32, fixed: u64, value: u64) -> BitDomain {
        let fixed = fixed & width_mask(width);
        BitDomain {
            width,
            fixed,
            value: value & fixed,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn fixed_bits(&self) -> u64 {
        self.fixed
    }

    /// The values of the fixed bits, with all free bits set to zero.
    pub fn fixed_values(&self) -> u64 {
        self.value
    }

    pub(crate) fn mask(&self) -> u64 {
        width_mask(self.width)
    }

    pub(crate) fn free_bits(&self) -> u64 {
        !self.fixed & self.mask()
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed == self.mask()
    }

    /// The value of the given bit if it is fixed.
    pub fn bit(&self, index: u32) -> Option<bool> {
        if (self.fixed >> index) & 1 == 1 {
            Some((self.value >> index) & 1 == 1)
        } else {
            None
        }
    }

    /// Whether `value` agrees with every fixed bit.
    pub fn contains(&self, value: u64) -> bool {
        value & self.fixed == self.value && value & !self.mask() == 0
    }

    pub fn matches(&self, value: BitVector) -> bool {
        bvprop_assert_moderate!(value.width() == self.width);
        self.contains(value.value())
    }

    /// The smallest consistent value.
    pub fn lower_bound(&self) -> u64 {
        self.value
    }

    /// The largest consistent value.
    pub fn upper_bound(&self) -> u64 {
        self.value | self.free_bits()
    }

    /// The domain obtained by negating every bit.
    pub fn complement(&self) -> BitDomain {
        BitDomain::new(self.width, self.fixed, !self.value)
    }

    /// Returns the smallest value which is consistent with the domain and at least `lower`.
    pub fn min_at_least(&self, lower: u64) -> Option<u64> {
        if lower > self.mask() {
            return None;
        }

        let candidate = (lower & self.free_bits()) | self.value;
        if candidate == lower {
            return Some(lower);
        }

        // The highest position where the fixed bits disagree with `lower`.
        let position = 63 - (candidate ^ lower).leading_zeros();
        if (candidate >> position) & 1 == 1 {
            // The fixed 1 makes the value larger than `lower`; the lower bits can be minimal.
            return Some(
                (candidate & bits_above(position))
                    | (1 << position)
                    | (self.value & bits_below(position)),
            );
        }

        // A fixed 0 makes the value smaller than `lower`; raise the lowest free 0 above it.
        let raisable = self.free_bits() & !lower & bits_above(position);
        if raisable == 0 {
            return None;
        }
        let raised = raisable.trailing_zeros();
        Some((lower & bits_above(raised)) | (1 << raised) | (self.value & bits_below(raised)))
    }

    /// Returns the largest value which is consistent with the domain and at most `upper`.
    pub fn max_at_most(&self, upper: u64) -> Option<u64> {
        let mask = self.mask();
        let upper = upper.min(mask);
        self.complement()
            .min_at_least(mask ^ upper)
            .map(|complemented| mask ^ complemented)
    }

    /// A uniformly random consistent value.
    pub fn random_value(&self, random: &mut dyn Random) -> u64 {
        self.value | (random.generate_u64() & self.free_bits())
    }

    /// A random consistent value in `[lower, upper]`, if one exists.
    pub fn random_in_range(
        &self,
        lower: u64,
        upper: u64,
        random: &mut dyn Random,
    ) -> Option<u64> {
        let min = self.min_at_least(lower)?;
        let max = self.max_at_most(upper)?;
        if min > max {
            return None;
        }
        if min == max {
            return Some(min);
        }

        let pivot = random.generate_u64_in_range(min, max);
        // `max` is consistent and at least `pivot`, so this always succeeds.
        self.min_at_least(pivot)
    }
}

/// Writes the bits from the most significant to the least significant one, with `x` for free
/// bits.
impl Display for BitDomain {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for index in (0..self.width).rev() {
            match self.bit(index) {
                Some(true) => write!(f, "1")?,
                Some(false) => write!(f, "0")?,
                None => write!(f, "x")?,
            }
        }
        Ok(())
    }
}
