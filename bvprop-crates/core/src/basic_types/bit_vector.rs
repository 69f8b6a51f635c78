use std::fmt::Display;
use std::fmt::Formatter;
use std::ops::BitAnd;
use std::ops::BitOr;
use std::ops::BitXor;
use std::ops::Not;

use crate::bvprop_assert_moderate;
use crate::bvprop_assert_simple;

/// The largest bit-width which is supported by a [`BitVector`].
pub const MAX_WIDTH: u32 = 64;

/// Returns the mask with the lowest `width` bits set.
pub(crate) const fn width_mask(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1_u64 << width) - 1
    }
}

/// A fixed-width two's-complement bit-vector value.
///
/// All arithmetic is performed modulo `2^width`; the bits above the width are always zero. The
/// division operators follow the SMT-LIB semantics, i.e. `x udiv 0 = ~0`, `x urem 0 = x`, and
/// the signed variants are defined on the magnitudes of their operands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BitVector {
    value: u64,
    width: u32,
}

impl BitVector {
    /// Creates a bit-vector of the given `width` holding the lowest `width` bits of `value`.
    ///
    /// The width should be in the range `1..=64`.
    pub fn new(value: u64, width: u32) -> BitVector {
        bvprop_assert_simple!(
            (1..=MAX_WIDTH).contains(&width),
            "Bit-width {width} is not supported"
        );
        BitVector {
            value: value & width_mask(width),
            width,
        }
    }

    pub fn zero(width: u32) -> BitVector {
        BitVector::new(0, width)
    }

    pub fn one(width: u32) -> BitVector {
        BitVector::new(1, width)
    }

    pub fn ones(width: u32) -> BitVector {
        BitVector::new(u64::MAX, width)
    }

    /// The smallest signed value of the given `width`, i.e. only the most significant bit set.
    pub fn min_signed(width: u32) -> BitVector {
        BitVector::new(1 << (width - 1), width)
    }

    pub fn from_bool(value: bool) -> BitVector {
        BitVector::new(value as u64, 1)
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub(crate) fn mask(&self) -> u64 {
        width_mask(self.width)
    }

    /// Whether the value is a non-zero bit-vector; mainly used for bit-vectors of width 1.
    pub fn is_true(&self) -> bool {
        self.value != 0
    }

    pub fn is_zero(&self) -> bool {
        self.value == 0
    }

    pub fn bit(&self, index: u32) -> bool {
        bvprop_assert_moderate!(index < self.width);
        (self.value >> index) & 1 == 1
    }

    /// Whether the sign bit is set.
    pub fn is_negative(&self) -> bool {
        self.bit(self.width - 1)
    }

    /// Interprets the bit-vector as a two's-complement signed integer.
    pub fn signed_value(&self) -> i64 {
        let shift = 64 - self.width;
        ((self.value << shift) as i64) >> shift
    }

    pub fn hamming_distance(&self, other: BitVector) -> u32 {
        self.assert_same_width(other);
        (self.value ^ other.value).count_ones()
    }

    pub fn count_trailing_zeros(&self) -> u32 {
        self.value.trailing_zeros().min(self.width)
    }

    pub fn count_leading_zeros(&self) -> u32 {
        self.value.leading_zeros() - (64 - self.width)
    }

    fn assert_same_width(&self, other: BitVector) {
        bvprop_assert_moderate!(
            self.width == other.width,
            "Operands have different widths {} and {}",
            self.width,
            other.width
        );
    }

    pub fn wrapping_neg(self) -> BitVector {
        BitVector::new(self.value.wrapping_neg(), self.width)
    }

    pub fn wrapping_add(self, other: BitVector) -> BitVector {
        self.assert_same_width(other);
        BitVector::new(self.value.wrapping_add(other.value), self.width)
    }

    pub fn wrapping_sub(self, other: BitVector) -> BitVector {
        self.assert_same_width(other);
        BitVector::new(self.value.wrapping_sub(other.value), self.width)
    }

    pub fn wrapping_mul(self, other: BitVector) -> BitVector {
        self.assert_same_width(other);
        BitVector::new(self.value.wrapping_mul(other.value), self.width)
    }

    pub fn udiv(self, other: BitVector) -> BitVector {
        self.assert_same_width(other);
        if other.is_zero() {
            BitVector::ones(self.width)
        } else {
            BitVector::new(self.value / other.value, self.width)
        }
    }

    pub fn urem(self, other: BitVector) -> BitVector {
        self.assert_same_width(other);
        if other.is_zero() {
            self
        } else {
            BitVector::new(self.value % other.value, self.width)
        }
    }

    /// The absolute value interpreted as an unsigned magnitude; the smallest signed value maps
    /// onto itself.
    pub fn magnitude(self) -> BitVector {
        if self.is_negative() {
            self.wrapping_neg()
        } else {
            self
        }
    }

    pub fn sdiv(self, other: BitVector) -> BitVector {
        let quotient = self.magnitude().udiv(other.magnitude());
        if self.is_negative() != other.is_negative() {
            quotient.wrapping_neg()
        } else {
            quotient
        }
    }

    pub fn srem(self, other: BitVector) -> BitVector {
        let remainder = self.magnitude().urem(other.magnitude());
        if self.is_negative() {
            remainder.wrapping_neg()
        } else {
            remainder
        }
    }

    pub fn shift_left(self, amount: BitVector) -> BitVector {
        self.assert_same_width(amount);
        if amount.value >= self.width as u64 {
            BitVector::zero(self.width)
        } else {
            BitVector::new(self.value << amount.value, self.width)
        }
    }

    pub fn shift_right_logical(self, amount: BitVector) -> BitVector {
        self.assert_same_width(amount);
        if amount.value >= self.width as u64 {
            BitVector::zero(self.width)
        } else {
            BitVector::new(self.value >> amount.value, self.width)
        }
    }

    pub fn shift_right_arithmetic(self, amount: BitVector) -> BitVector {
        self.assert_same_width(amount);
        let shift = amount.value.min(self.width as u64 - 1) as u32;
        BitVector::new((self.signed_value() >> shift) as u64, self.width)
    }

    pub fn ult(self, other: BitVector) -> BitVector {
        self.assert_same_width(other);
        BitVector::from_bool(self.value < other.value)
    }

    pub fn slt(self, other: BitVector) -> BitVector {
        self.assert_same_width(other);
        BitVector::from_bool(self.signed_value() < other.signed_value())
    }

    pub fn equals(self, other: BitVector) -> BitVector {
        self.assert_same_width(other);
        BitVector::from_bool(self.value == other.value)
    }

    /// Places `self` in the most significant bits and `low` in the least significant bits.
    pub fn concat(self, low: BitVector) -> BitVector {
        bvprop_assert_simple!(self.width + low.width <= MAX_WIDTH);
        BitVector::new(
            (self.value << low.width) | low.value,
            self.width + low.width,
        )
    }

    /// Extracts the bits `[upper:lower]` (both inclusive).
    pub fn extract(self, upper: u32, lower: u32) -> BitVector {
        bvprop_assert_moderate!(lower <= upper && upper < self.width);
        BitVector::new(self.value >> lower, upper - lower + 1)
    }

    pub fn sign_extend(self, by: u32) -> BitVector {
        bvprop_assert_simple!(self.width + by <= MAX_WIDTH);
        BitVector::new(self.signed_value() as u64, self.width + by)
    }
}

impl Not for BitVector {
    type Output = BitVector;

    fn not(self) -> BitVector {
        BitVector::new(!self.value, self.width)
    }
}

impl BitAnd for BitVector {
    type Output = BitVector;

    fn bitand(self, other: BitVector) -> BitVector {
        self.assert_same_width(other);
        BitVector::new(self.value & other.value, self.width)
    }
}

impl BitOr for BitVector {
    type Output = BitVector;

    fn bitor(self, other: BitVector) -> BitVector {
        self.assert_same_width(other);
        BitVector::new(self.value | other.value, self.width)
    }
}

impl BitXor for BitVector {
    type Output = BitVector;

    fn bitxor(self, other: BitVector) -> BitVector {
        self.assert_same_width(other);
        BitVector::new(self.value ^ other.value, self.width)
    }
}

/// Writes the bits from the most significant to the least significant one.
impl Display for BitVector {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:0width$b}", self.value, width = self.width as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::BitVector;

    fn bv(value: u64, width: u32) -> BitVector {
        BitVector::new(value, width)
    }

    #[test]
    fn values_are_truncated_to_width() {
        assert_eq!(bv(0b1_0110, 4).value(), 0b0110);
        assert_eq!(BitVector::ones(64).value(), u64::MAX);
        assert_eq!(BitVector::ones(3).value(), 0b111);
    }

    #[test]
    fn signed_interpretation() {
        assert_eq!(bv(0b1111, 4).signed_value(), -1);
        assert_eq!(bv(0b1000, 4).signed_value(), -8);
        assert_eq!(bv(0b0111, 4).signed_value(), 7);
        assert_eq!(BitVector::ones(64).signed_value(), -1);
    }

    #[test]
    fn division_by_zero_follows_smt_lib() {
        assert_eq!(bv(5, 4).udiv(bv(0, 4)), bv(0b1111, 4));
        assert_eq!(bv(5, 4).urem(bv(0, 4)), bv(5, 4));
        assert_eq!(bv(5, 4).sdiv(bv(0, 4)), bv(0b1111, 4));
        assert_eq!(bv(0b1011, 4).sdiv(bv(0, 4)), bv(1, 4));
        assert_eq!(bv(0b1011, 4).srem(bv(0, 4)), bv(0b1011, 4));
    }

    #[test]
    fn signed_division_agrees_with_truncating_division() {
        let width = 4;
        for a in 0..16 {
            for b in 1..16 {
                let a = bv(a, width);
                let b = bv(b, width);
                let (sa, sb) = (a.signed_value(), b.signed_value());
                if sa == -8 && sb == -1 {
                    // Overflows in two's complement.
                    continue;
                }
                assert_eq!(a.sdiv(b).signed_value(), sa / sb, "{a} sdiv {b}");
                assert_eq!(a.srem(b).signed_value(), sa % sb, "{a} srem {b}");
            }
        }
    }

    #[test]
    fn shifts_saturate() {
        assert_eq!(bv(0b0011, 4).shift_left(bv(2, 4)), bv(0b1100, 4));
        assert_eq!(bv(0b0011, 4).shift_left(bv(4, 4)), bv(0, 4));
        assert_eq!(bv(0b1100, 4).shift_right_logical(bv(9, 4)), bv(0, 4));
        assert_eq!(bv(0b1000, 4).shift_right_arithmetic(bv(2, 4)), bv(0b1110, 4));
        assert_eq!(bv(0b1000, 4).shift_right_arithmetic(bv(15, 4)), bv(0b1111, 4));
        assert_eq!(bv(0b0100, 4).shift_right_arithmetic(bv(15, 4)), bv(0, 4));
    }

    #[test]
    fn structural_operators() {
        assert_eq!(bv(0b10, 2).concat(bv(0b011, 3)), bv(0b10011, 5));
        assert_eq!(bv(0b10011, 5).extract(3, 1), bv(0b001, 3));
        assert_eq!(bv(0b101, 3).sign_extend(2), bv(0b11101, 5));
        assert_eq!(bv(0b011, 3).sign_extend(2), bv(0b00011, 5));
    }

    #[test]
    fn comparisons() {
        assert!(bv(0b0111, 4).ult(bv(0b1000, 4)).is_true());
        assert!(!bv(0b0111, 4).slt(bv(0b1000, 4)).is_true());
        assert!(bv(3, 4).equals(bv(3, 4)).is_true());
    }

    #[test]
    fn display_is_msb_first() {
        assert_eq!(bv(0b0101, 4).to_string(), "0101");
        assert_eq!(bv(1, 1).to_string(), "1");
    }
}
