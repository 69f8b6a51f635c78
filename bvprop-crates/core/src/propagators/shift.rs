use crate::basic_types::width_mask;
use crate::basic_types::BitVector;
use crate::domains::SolutionSet;

/// The shift amounts `i < width` for which shifting `value` gives `target`, together with all
/// amounts of at least the width if those give `target` as well.
fn amounts(
    value: BitVector,
    target: BitVector,
    saturated: u64,
    shift: impl Fn(u64, u32) -> u64,
) -> SolutionSet {
    let width = target.width();
    let mut set = SolutionSet::empty(width);
    for amount in 0..width {
        if shift(value.value(), amount) & target.mask() == target.value() {
            set.add_point(u64::from(amount));
        }
    }
    if saturated == target.value() {
        set.add_range(u64::from(width), target.mask());
    }
    set
}

/// The value of the operand is the amount for position 1 and the shifted value for position 0.
fn amount_of(operand: BitVector) -> Option<u32> {
    u32::try_from(operand.value())
        .ok()
        .filter(|&amount| amount < operand.width())
}

pub(super) fn shl_inverse(target: BitVector, operands: &[BitVector], position: usize) -> SolutionSet {
    let width = target.width();
    let t = target.value();
    if position == 1 {
        return amounts(operands[0], target, 0, |value, amount| value << amount);
    }

    match amount_of(operands[1]) {
        None if t == 0 => SolutionSet::all(width),
        None => SolutionSet::empty(width),
        Some(amount) if t & width_mask(amount) != 0 => SolutionSet::empty(width),
        Some(amount) => SolutionSet::pattern(width, target.mask() >> amount, t >> amount),
    }
}

pub(super) fn shl_consistent(target: BitVector, position: usize) -> SolutionSet {
    let width = target.width();
    if target.is_zero() {
        return SolutionSet::all(width);
    }
    let zeros = target.count_trailing_zeros();
    if position == 1 {
        return SolutionSet::range(width, 0, u64::from(zeros));
    }

    let mut set = SolutionSet::empty(width);
    for amount in 0..=zeros {
        set.add_pattern(target.mask() >> amount, target.value() >> amount);
    }
    set
}

pub(super) fn lshr_inverse(
    target: BitVector,
    operands: &[BitVector],
    position: usize,
) -> SolutionSet {
    let width = target.width();
    let (t, mask) = (target.value(), target.mask());
    if position == 1 {
        return amounts(operands[0], target, 0, |value, amount| value >> amount);
    }

    match amount_of(operands[1]) {
        None if t == 0 => SolutionSet::all(width),
        None => SolutionSet::empty(width),
        Some(amount) if t & !(mask >> amount) != 0 => SolutionSet::empty(width),
        Some(amount) => SolutionSet::pattern(width, (mask << amount) & mask, t << amount),
    }
}

pub(super) fn lshr_consistent(target: BitVector, position: usize) -> SolutionSet {
    let width = target.width();
    if target.is_zero() {
        return SolutionSet::all(width);
    }
    let zeros = target.count_leading_zeros();
    if position == 1 {
        return SolutionSet::range(width, 0, u64::from(zeros));
    }

    let mask = target.mask();
    let mut set = SolutionSet::empty(width);
    for amount in 0..=zeros {
        set.add_pattern((mask << amount) & mask, target.value() << amount);
    }
    set
}

pub(super) fn ashr_inverse(
    target: BitVector,
    operands: &[BitVector],
    position: usize,
) -> SolutionSet {
    let width = target.width();
    let (t, mask) = (target.value(), target.mask());
    let sign = 1 << (width - 1);
    if position == 1 {
        let value = operands[0];
        let saturated = if value.is_negative() { mask } else { 0 };
        return amounts(value, target, saturated, |value, amount| {
            BitVector::new(value, width)
                .shift_right_arithmetic(BitVector::new(u64::from(amount), width))
                .value()
        });
    }

    match amount_of(operands[1]) {
        None if t == 0 => SolutionSet::pattern(width, sign, 0),
        None if t == mask => SolutionSet::pattern(width, sign, sign),
        None => SolutionSet::empty(width),
        Some(amount) => {
            // The top `amount + 1` bits of the target are copies of the sign.
            let top = t >> (width - 1 - amount);
            if top != 0 && top != width_mask(amount + 1) {
                SolutionSet::empty(width)
            } else {
                SolutionSet::pattern(width, (mask << amount) & mask, t << amount)
            }
        }
    }
}

pub(super) fn ashr_consistent(target: BitVector, position: usize) -> SolutionSet {
    let width = target.width();
    let (t, mask) = (target.value(), target.mask());
    let sign = 1 << (width - 1);
    if t == 0 || t == mask {
        return if position == 1 {
            SolutionSet::all(width)
        } else {
            SolutionSet::pattern(width, sign, t & sign)
        };
    }

    // The length of the run of sign copies at the top of the target.
    let run = if target.is_negative() {
        (!target).count_leading_zeros()
    } else {
        target.count_leading_zeros()
    };
    if position == 1 {
        return SolutionSet::range(width, 0, u64::from(run - 1));
    }

    let mut set = SolutionSet::empty(width);
    for amount in 0..run {
        set.add_pattern((mask << amount) & mask, t << amount);
    }
    set
}
