use crate::basic_types::width_mask;
use crate::basic_types::BitVector;
use crate::domains::SolutionSet;

/// The operand at position 0 forms the high bits of the target, the one at position 1 the low
/// bits. Only the operand at `position` is free when `check_sibling` is false.
fn concat_solutions(
    target: BitVector,
    operands: &[BitVector],
    position: usize,
    check_sibling: bool,
) -> SolutionSet {
    let low_width = operands[1].width();
    let (high, low) = (target.value() >> low_width, target.value() & width_mask(low_width));
    let (solution, sibling_part) = if position == 0 { (high, low) } else { (low, high) };
    let width = operands[position].width();

    if check_sibling && operands[1 - position].value() != sibling_part {
        SolutionSet::empty(width)
    } else {
        SolutionSet::point(width, solution)
    }
}

pub(super) fn concat_inverse(
    target: BitVector,
    operands: &[BitVector],
    position: usize,
) -> SolutionSet {
    concat_solutions(target, operands, position, true)
}

pub(super) fn concat_consistent(
    target: BitVector,
    operands: &[BitVector],
    position: usize,
) -> SolutionSet {
    concat_solutions(target, operands, position, false)
}

/// The extracted bits of the operand are determined by the target, the others are free.
pub(super) fn extract_solutions(target: BitVector, width: u32, lower: u32) -> SolutionSet {
    SolutionSet::pattern(width, target.mask() << lower, target.value() << lower)
}

/// The target must consist of the operand followed by `by + 1` copies of its sign.
pub(super) fn sign_extend_solutions(target: BitVector, by: u32) -> SolutionSet {
    let width = target.width() - by;
    let top = target.value() >> (width - 1);
    if top == 0 || top == width_mask(by + 1) {
        SolutionSet::point(width, target.value() & width_mask(width))
    } else {
        SolutionSet::empty(width)
    }
}
