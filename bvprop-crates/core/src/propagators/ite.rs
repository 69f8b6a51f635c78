use crate::basic_types::BitVector;
use crate::domains::SolutionSet;

/// The operands are the condition, the then-branch and the else-branch.
pub(super) fn ite_inverse(target: BitVector, operands: &[BitVector], position: usize) -> SolutionSet {
    let (condition, then_value, else_value) = (operands[0], operands[1], operands[2]);
    match position {
        0 => {
            let mut set = SolutionSet::empty(1);
            if then_value == target {
                set.add_point(1);
            }
            if else_value == target {
                set.add_point(0);
            }
            set
        }
        _ => {
            let (selected, other) = if position == 1 {
                (condition.is_true(), else_value)
            } else {
                (!condition.is_true(), then_value)
            };
            if selected {
                SolutionSet::point(target.width(), target.value())
            } else if other == target {
                // The branch is not selected; any value keeps the target.
                SolutionSet::all(target.width())
            } else {
                SolutionSet::empty(target.width())
            }
        }
    }
}
