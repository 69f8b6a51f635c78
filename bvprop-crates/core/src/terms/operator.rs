use std::fmt::Display;
use std::fmt::Formatter;

use enum_map::Enum;

use crate::basic_types::BitVector;
use crate::bvprop_assert_moderate;

/// The bit-vector operators which can occur in a term graph.
///
/// The operands of an operator node are its children, in order. For [`BvOp::Concat`] the first
/// operand forms the most significant bits and for [`BvOp::Ite`] the operands are the condition
/// (of width 1), the then-branch and the else-branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BvOp {
    Not,
    And,
    Or,
    Xor,
    Add,
    Sub,
    Mul,
    Udiv,
    Urem,
    Sdiv,
    Srem,
    Shl,
    Lshr,
    Ashr,
    Ult,
    Slt,
    Eq,
    Concat,
    /// Extracts the bits `[upper:lower]` (both inclusive) of its operand.
    Extract {
        upper: u32,
        lower: u32,
    },
    /// Sign-extends its operand by `by` bits.
    SignExtend {
        by: u32,
    },
    Ite,
}

/// The parameterless counterpart of [`BvOp`]; used for keeping statistics per operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Enum)]
pub enum OpKind {
    Not,
    And,
    Or,
    Xor,
    Add,
    Sub,
    Mul,
    Udiv,
    Urem,
    Sdiv,
    Srem,
    Shl,
    Lshr,
    Ashr,
    Ult,
    Slt,
    Eq,
    Concat,
    Extract,
    SignExtend,
    Ite,
}

impl BvOp {
    pub fn kind(&self) -> OpKind {
        match self {
            BvOp::Not => OpKind::Not,
            BvOp::And => OpKind::And,
            BvOp::Or => OpKind::Or,
            BvOp::Xor => OpKind::Xor,
            BvOp::Add => OpKind::Add,
            BvOp::Sub => OpKind::Sub,
            BvOp::Mul => OpKind::Mul,
            BvOp::Udiv => OpKind::Udiv,
            BvOp::Urem => OpKind::Urem,
            BvOp::Sdiv => OpKind::Sdiv,
            BvOp::Srem => OpKind::Srem,
            BvOp::Shl => OpKind::Shl,
            BvOp::Lshr => OpKind::Lshr,
            BvOp::Ashr => OpKind::Ashr,
            BvOp::Ult => OpKind::Ult,
            BvOp::Slt => OpKind::Slt,
            BvOp::Eq => OpKind::Eq,
            BvOp::Concat => OpKind::Concat,
            BvOp::Extract { .. } => OpKind::Extract,
            BvOp::SignExtend { .. } => OpKind::SignExtend,
            BvOp::Ite => OpKind::Ite,
        }
    }

    /// The number of operands of the operator.
    pub fn arity(&self) -> usize {
        match self {
            BvOp::Not | BvOp::Extract { .. } | BvOp::SignExtend { .. } => 1,
            BvOp::Ite => 3,
            _ => 2,
        }
    }

    /// Whether the operator produces a value of width 1 from operands of arbitrary width.
    pub fn is_predicate(&self) -> bool {
        matches!(self, BvOp::Ult | BvOp::Slt | BvOp::Eq)
    }

    /// Applies the operator to the given operand values.
    pub fn evaluate(&self, operands: &[BitVector]) -> BitVector {
        bvprop_assert_moderate!(operands.len() == self.arity());
        match self {
            BvOp::Not => !operands[0],
            BvOp::And => operands[0] & operands[1],
            BvOp::Or => operands[0] | operands[1],
            BvOp::Xor => operands[0] ^ operands[1],
            BvOp::Add => operands[0].wrapping_add(operands[1]),
            BvOp::Sub => operands[0].wrapping_sub(operands[1]),
            BvOp::Mul => operands[0].wrapping_mul(operands[1]),
            BvOp::Udiv => operands[0].udiv(operands[1]),
            BvOp::Urem => operands[0].urem(operands[1]),
            BvOp::Sdiv => operands[0].sdiv(operands[1]),
            BvOp::Srem => operands[0].srem(operands[1]),
            BvOp::Shl => operands[0].shift_left(operands[1]),
            BvOp::Lshr => operands[0].shift_right_logical(operands[1]),
            BvOp::Ashr => operands[0].shift_right_arithmetic(operands[1]),
            BvOp::Ult => operands[0].ult(operands[1]),
            BvOp::Slt => operands[0].slt(operands[1]),
            BvOp::Eq => operands[0].equals(operands[1]),
            BvOp::Concat => operands[0].concat(operands[1]),
            BvOp::Extract { upper, lower } => operands[0].extract(*upper, *lower),
            BvOp::SignExtend { by } => operands[0].sign_extend(*by),
            BvOp::Ite => {
                if operands[0].is_true() {
                    operands[1]
                } else {
                    operands[2]
                }
            }
        }
    }
}

impl Display for OpKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OpKind::Not => "not",
            OpKind::And => "and",
            OpKind::Or => "or",
            OpKind::Xor => "xor",
            OpKind::Add => "add",
            OpKind::Sub => "sub",
            OpKind::Mul => "mul",
            OpKind::Udiv => "udiv",
            OpKind::Urem => "urem",
            OpKind::Sdiv => "sdiv",
            OpKind::Srem => "srem",
            OpKind::Shl => "shl",
            OpKind::Lshr => "lshr",
            OpKind::Ashr => "ashr",
            OpKind::Ult => "ult",
            OpKind::Slt => "slt",
            OpKind::Eq => "eq",
            OpKind::Concat => "concat",
            OpKind::Extract => "extract",
            OpKind::SignExtend => "sign_extend",
            OpKind::Ite => "ite",
        };
        write!(f, "{name}")
    }
}

impl Display for BvOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            BvOp::Extract { upper, lower } => write!(f, "extract[{upper}:{lower}]"),
            BvOp::SignExtend { by } => write!(f, "sign_extend[{by}]"),
            _ => write!(f, "{}", self.kind()),
        }
    }
}
