//! `MIR Param` (an r-value operand) and the binary/unary operators used by
//! `RValue::BinOp`/`UniOp`.
//!
//! `Param` is kept distinct from `RValue` precisely so passes never build
//! an `RValue::Constant` that itself contains an `LValue`; arguments to
//! calls, struct fields, tuple elements and so on all go through `Param`,
//! and `RValue` only appears on the right-hand side of `Assign`.

use mirc_ty::BorrowType;

use crate::constant::Constant;
use crate::lvalue::LValue;

#[derive(Clone, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub enum Param {
    LValue(LValue),
    Borrow(BorrowType, LValue),
    Constant(Constant),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    CheckedAdd,
    CheckedSub,
    CheckedMul,
    CheckedDiv,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub enum UniOp {
    Negate,
    Invert,
}
