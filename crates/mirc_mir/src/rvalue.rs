//! `MIR RValue`. Appears only on the right-hand side of
//! `Statement::Assign`.

use mirc_ty::{ArraySize, GenericPath, TypeRef};

use crate::constant::Constant;
use crate::ids::VariantIdx;
use crate::lvalue::LValue;
use crate::operand::{BinOp, Param, UniOp};

#[derive(Clone, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub enum RValue {
    Use(Param),
    Constant(Constant),
    SizedArray { val: Param, count: ArraySize },
    Borrow { ty: mirc_ty::BorrowType, is_raw: bool, lval: LValue },
    Cast { val: Param, ty: TypeRef },
    BinOp { l: Param, op: BinOp, r: Param },
    UniOp { val: Param, op: UniOp },
    /// Extracts the metadata half of a fat pointer/reference.
    DstMeta { val: Param },
    /// Extracts the data-pointer half of a fat pointer/reference.
    DstPtr { val: Param },
    /// Reassembles a fat pointer from a thin pointer and metadata.
    MakeDst { ptr: Param, meta: Param },
    Tuple { vals: Vec<Param> },
    Array { vals: Vec<Param> },
    UnionVariant { path: GenericPath, idx: VariantIdx, val: Param },
    EnumVariant { path: GenericPath, idx: VariantIdx, vals: Vec<Param> },
    Struct { path: GenericPath, vals: Vec<Param> },
}
