//! `MIR Statement`.

use mirc_ty::GenericPath;

use crate::constant::Constant;
use crate::ids::{DropFlagIdx, LocalIdx};
use crate::lvalue::LValue;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub enum DropKind {
    Deep,
    Shallow,
}

/// One operand of an `asm!`/`Asm2` block. Under cloning, `AsmParam::Sym`
/// is substituted as a path, `AsmParam::Const` as a constant, and
/// `AsmParam::Reg` preserves its register specifier verbatim while cloning
/// its lvalues through the renumber map.
#[derive(Clone, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub enum AsmParam {
    Sym(GenericPath),
    Const(Constant),
    Reg { spec: String, input: Option<LValue>, output: Option<LValue> },
}

#[derive(Clone, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Default)]
pub struct AsmOptions {
    pub nomem: bool,
    pub readonly: bool,
    pub pure_: bool,
    pub noreturn: bool,
    pub att_syntax: bool,
}

#[derive(Clone, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub enum Statement {
    Assign { dst: LValue, src: crate::rvalue::RValue },
    /// Legacy `asm!` with named inputs/outputs/clobber list.
    Asm { lines: Vec<String>, inputs: Vec<(String, LValue)>, outputs: Vec<(String, LValue)>, clobbers: Vec<String> },
    Asm2 { options: AsmOptions, lines: Vec<String>, params: Vec<AsmParam> },
    SetDropFlag { idx: DropFlagIdx, new: bool, other: Option<DropFlagIdx> },
    SaveDropFlag { idx: DropFlagIdx },
    LoadDropFlag { idx: DropFlagIdx },
    Drop { slot: LValue, kind: DropKind, flag_idx: Option<DropFlagIdx> },
    ScopeEnd { locals: Vec<LocalIdx> },
}
