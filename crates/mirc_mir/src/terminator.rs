//! `MIR Terminator`.

use mirc_ty::{GenericPath, Name, PathParams};

use crate::constant::SwitchValues;
use crate::ids::BlockIdx;
use crate::lvalue::LValue;
use crate::operand::Param;

#[derive(Clone, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub enum CallTarget {
    Value(LValue),
    Path(GenericPath),
    Intrinsic(Name, PathParams),
}

#[derive(Clone, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub enum Terminator {
    /// Not a real terminator; flagged by the validator if still present.
    Incomplete,
    Return,
    Diverge,
    Goto(BlockIdx),
    Panic { dst: BlockIdx },
    If { cond: Param, t: BlockIdx, f: BlockIdx },
    /// An enum-discriminant switch; `targets[i]` corresponds to variant `i`.
    Switch { val: LValue, targets: Vec<BlockIdx> },
    /// `targets` is ordinal-aligned to `values`.
    SwitchValue { val: Param, default: BlockIdx, targets: Vec<BlockIdx>, values: SwitchValues },
    Call { ret_bb: BlockIdx, panic_bb: BlockIdx, dst: LValue, target: CallTarget, args: Vec<Param> },
}

impl Terminator {
    /// Every block index this terminator transfers control to, in no
    /// particular order. Used by the optimiser's reachability/goto passes.
    pub fn successors(&self) -> Vec<BlockIdx> {
        match self {
            Terminator::Incomplete | Terminator::Return | Terminator::Diverge => Vec::new(),
            Terminator::Goto(b) => vec![*b],
            Terminator::Panic { dst } => vec![*dst],
            Terminator::If { t, f, .. } => vec![*t, *f],
            Terminator::Switch { targets, .. } => targets.clone(),
            Terminator::SwitchValue { default, targets, .. } => {
                let mut v = targets.clone();
                v.push(*default);
                v
            }
            Terminator::Call { ret_bb, panic_bb, .. } => vec![*ret_bb, *panic_bb],
        }
    }

    pub fn successors_mut(&mut self) -> Vec<&mut BlockIdx> {
        match self {
            Terminator::Incomplete | Terminator::Return | Terminator::Diverge => Vec::new(),
            Terminator::Goto(b) => vec![b],
            Terminator::Panic { dst } => vec![dst],
            Terminator::If { t, f, .. } => vec![t, f],
            Terminator::Switch { targets, .. } => targets.iter_mut().collect(),
            Terminator::SwitchValue { default, targets, .. } => {
                let mut v: Vec<&mut BlockIdx> = targets.iter_mut().collect();
                v.push(default);
                v
            }
            Terminator::Call { ret_bb, panic_bb, .. } => vec![ret_bb, panic_bb],
        }
    }
}
