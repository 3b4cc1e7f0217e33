//! The MIR validator: enforces the data model's shape invariants. Validator
//! failures are an internal-bug class; callers are expected to dump the
//! offending function and abort, not recover.
//!
//! Full per-path drop-flag analysis ("`ScopeEnd` locals are each dropped
//! exactly once on every path") is borrow-checker territory; borrow-
//! checking is treated as an external semantic precondition, not a pass
//! this crate re-proves. This validator is scoped to what is checkable
//! from shape alone: block/local/drop-flag indices in range, writable-
//! target rules, and the `SwitchValue` length invariant.

use std::fmt;

use crate::function::{BasicBlock, Function};
use crate::ids::BlockIdx;
use crate::lvalue::{LValue, Storage, Wrapper};
use crate::operand::Param;
use crate::rvalue::RValue;
use crate::statement::Statement;
use crate::terminator::{CallTarget, Terminator};

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum MirValidationError {
    UnknownBlock { from: BlockIdx, to: BlockIdx },
    IncompleteTerminator { block: BlockIdx },
    StaticAssignTarget,
    BadDropFlagIndex { idx: u32, len: usize },
    SwitchValueLengthMismatch { targets: usize, values: usize },
    IndexLocalNotUnsignedInt { local: u32 },
    LocalOutOfRange { local: u32, len: usize },
    ArgumentOutOfRange { arg: u32, len: usize },
}

impl fmt::Display for MirValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MirValidationError::UnknownBlock { from, to } => {
                write!(f, "block {} references non-existent block {}", from, to)
            }
            MirValidationError::IncompleteTerminator { block } => {
                write!(f, "block {} still has an Incomplete terminator", block)
            }
            MirValidationError::StaticAssignTarget => {
                write!(f, "assignment/call target is static storage, which is never writable here")
            }
            MirValidationError::BadDropFlagIndex { idx, len } => {
                write!(f, "drop-flag index {} out of range (have {})", idx, len)
            }
            MirValidationError::SwitchValueLengthMismatch { targets, values } => {
                write!(f, "SwitchValue has {} targets but {} values", targets, values)
            }
            MirValidationError::IndexLocalNotUnsignedInt { local } => {
                write!(f, "local {} used as an Index wrapper but is not an unsigned integer", local)
            }
            MirValidationError::LocalOutOfRange { local, len } => {
                write!(f, "local {} out of range (have {})", local, len)
            }
            MirValidationError::ArgumentOutOfRange { arg, len } => {
                write!(f, "argument {} out of range (have {})", arg, len)
            }
        }
    }
}

impl std::error::Error for MirValidationError {}

pub type ValidateResult<T> = Result<T, MirValidationError>;

pub fn validate(f: &Function) -> ValidateResult<()> {
    for (i, block) in f.blocks.iter().enumerate() {
        let from = BlockIdx::new(i as u32);
        validate_block(f, from, block)?;
    }
    Ok(())
}

fn validate_block(f: &Function, from: BlockIdx, block: &BasicBlock) -> ValidateResult<()> {
    for stmt in &block.statements {
        validate_statement(f, stmt)?;
    }
    validate_terminator(f, from, &block.terminator)?;
    Ok(())
}

fn validate_statement(f: &Function, stmt: &Statement) -> ValidateResult<()> {
    match stmt {
        Statement::Assign { dst, src } => {
            if matches!(dst.storage, Storage::Static(_)) {
                return Err(MirValidationError::StaticAssignTarget);
            }
            validate_lvalue(f, dst)?;
            validate_rvalue(f, src)?;
        }
        Statement::Asm { inputs, outputs, .. } => {
            for (_, lval) in inputs.iter().chain(outputs) {
                validate_lvalue(f, lval)?;
            }
        }
        Statement::Asm2 { params, .. } => {
            for p in params {
                if let crate::statement::AsmParam::Reg { input, output, .. } = p {
                    if let Some(lval) = input {
                        validate_lvalue(f, lval)?;
                    }
                    if let Some(lval) = output {
                        validate_lvalue(f, lval)?;
                    }
                }
            }
        }
        Statement::SetDropFlag { idx, other, .. } => {
            check_drop_flag(f, *idx)?;
            if let Some(other) = other {
                check_drop_flag(f, *other)?;
            }
        }
        Statement::SaveDropFlag { idx } | Statement::LoadDropFlag { idx } => {
            check_drop_flag(f, *idx)?;
        }
        Statement::Drop { slot, flag_idx, .. } => {
            validate_lvalue(f, slot)?;
            if let Some(idx) = flag_idx {
                check_drop_flag(f, *idx)?;
            }
        }
        Statement::ScopeEnd { locals } => {
            for l in locals {
                if l.index() >= f.locals.len() {
                    return Err(MirValidationError::LocalOutOfRange { local: l.0, len: f.locals.len() });
                }
            }
        }
    }
    Ok(())
}

fn validate_rvalue(f: &Function, rv: &RValue) -> ValidateResult<()> {
    match rv {
        RValue::Use(p) | RValue::DstMeta { val: p } | RValue::DstPtr { val: p } => validate_param(f, p),
        RValue::Constant(_) => Ok(()),
        RValue::SizedArray { val, .. } => validate_param(f, val),
        RValue::Borrow { lval, .. } => validate_lvalue(f, lval),
        RValue::Cast { val, .. } => validate_param(f, val),
        RValue::BinOp { l, r, .. } => {
            validate_param(f, l)?;
            validate_param(f, r)
        }
        RValue::UniOp { val, .. } => validate_param(f, val),
        RValue::MakeDst { ptr, meta } => {
            validate_param(f, ptr)?;
            validate_param(f, meta)
        }
        RValue::Tuple { vals } | RValue::Array { vals } => {
            for v in vals {
                validate_param(f, v)?;
            }
            Ok(())
        }
        RValue::UnionVariant { val, .. } => validate_param(f, val),
        RValue::EnumVariant { vals, .. } | RValue::Struct { vals, .. } => {
            for v in vals {
                validate_param(f, v)?;
            }
            Ok(())
        }
    }
}

fn validate_param(f: &Function, p: &Param) -> ValidateResult<()> {
    match p {
        Param::LValue(l) | Param::Borrow(_, l) => validate_lvalue(f, l),
        Param::Constant(_) => Ok(()),
    }
}

fn validate_lvalue(f: &Function, lval: &LValue) -> ValidateResult<()> {
    match &lval.storage {
        Storage::Argument(a) => {
            if a.index() >= f.args.len() {
                return Err(MirValidationError::ArgumentOutOfRange { arg: a.0, len: f.args.len() });
            }
        }
        Storage::Local(l) => {
            if l.index() >= f.locals.len() {
                return Err(MirValidationError::LocalOutOfRange { local: l.0, len: f.locals.len() });
            }
        }
        Storage::Return | Storage::Static(_) => {}
    }
    for w in &lval.wrappers {
        if let Wrapper::Index(local) = w {
            match f.locals.get(local.index()) {
                Some(ty) => {
                    let is_unsigned = ty.as_primitive().map(|p| p.is_integer() && p.is_unsigned()).unwrap_or(false);
                    if !is_unsigned {
                        return Err(MirValidationError::IndexLocalNotUnsignedInt { local: local.0 });
                    }
                }
                None => return Err(MirValidationError::LocalOutOfRange { local: local.0, len: f.locals.len() }),
            }
        }
    }
    Ok(())
}

fn check_drop_flag(f: &Function, idx: crate::ids::DropFlagIdx) -> ValidateResult<()> {
    if idx.index() >= f.drop_flags.len() {
        return Err(MirValidationError::BadDropFlagIndex { idx: idx.0, len: f.drop_flags.len() });
    }
    Ok(())
}

fn validate_terminator(f: &Function, from: BlockIdx, term: &Terminator) -> ValidateResult<()> {
    for to in term.successors() {
        if to.index() >= f.blocks.len() {
            return Err(MirValidationError::UnknownBlock { from, to });
        }
    }
    match term {
        Terminator::SwitchValue { val, targets, values, .. } => {
            validate_param(f, val)?;
            if targets.len() != values.len() {
                return Err(MirValidationError::SwitchValueLengthMismatch {
                    targets: targets.len(),
                    values: values.len(),
                });
            }
        }
        Terminator::Switch { val, .. } => validate_lvalue(f, val)?,
        Terminator::If { cond, .. } => validate_param(f, cond)?,
        Terminator::Call { dst, target, args, .. } => {
            if matches!(dst.storage, Storage::Static(_)) {
                return Err(MirValidationError::StaticAssignTarget);
            }
            validate_lvalue(f, dst)?;
            if let CallTarget::Value(l) = target {
                validate_lvalue(f, l)?;
            }
            for a in args {
                validate_param(f, a)?;
            }
        }
        Terminator::Incomplete => return Err(MirValidationError::IncompleteTerminator { block: from }),
        Terminator::Return | Terminator::Diverge | Terminator::Goto(_) | Terminator::Panic { .. } => {}
    }
    Ok(())
}
