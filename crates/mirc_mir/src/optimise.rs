//! The MIR optimiser driver and its four passes: `simplify_constants`,
//! `merge_goto_chains`, `remove_unreachable_blocks`,
//! `remove_unused_self_clause`. Borrow-checking is a precondition the
//! driver gates on, not a pass it runs; a real borrow checker is out of
//! scope for this workspace, so it is represented here as a pluggable
//! `BorrowChecker` trait object the caller supplies.

use std::fmt;

use mirc_db::HirDatabase;
use mirc_resolve::{Span, TraitResolve, Tristate};
use mirc_ty::{GenericPath, TypeRef};

use crate::constant::Constant;
use crate::function::{BasicBlock, Function};
use crate::ids::BlockIdx;
use crate::operand::{BinOp, Param, UniOp};
use crate::rvalue::RValue;
use crate::statement::Statement;
use crate::terminator::Terminator;
use crate::validate::{self, MirValidationError};

/// The maximum number of driver iterations before giving up on reaching a
/// fixed point.
const MAX_ITERATIONS: usize = 16;

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct BorrowCheckError(pub String);

impl fmt::Display for BorrowCheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "borrow check failed: {}", self.0)
    }
}

impl std::error::Error for BorrowCheckError {}

/// Either a validator failure (an internal-bug class, never expected on
/// well-formed input) or a borrow-check failure (reported as a diagnostic
/// and aborting compilation for the function).
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum OptimiseError {
    Validation(MirValidationError),
    BorrowCheck(BorrowCheckError),
}

impl fmt::Display for OptimiseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptimiseError::Validation(e) => write!(f, "{}", e),
            OptimiseError::BorrowCheck(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for OptimiseError {}

pub type OptimiseResult<T> = Result<T, OptimiseError>;

/// Pluggable borrow-check gate: the driver invokes the borrow-checker on
/// the validated MIR before running any pass. Borrow-checking is a
/// precondition, not a pass; its success is treated as a semantic
/// property the optimiser preserves, not something the optimiser itself
/// establishes. The real borrow-check algorithm is out of scope;
/// implementations plug in whatever the front end already asserts.
pub trait BorrowChecker {
    fn check(&self, f: &Function) -> Result<(), BorrowCheckError>;
}

/// A borrow checker that accepts every function. Used by callers (and the
/// test suite) that have nothing more specific to plug in; a real front
/// end supplies its own `BorrowChecker`.
pub struct AcceptAllBorrowChecker;

impl BorrowChecker for AcceptAllBorrowChecker {
    fn check(&self, _f: &Function) -> Result<(), BorrowCheckError> {
        Ok(())
    }
}

/// Context a pass may consult beyond the `Function` it is rewriting.
/// Currently just the one query `remove_unused_self_clause` needs: whether
/// a type has drop glue, per the `Drop` lang item.
pub trait PassContext {
    fn has_drop_glue(&self, ty: &TypeRef) -> bool;
}

/// The real `PassContext`: answers `has_drop_glue` by asking the trait
/// resolver whether the type implements the `Drop` lang item. With no
/// resolver attached (or no `Drop` lang item registered), conservatively
/// assumes every type has drop glue; under-elision is always sound,
/// over-elision is not.
pub struct MirPassContext<'a> {
    db: &'a dyn HirDatabase,
    resolver: Option<&'a TraitResolve<'a>>,
}

impl<'a> MirPassContext<'a> {
    pub fn new(db: &'a dyn HirDatabase, resolver: Option<&'a TraitResolve<'a>>) -> MirPassContext<'a> {
        MirPassContext { db, resolver }
    }
}

impl<'a> PassContext for MirPassContext<'a> {
    fn has_drop_glue(&self, ty: &TypeRef) -> bool {
        let resolver = match self.resolver {
            Some(r) => r,
            None => return true,
        };
        let drop_path = match self.db.get_lang_item_path_opt("drop") {
            Some(p) => p,
            None => return true,
        };
        let trait_gp = GenericPath::no_params(drop_path);
        let sp = Span::new("mir-optimise:has_drop_glue");
        !matches!(resolver.type_implements(&sp, ty, &trait_gp), Ok(Tristate::No))
    }
}

/// Runs the fixed pass sequence to a fixed point (or `MAX_ITERATIONS`),
/// re-validating after every pass, gated on an initial borrow-check of the
/// input. Returns the optimised function, or the first validation/
/// borrow-check failure encountered.
pub fn optimise(
    mut f: Function,
    ctx: &dyn PassContext,
    borrow_checker: &dyn BorrowChecker,
) -> OptimiseResult<Function> {
    validate::validate(&f).map_err(OptimiseError::Validation)?;
    borrow_checker.check(&f).map_err(OptimiseError::BorrowCheck)?;

    for _ in 0..MAX_ITERATIONS {
        let mut changed = false;
        changed |= simplify_constants(&mut f);
        validate::validate(&f).map_err(OptimiseError::Validation)?;
        changed |= merge_goto_chains(&mut f);
        validate::validate(&f).map_err(OptimiseError::Validation)?;
        changed |= remove_unreachable_blocks(&mut f);
        validate::validate(&f).map_err(OptimiseError::Validation)?;
        changed |= remove_unused_self_clause(&mut f, ctx);
        validate::validate(&f).map_err(OptimiseError::Validation)?;

        if !changed {
            break;
        }
    }
    Ok(f)
}

/// Folds `RValue::BinOp`/`UniOp` over concrete constants into a single
/// `RValue::Constant`, and `Terminator::If` with a constant `bool`
/// condition into a `Goto`.
pub fn simplify_constants(f: &mut Function) -> bool {
    let mut changed = false;
    for block in &mut f.blocks {
        for stmt in &mut block.statements {
            if let Statement::Assign { src, .. } = stmt {
                if let Some(folded) = fold_rvalue(src) {
                    *src = RValue::Constant(folded);
                    changed = true;
                }
            }
        }
        if let Terminator::If { cond: Param::Constant(Constant::Bool(b)), t, f: else_ } = &block.terminator {
            block.terminator = Terminator::Goto(if *b { *t } else { *else_ });
            changed = true;
        }
    }
    changed
}

fn fold_rvalue(rv: &RValue) -> Option<Constant> {
    match rv {
        RValue::BinOp { l: Param::Constant(l), op, r: Param::Constant(r) } => fold_binop(l, *op, r),
        RValue::UniOp { val: Param::Constant(c), op } => fold_uniop(c, *op),
        _ => None,
    }
}

fn fold_binop(l: &Constant, op: BinOp, r: &Constant) -> Option<Constant> {
    use BinOp::*;
    if matches!(op, Eq | Ne | Lt | Le | Gt | Ge) {
        let ord = compare_constants(l, r)?;
        let result = match op {
            Eq => ord == std::cmp::Ordering::Equal,
            Ne => ord != std::cmp::Ordering::Equal,
            Lt => ord == std::cmp::Ordering::Less,
            Le => ord != std::cmp::Ordering::Greater,
            Gt => ord == std::cmp::Ordering::Greater,
            Ge => ord != std::cmp::Ordering::Less,
            _ => unreachable!(),
        };
        return Some(Constant::Bool(result));
    }

    match (l, r) {
        (Constant::Int { value: a, ty }, Constant::Int { value: b, .. }) => {
            int_binop(*a, *b, op).map(|v| Constant::Int { value: v, ty: ty.clone() })
        }
        (Constant::Uint { value: a, ty }, Constant::Uint { value: b, .. }) => {
            uint_binop(*a, *b, op).map(|v| Constant::Uint { value: v, ty: ty.clone() })
        }
        (Constant::Float { ty, .. }, Constant::Float { .. }) => {
            let a = l.float_value()?;
            let b = r.float_value()?;
            float_binop(a, b, op).map(|v| Constant::float(v, ty.clone()))
        }
        (Constant::Bool(a), Constant::Bool(b)) => match op {
            BitAnd => Some(Constant::Bool(*a && *b)),
            BitOr => Some(Constant::Bool(*a || *b)),
            BitXor => Some(Constant::Bool(*a != *b)),
            _ => None,
        },
        _ => None,
    }
}

fn int_binop(a: i128, b: i128, op: BinOp) -> Option<i128> {
    use BinOp::*;
    Some(match op {
        Add | CheckedAdd => a.wrapping_add(b),
        Sub | CheckedSub => a.wrapping_sub(b),
        Mul | CheckedMul => a.wrapping_mul(b),
        Div | CheckedDiv => {
            if b == 0 {
                return None;
            }
            a.wrapping_div(b)
        }
        Mod => {
            if b == 0 {
                return None;
            }
            a.wrapping_rem(b)
        }
        BitAnd => a & b,
        BitOr => a | b,
        BitXor => a ^ b,
        Shl => a.wrapping_shl(b as u32),
        Shr => a.wrapping_shr(b as u32),
        Eq | Ne | Lt | Le | Gt | Ge => return None,
    })
}

fn uint_binop(a: u128, b: u128, op: BinOp) -> Option<u128> {
    use BinOp::*;
    Some(match op {
        Add | CheckedAdd => a.wrapping_add(b),
        Sub | CheckedSub => a.wrapping_sub(b),
        Mul | CheckedMul => a.wrapping_mul(b),
        Div | CheckedDiv => {
            if b == 0 {
                return None;
            }
            a.wrapping_div(b)
        }
        Mod => {
            if b == 0 {
                return None;
            }
            a.wrapping_rem(b)
        }
        BitAnd => a & b,
        BitOr => a | b,
        BitXor => a ^ b,
        Shl => a.wrapping_shl(b as u32),
        Shr => a.wrapping_shr(b as u32),
        Eq | Ne | Lt | Le | Gt | Ge => return None,
    })
}

fn float_binop(a: f64, b: f64, op: BinOp) -> Option<f64> {
    use BinOp::*;
    Some(match op {
        Add | CheckedAdd => a + b,
        Sub | CheckedSub => a - b,
        Mul | CheckedMul => a * b,
        Div | CheckedDiv => a / b,
        Mod => a % b,
        BitAnd | BitOr | BitXor | Shl | Shr | Eq | Ne | Lt | Le | Gt | Ge => return None,
    })
}

fn compare_constants(l: &Constant, r: &Constant) -> Option<std::cmp::Ordering> {
    match (l, r) {
        (Constant::Int { value: a, .. }, Constant::Int { value: b, .. }) => Some(a.cmp(b)),
        (Constant::Uint { value: a, .. }, Constant::Uint { value: b, .. }) => Some(a.cmp(b)),
        (Constant::Bool(a), Constant::Bool(b)) => Some(a.cmp(b)),
        (Constant::Float { .. }, Constant::Float { .. }) => l.float_value()?.partial_cmp(&r.float_value()?),
        _ => None,
    }
}

fn fold_uniop(c: &Constant, op: UniOp) -> Option<Constant> {
    match (c, op) {
        (Constant::Int { value, ty }, UniOp::Negate) => {
            Some(Constant::Int { value: value.wrapping_neg(), ty: ty.clone() })
        }
        (Constant::Bool(b), UniOp::Invert) => Some(Constant::Bool(!b)),
        (Constant::Int { value, ty }, UniOp::Invert) => Some(Constant::Int { value: !value, ty: ty.clone() }),
        (Constant::Uint { value, ty }, UniOp::Invert) => Some(Constant::Uint { value: !value, ty: ty.clone() }),
        _ => None,
    }
}

/// Collapses a block whose only content is `Goto(b)` into its target,
/// redirecting every predecessor straight to `b`; repeats until a fixed
/// point. Block 0 is never removed even if empty, since it is the entry
/// point by position rather than by any incoming edge.
pub fn merge_goto_chains(f: &mut Function) -> bool {
    let mut changed = false;
    loop {
        let mut redirect: Vec<Option<BlockIdx>> = vec![None; f.blocks.len()];
        for (i, block) in f.blocks.iter().enumerate() {
            if i != 0 && block.statements.is_empty() {
                if let Terminator::Goto(target) = block.terminator {
                    if target.index() != i {
                        redirect[i] = Some(target);
                    }
                }
            }
        }
        let resolve = |mut b: BlockIdx| {
            let mut steps = 0;
            while let Some(next) = redirect[b.index()] {
                b = next;
                steps += 1;
                if steps > f.blocks.len() {
                    break; // a goto cycle; leave it pointing at the last seen target
                }
            }
            b
        };
        // One `resolve` call already chases a whole redirect chain to its
        // end, so a single sweep over every block's successors is enough
        // to converge for this round's redirect map; the outer `loop`
        // exists only to re-derive the map after block contents that fed
        // it have themselves been rewritten, and terminates as soon as a
        // sweep makes no further change (relay blocks are left in place
        // for `remove_unreachable_blocks` to delete, so "redirect map is
        // non-empty" is not a valid stopping condition by itself).
        let mut pass_changed = false;
        for block in &mut f.blocks {
            for succ in block.terminator.successors_mut() {
                let resolved = resolve(*succ);
                if resolved != *succ {
                    *succ = resolved;
                    pass_changed = true;
                }
            }
        }
        if !pass_changed {
            break;
        }
        changed = true;
    }
    changed
}

/// Deletes every block no predecessor (including block 0, the entry) can
/// reach, renumbering the survivors and remapping every terminator's block
/// references.
pub fn remove_unreachable_blocks(f: &mut Function) -> bool {
    let mut reachable = vec![false; f.blocks.len()];
    let mut stack = vec![BlockIdx::new(0)];
    while let Some(b) = stack.pop() {
        if b.index() >= reachable.len() || reachable[b.index()] {
            continue;
        }
        reachable[b.index()] = true;
        stack.extend(f.blocks[b.index()].terminator.successors());
    }

    if reachable.iter().all(|&r| r) {
        return false;
    }

    let mut remap: Vec<Option<BlockIdx>> = vec![None; f.blocks.len()];
    let mut new_blocks: Vec<BasicBlock> = Vec::new();
    for (i, keep) in reachable.iter().enumerate() {
        if *keep {
            remap[i] = Some(BlockIdx::new(new_blocks.len() as u32));
            new_blocks.push(f.blocks[i].clone());
        }
    }
    for block in &mut new_blocks {
        for succ in block.terminator.successors_mut() {
            *succ = remap[succ.index()].expect("successor of a reachable block is itself reachable");
        }
    }
    f.blocks = new_blocks;
    true
}

/// Drops a `ScopeEnd` entry for a local whose type provably has no drop
/// glue, per `ctx`'s `Drop`-lang-item query: any local the resolver can
/// show never needs destructor code run, not just the original compiler's
/// narrower self-parameter case.
pub fn remove_unused_self_clause(f: &mut Function, ctx: &dyn PassContext) -> bool {
    let mut changed = false;
    let locals = &f.locals;
    for block in &mut f.blocks {
        for stmt in &mut block.statements {
            if let Statement::ScopeEnd { locals: scope_locals } = stmt {
                let before = scope_locals.len();
                scope_locals.retain(|l| locals.get(l.index()).map(|ty| ctx.has_drop_glue(ty)).unwrap_or(true));
                if scope_locals.len() != before {
                    changed = true;
                }
            }
        }
    }
    changed
}
