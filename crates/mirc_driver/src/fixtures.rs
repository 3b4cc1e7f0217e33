//! Named `Function` builders standing in for `mir_opt_test`'s fixture
//! files. A real fixture directory holds `.rs` source the excluded parser
//! would compile to MIR; since that front end isn't part of this crate
//! family, fixtures are small hand-written builders registered by name
//! here, and `test_utils::collect_test_cases` still does the directory
//! walk and `#[test="..."]` extraction a real fixture file would need;
//! it just names a builder in this registry instead of a parsed function.

use mirc_mir::{
    BasicBlock, BinOp, Constant, Function, LValue, Param, PassContext, RValue, Statement, Storage,
    Terminator,
};
use mirc_ty::{Primitive, TypeRef};

fn u8_ty() -> TypeRef {
    TypeRef::Primitive(Primitive::U8)
}

/// Every fixture type used by `mir_opt_test`'s in-crate registry is built
/// from primitives only, so no local ever has drop glue.
pub struct NoDropGlueContext;

impl PassContext for NoDropGlueContext {
    fn has_drop_glue(&self, _ty: &TypeRef) -> bool {
        false
    }
}

/// `input() -> expected()`, the pair a `#[test="expected_fn"]` annotation
/// names.
pub struct Fixture {
    pub name: &'static str,
    pub expected_fn: &'static str,
    pub input: fn() -> Function,
    pub expected: fn() -> Function,
}

fn fold_add_builds_folded_constant_input() -> Function {
    let mut f = Function::new(vec![], u8_ty());
    let local = f.alloc_local(u8_ty());
    let mut entry = BasicBlock::new(Terminator::Return);
    entry.statements.push(Statement::Assign {
        dst: LValue::new(Storage::Local(local)),
        src: RValue::BinOp {
            l: Param::Constant(Constant::Uint { value: 1, ty: u8_ty() }),
            op: BinOp::Add,
            r: Param::Constant(Constant::Uint { value: 2, ty: u8_ty() }),
        },
    });
    f.alloc_block(entry);
    f
}

fn fold_add_builds_folded_constant_expected() -> Function {
    let mut f = Function::new(vec![], u8_ty());
    let local = f.alloc_local(u8_ty());
    let mut entry = BasicBlock::new(Terminator::Return);
    entry.statements.push(Statement::Assign {
        dst: LValue::new(Storage::Local(local)),
        src: RValue::Constant(Constant::Uint { value: 3, ty: u8_ty() }),
    });
    f.alloc_block(entry);
    f
}

fn goto_chain_input() -> Function {
    // entry (0) -> relay (1) -> target (2); `relay` is an empty statement-
    // free block the optimiser collapses out, leaving only the entry
    // redirected straight to `target`.
    let mut f = Function::new(vec![], u8_ty());
    let entry = f.alloc_block(BasicBlock::new(Terminator::Incomplete));
    let relay = f.alloc_block(BasicBlock::new(Terminator::Incomplete));
    let target = f.alloc_block(BasicBlock::new(Terminator::Return));
    f.blocks[relay.index()].terminator = Terminator::Goto(target);
    f.blocks[entry.index()].terminator = Terminator::Goto(relay);
    f
}

fn goto_chain_expected() -> Function {
    let mut f = Function::new(vec![], u8_ty());
    f.alloc_block(BasicBlock::new(Terminator::Goto(mirc_mir::BlockIdx::new(1))));
    f.alloc_block(BasicBlock::new(Terminator::Return));
    f
}

/// The fixtures `mir_opt_test` can look an annotation's target up by name.
pub fn registry() -> Vec<Fixture> {
    vec![
        Fixture {
            name: "fold_add",
            expected_fn: "fold_add_expected",
            input: fold_add_builds_folded_constant_input,
            expected: fold_add_builds_folded_constant_expected,
        },
        Fixture {
            name: "goto_chain",
            expected_fn: "goto_chain_expected",
            input: goto_chain_input,
            expected: goto_chain_expected,
        },
    ]
}

pub fn find(name: &str) -> Option<Fixture> {
    registry().into_iter().find(|f| f.name == name || f.expected_fn == name)
}
