use mirc_db::test_db::TestDatabase;
use mirc_ty::{ConstGeneric, ConstParam, GenericGroup, GenericParams, GenericRef, Name, Primitive, TypeRef};

use crate::constant::Constant;
use crate::endianness::Endianness;
use crate::function::{BasicBlock, Function};
use crate::ids::LocalIdx;
use crate::lvalue::{LValue, Storage};
use crate::monomorphiser::Identity;
use crate::operand::{BinOp, Param};
use crate::optimise::{self, AcceptAllBorrowChecker, PassContext};
use crate::renumber::RenumberMaps;
use crate::rvalue::RValue;
use crate::statement::Statement;
use crate::terminator::Terminator;

fn u8_ty() -> TypeRef {
    TypeRef::Primitive(Primitive::U8)
}

fn bool_ty() -> TypeRef {
    TypeRef::bool_()
}

fn simple_function() -> Function {
    let mut f = Function::new(vec![u8_ty()], u8_ty());
    let local = f.alloc_local(u8_ty());
    let mut entry = BasicBlock::new(Terminator::Return);
    entry.statements.push(Statement::Assign {
        dst: LValue::new(Storage::Local(local)),
        src: RValue::Use(Param::LValue(LValue::new(Storage::Argument(crate::ids::ArgIdx::new(0))))),
    });
    f.alloc_block(entry);
    f
}

struct AlwaysHasDropGlue;
impl PassContext for AlwaysHasDropGlue {
    fn has_drop_glue(&self, _ty: &TypeRef) -> bool {
        true
    }
}

struct NeverHasDropGlue;
impl PassContext for NeverHasDropGlue {
    fn has_drop_glue(&self, _ty: &TypeRef) -> bool {
        false
    }
}

#[test]
fn structural_clone_is_identity_under_identity_monomorphiser() {
    let f = simple_function();
    let maps = RenumberMaps::identity(f.blocks.len(), f.locals.len(), f.drop_flags.len());
    let mono = Identity;
    let cloner = crate::cloner::Cloner::new(&mono, None, Endianness::Little);
    let sp = mirc_resolve::Span::new("test");
    let cloned = cloner.clone_function(&sp, &f, &maps).expect("clone succeeds with no resolver");
    assert_eq!(cloned, f);
}

#[test]
fn str_const_generic_is_rejected_during_cloning() {
    let db = TestDatabase::new();
    let item_generics = GenericParams {
        types: Vec::new(),
        consts: vec![ConstParam { name: Name::new("N"), ty: TypeRef::Primitive(Primitive::Str), default: None }],
        bounds: Vec::new(),
    };
    let mut resolver = mirc_resolve::TraitResolve::new(&db, None, Some(&item_generics));
    let sp = mirc_resolve::Span::new("test");
    resolver.prep_indexes(&sp).unwrap();

    let mut f = Function::new(vec![], u8_ty());
    let local = f.alloc_local(u8_ty());
    let mut entry = BasicBlock::new(Terminator::Return);
    entry.statements.push(Statement::Assign {
        dst: LValue::new(Storage::Local(local)),
        src: RValue::Constant(Constant::Generic(GenericRef::new(GenericGroup::Item, 0))),
    });
    f.alloc_block(entry);

    let mono = crate::monomorphiser::ImplMethodSelf {
        self_type: u8_ty(),
        impl_params: mirc_ty::PathParams::empty(),
        method_params: mirc_ty::PathParams {
            types: Vec::new(),
            values: vec![ConstGeneric::Evaluated { bytes: vec![5] }],
            lifetimes: Vec::new(),
        },
        hrb_params: mirc_ty::PathParams::empty(),
    };
    let maps = RenumberMaps::identity(f.blocks.len(), f.locals.len(), f.drop_flags.len());
    let cloner = crate::cloner::Cloner::new(&mono, Some(&resolver), Endianness::Little);
    let err = cloner.clone_function(&sp, &f, &maps).unwrap_err();
    assert!(matches!(err.kind, mirc_resolve::ResolveErrorKind::UnsupportedConstGenericType { .. }));
}

#[test]
fn char_const_generic_decodes_through_the_unsigned_arm() {
    let db = TestDatabase::new();
    let item_generics = GenericParams {
        types: Vec::new(),
        consts: vec![ConstParam { name: Name::new("C"), ty: TypeRef::Primitive(Primitive::Char), default: None }],
        bounds: Vec::new(),
    };
    let mut resolver = mirc_resolve::TraitResolve::new(&db, None, Some(&item_generics));
    let sp = mirc_resolve::Span::new("test");
    resolver.prep_indexes(&sp).unwrap();

    let char_ty = TypeRef::Primitive(Primitive::Char);
    let mut f = Function::new(vec![], char_ty.clone());
    let local = f.alloc_local(char_ty);
    let mut entry = BasicBlock::new(Terminator::Return);
    entry.statements.push(Statement::Assign {
        dst: LValue::new(Storage::Local(local)),
        src: RValue::Constant(Constant::Generic(GenericRef::new(GenericGroup::Item, 0))),
    });
    f.alloc_block(entry);

    let mono = crate::monomorphiser::ImplMethodSelf {
        self_type: u8_ty(),
        impl_params: mirc_ty::PathParams::empty(),
        method_params: mirc_ty::PathParams {
            types: Vec::new(),
            values: vec![ConstGeneric::Evaluated { bytes: vec![0x41, 0, 0, 0] }],
            lifetimes: Vec::new(),
        },
        hrb_params: mirc_ty::PathParams::empty(),
    };
    let maps = RenumberMaps::identity(f.blocks.len(), f.locals.len(), f.drop_flags.len());
    let cloner = crate::cloner::Cloner::new(&mono, Some(&resolver), Endianness::Little);
    let cloned = cloner.clone_function(&sp, &f, &maps).unwrap();
    match &cloned.blocks[0].statements[0] {
        Statement::Assign { src: RValue::Constant(Constant::Uint { value, .. }), .. } => {
            assert_eq!(*value, 0x41);
        }
        other => panic!("expected a decoded Uint constant, got {:?}", other),
    }
}

#[test]
fn monomorphisation_eliminates_a_ground_associated_type_projection() {
    // After cloning with a non-identity monomorphiser that covers all free
    // generics, no `Path::UfcsKnown` should appear in the output unless its
    // `type` is itself a generic reference, which, under total
    // substitution, cannot occur. Here the projection's base is already
    // ground (`u8`), so the equality the resolver indexed for it applies
    // unconditionally; the local carrying that projection
    // survives cloning with its projection expanded away even though the
    // monomorphiser in play substitutes an unrelated method generic
    // elsewhere in the same function.
    let mut db = TestDatabase::new();
    let iterator_path = mirc_ty::SimplePath::local(vec![Name::new("Iterator")]);
    db.add_trait(iterator_path.clone(), GenericParams::empty(), Vec::new(), vec![Name::new("Item")]);
    let iterator_trait = mirc_ty::GenericPath::no_params(iterator_path);
    let item_generics = GenericParams {
        types: Vec::new(),
        consts: Vec::new(),
        bounds: vec![mirc_ty::Bound::TraitBound {
            ty: u8_ty(),
            trait_path: mirc_ty::TraitPath {
                trait_: iterator_trait.clone(),
                assoc_bindings: vec![(Name::new("Item"), bool_ty())],
            },
        }],
    };
    let mut resolver = mirc_resolve::TraitResolve::new(&db, None, Some(&item_generics));
    let sp = mirc_resolve::Span::new("test");
    resolver.prep_indexes(&sp).unwrap();

    let projection_ty = TypeRef::Nominal(mirc_ty::Path::UfcsKnown {
        ty: Box::new(u8_ty()),
        trait_: iterator_trait,
        item: Name::new("Item"),
        params: mirc_ty::PathParams::empty(),
    });

    let mut f = Function::new(vec![], bool_ty());
    f.alloc_local(projection_ty);
    f.alloc_block(BasicBlock::new(Terminator::Return));

    // A non-identity monomorphiser: substitutes a method generic this
    // function doesn't actually reference, demonstrating the projection's
    // elimination doesn't depend on the base type being touched by it.
    let mono = crate::monomorphiser::ImplMethodSelf {
        self_type: u8_ty(),
        impl_params: mirc_ty::PathParams::empty(),
        method_params: mirc_ty::PathParams {
            types: vec![bool_ty()],
            values: Vec::new(),
            lifetimes: Vec::new(),
        },
        hrb_params: mirc_ty::PathParams::empty(),
    };
    let maps = RenumberMaps::identity(f.blocks.len(), f.locals.len(), f.drop_flags.len());
    let cloner = crate::cloner::Cloner::new(&mono, Some(&resolver), Endianness::Little);
    let cloned = cloner.clone_function(&sp, &f, &maps).unwrap();

    assert_eq!(cloned.locals[0], bool_ty());
    assert!(!matches!(cloned.locals[0], TypeRef::Nominal(mirc_ty::Path::UfcsKnown { .. })));
}

#[test]
fn changing_a_local_type_breaks_equality() {
    let f = simple_function();
    let mut g = f.clone();
    g.locals[0] = bool_ty();
    assert_ne!(f, g);
}

#[test]
fn validator_rejects_out_of_range_block() {
    let mut f = Function::new(vec![], u8_ty());
    f.alloc_block(BasicBlock::new(Terminator::Goto(crate::ids::BlockIdx::new(5))));
    let err = crate::validate::validate(&f).unwrap_err();
    assert!(matches!(err, crate::validate::MirValidationError::UnknownBlock { .. }));
}

#[test]
fn validator_rejects_static_assign_target() {
    let mut f = Function::new(vec![], u8_ty());
    let mut block = BasicBlock::new(Terminator::Return);
    block.statements.push(Statement::Assign {
        dst: LValue::new(Storage::Static(mirc_ty::SimplePath::local(vec![mirc_ty::Name::new("X")]))),
        src: RValue::Constant(Constant::Uint { value: 0, ty: u8_ty() }),
    });
    f.alloc_block(block);
    let err = crate::validate::validate(&f).unwrap_err();
    assert_eq!(err, crate::validate::MirValidationError::StaticAssignTarget);
}

#[test]
fn validator_rejects_incomplete_terminator() {
    let mut f = Function::new(vec![], u8_ty());
    f.alloc_block(BasicBlock::new(Terminator::Incomplete));
    let err = crate::validate::validate(&f).unwrap_err();
    assert_eq!(
        err,
        crate::validate::MirValidationError::IncompleteTerminator { block: crate::ids::BlockIdx::new(0) }
    );
}

#[test]
fn simplify_constants_folds_arithmetic_and_branches() {
    let mut f = Function::new(vec![], u8_ty());
    let local = f.alloc_local(u8_ty());
    let mut entry = BasicBlock::new(Terminator::Incomplete);
    entry.statements.push(Statement::Assign {
        dst: LValue::new(Storage::Local(local)),
        src: RValue::BinOp {
            l: Param::Constant(Constant::Uint { value: 1, ty: u8_ty() }),
            op: BinOp::Add,
            r: Param::Constant(Constant::Uint { value: 2, ty: u8_ty() }),
        },
    });
    let t_block = f.alloc_block(BasicBlock::new(Terminator::Return));
    let f_block = f.alloc_block(BasicBlock::new(Terminator::Diverge));
    entry.terminator = Terminator::If { cond: Param::Constant(Constant::Bool(true)), t: t_block, f: f_block };
    f.blocks[0] = entry;

    let changed = optimise::simplify_constants(&mut f);
    assert!(changed);
    match &f.blocks[0].statements[0] {
        Statement::Assign { src: RValue::Constant(Constant::Uint { value, .. }), .. } => assert_eq!(*value, 3),
        other => panic!("expected folded constant, got {:?}", other),
    }
    assert_eq!(f.blocks[0].terminator, Terminator::Goto(t_block));
}

#[test]
fn merge_goto_chains_collapses_empty_relay_blocks() {
    let mut f = Function::new(vec![], u8_ty());
    let target = f.alloc_block(BasicBlock::new(Terminator::Return));
    let relay = f.alloc_block(BasicBlock::new(Terminator::Goto(target)));
    f.alloc_block(BasicBlock::new(Terminator::Goto(relay)));

    let changed = optimise::merge_goto_chains(&mut f);
    assert!(changed);
    assert_eq!(f.blocks[2].terminator, Terminator::Goto(target));
}

#[test]
fn remove_unreachable_blocks_drops_blocks_no_predecessor_reaches() {
    let mut f = Function::new(vec![], u8_ty());
    f.alloc_block(BasicBlock::new(Terminator::Return));
    f.alloc_block(BasicBlock::new(Terminator::Diverge)); // unreachable
    assert_eq!(f.blocks.len(), 2);

    let changed = optimise::remove_unreachable_blocks(&mut f);
    assert!(changed);
    assert_eq!(f.blocks.len(), 1);
    assert_eq!(f.blocks[0].terminator, Terminator::Return);
}

#[test]
fn remove_unreachable_blocks_remaps_surviving_successors() {
    let mut f = Function::new(vec![], u8_ty());
    let keep_a = f.alloc_block(BasicBlock::new(Terminator::Incomplete));
    let dead = f.alloc_block(BasicBlock::new(Terminator::Return)); // will be removed
    let keep_b = f.alloc_block(BasicBlock::new(Terminator::Return));
    let _ = dead;
    f.blocks[keep_a.index()].terminator = Terminator::Goto(keep_b);

    let changed = optimise::remove_unreachable_blocks(&mut f);
    assert!(changed);
    assert_eq!(f.blocks.len(), 2);
    assert_eq!(f.blocks[0].terminator, Terminator::Goto(crate::ids::BlockIdx::new(1)));
}

#[test]
fn remove_unused_self_clause_keeps_locals_with_drop_glue() {
    let mut f = Function::new(vec![], u8_ty());
    let local = f.alloc_local(u8_ty());
    let mut block = BasicBlock::new(Terminator::Return);
    block.statements.push(Statement::ScopeEnd { locals: vec![local] });
    f.alloc_block(block);

    let changed = optimise::remove_unused_self_clause(&mut f, &AlwaysHasDropGlue);
    assert!(!changed);
    match &f.blocks[0].statements[0] {
        Statement::ScopeEnd { locals } => assert_eq!(locals, &vec![local]),
        _ => unreachable!(),
    }
}

#[test]
fn remove_unused_self_clause_drops_locals_without_drop_glue() {
    let mut f = Function::new(vec![], u8_ty());
    let local = f.alloc_local(u8_ty());
    let mut block = BasicBlock::new(Terminator::Return);
    block.statements.push(Statement::ScopeEnd { locals: vec![local] });
    f.alloc_block(block);

    let changed = optimise::remove_unused_self_clause(&mut f, &NeverHasDropGlue);
    assert!(changed);
    match &f.blocks[0].statements[0] {
        Statement::ScopeEnd { locals } => assert!(locals.is_empty()),
        _ => unreachable!(),
    }
}

#[test]
fn optimise_runs_to_a_fixed_point_and_revalidates() {
    let mut f = Function::new(vec![], bool_ty());
    let local = LocalIdx::new(0);
    let _ = f.alloc_local(bool_ty());
    let entry = f.alloc_block(BasicBlock::new(Terminator::Incomplete));
    let t_block = f.alloc_block(BasicBlock::new(Terminator::Return));
    let f_block = f.alloc_block(BasicBlock::new(Terminator::Diverge));
    assert_eq!(entry.index(), 0);

    f.blocks[entry.index()].statements.push(Statement::Assign {
        dst: LValue::new(Storage::Local(local)),
        src: RValue::Constant(Constant::Bool(true)),
    });
    f.blocks[entry.index()].terminator =
        Terminator::If { cond: Param::Constant(Constant::Bool(true)), t: t_block, f: f_block };

    let out = optimise::optimise(f, &AlwaysHasDropGlue, &AcceptAllBorrowChecker).expect("optimises cleanly");
    // The constant `If` folds to a `Goto`, and the now-unreachable `Diverge`
    // block is removed, leaving exactly the entry and its `Return` target.
    assert_eq!(out.blocks.len(), 2);
    assert_eq!(out.blocks[0].terminator, Terminator::Goto(crate::ids::BlockIdx::new(1)));
    assert_eq!(out.blocks[1].terminator, Terminator::Return);
}
