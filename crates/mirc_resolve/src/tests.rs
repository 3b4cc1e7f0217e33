use mirc_db::test_db::TestDatabase;
use mirc_db::ImplDef;
use mirc_ty::{
    Bound, ConstParam, GenericGroup, GenericParams, GenericPath, GenericRef, Name, Path,
    PathParams, Primitive, SimplePath, TraitPath, TypeParam, TypeRef,
};

use crate::{ResolveErrorKind, Span, TraitResolve, Tristate};

fn path(component: &str) -> SimplePath {
    SimplePath::local(vec![Name::new(component)])
}

fn sp() -> Span {
    Span::new("test")
}

#[test]
fn direct_bound_is_satisfied() {
    let mut db = TestDatabase::new();
    db.add_trait(path("Clone"), GenericParams::empty(), Vec::new(), Vec::new());

    let t = TypeRef::Generic(GenericRef::new(GenericGroup::Item, 0));
    let item_generics = GenericParams {
        types: vec![TypeParam { name: Name::new("T"), default: None }],
        consts: Vec::new(),
        bounds: vec![Bound::TraitBound {
            ty: t.clone(),
            trait_path: TraitPath::simple(GenericPath::no_params(path("Clone"))),
        }],
    };

    let mut resolver = TraitResolve::new(&db, None, Some(&item_generics));
    resolver.prep_indexes(&sp()).unwrap();

    let result = resolver.type_implements(&sp(), &t, &GenericPath::no_params(path("Clone"))).unwrap();
    assert_eq!(result, Tristate::Yes);
}

#[test]
fn unrelated_bound_is_not_satisfied() {
    let db = TestDatabase::new();
    let mut resolver = TraitResolve::new(&db, None, None);
    resolver.prep_indexes(&sp()).unwrap();

    let result = resolver
        .type_implements(&sp(), &TypeRef::usize_(), &GenericPath::no_params(path("Nope")))
        .unwrap();
    assert_eq!(result, Tristate::No);
}

#[test]
fn crate_impl_is_found_by_unification() {
    let mut db = TestDatabase::new();
    db.add_trait(path("Foo"), GenericParams::empty(), Vec::new(), Vec::new());
    db.add_impl(ImplDef {
        generics: GenericParams::empty(),
        self_ty: TypeRef::Primitive(Primitive::U8),
        trait_ref: Some(GenericPath::no_params(path("Foo"))),
        assoc_type_bindings: Vec::new(),
    });

    let mut resolver = TraitResolve::new(&db, None, None);
    resolver.prep_indexes(&sp()).unwrap();

    let foo = GenericPath::no_params(path("Foo"));
    assert_eq!(
        resolver.type_implements(&sp(), &TypeRef::Primitive(Primitive::U8), &foo).unwrap(),
        Tristate::Yes
    );
    assert_eq!(
        resolver.type_implements(&sp(), &TypeRef::Primitive(Primitive::U16), &foo).unwrap(),
        Tristate::No
    );
}

#[test]
fn ambiguous_impls_are_rejected() {
    let mut db = TestDatabase::new();
    db.add_trait(path("Foo"), GenericParams::empty(), Vec::new(), Vec::new());
    for _ in 0..2 {
        db.add_impl(ImplDef {
            generics: GenericParams::empty(),
            self_ty: TypeRef::Primitive(Primitive::U8),
            trait_ref: Some(GenericPath::no_params(path("Foo"))),
            assoc_type_bindings: Vec::new(),
        });
    }

    let mut resolver = TraitResolve::new(&db, None, None);
    resolver.prep_indexes(&sp()).unwrap();

    let err = resolver
        .type_implements(&sp(), &TypeRef::Primitive(Primitive::U8), &GenericPath::no_params(path("Foo")))
        .unwrap_err();
    assert!(matches!(err.kind, ResolveErrorKind::AmbiguousTraitSelection { .. }));
}

#[test]
fn associated_type_projection_expands_and_is_idempotent() {
    let mut db = TestDatabase::new();
    db.add_trait(path("Iterator"), GenericParams::empty(), Vec::new(), vec![Name::new("Item")]);

    let i_ty = TypeRef::Generic(GenericRef::new(GenericGroup::Item, 0));
    let iterator_trait = GenericPath::no_params(path("Iterator"));
    let item_generics = GenericParams {
        types: vec![TypeParam { name: Name::new("I"), default: None }],
        consts: Vec::new(),
        bounds: vec![Bound::TraitBound {
            ty: i_ty.clone(),
            trait_path: TraitPath {
                trait_: iterator_trait.clone(),
                assoc_bindings: vec![(Name::new("Item"), TypeRef::Primitive(Primitive::U8))],
            },
        }],
    };

    let mut resolver = TraitResolve::new(&db, None, Some(&item_generics));
    resolver.prep_indexes(&sp()).unwrap();

    let projection = TypeRef::Nominal(Path::UfcsKnown {
        ty: Box::new(i_ty),
        trait_: iterator_trait,
        item: Name::new("Item"),
        params: PathParams::empty(),
    });

    let expanded = resolver.expand_associated_types(&sp(), &projection).unwrap();
    assert_eq!(expanded, TypeRef::Primitive(Primitive::U8));

    // Expanding an already-ground type is a no-op: a second pass must
    // return exactly what the first one did.
    let expanded_again = resolver.expand_associated_types(&sp(), &expanded).unwrap();
    assert_eq!(expanded_again, expanded);
}

#[test]
fn adding_a_bound_never_invalidates_an_existing_answer() {
    // Adding a new bound to the resolver's index should never change an
    // existing successful query result, only grow the set of answerable
    // queries. `T : Clone` holds both before and after `T : Send` joins
    // the same item's bound list.
    let mut db = TestDatabase::new();
    db.add_trait(path("Clone"), GenericParams::empty(), Vec::new(), Vec::new());
    db.add_trait(path("Send"), GenericParams::empty(), Vec::new(), Vec::new());

    let t = TypeRef::Generic(GenericRef::new(GenericGroup::Item, 0));
    let clone_bound = Bound::TraitBound {
        ty: t.clone(),
        trait_path: TraitPath::simple(GenericPath::no_params(path("Clone"))),
    };

    let narrow_generics = GenericParams {
        types: vec![TypeParam { name: Name::new("T"), default: None }],
        consts: Vec::new(),
        bounds: vec![clone_bound.clone()],
    };
    let mut narrow = TraitResolve::new(&db, None, Some(&narrow_generics));
    narrow.prep_indexes(&sp()).unwrap();
    let before =
        narrow.type_implements(&sp(), &t, &GenericPath::no_params(path("Clone"))).unwrap();
    assert_eq!(before, Tristate::Yes);

    let wider_generics = GenericParams {
        types: narrow_generics.types.clone(),
        consts: Vec::new(),
        bounds: vec![
            clone_bound,
            Bound::TraitBound {
                ty: t.clone(),
                trait_path: TraitPath::simple(GenericPath::no_params(path("Send"))),
            },
        ],
    };
    let mut wider = TraitResolve::new(&db, None, Some(&wider_generics));
    wider.prep_indexes(&sp()).unwrap();
    let after = wider.type_implements(&sp(), &t, &GenericPath::no_params(path("Clone"))).unwrap();
    assert_eq!(after, before);
    let newly_answerable =
        wider.type_implements(&sp(), &t, &GenericPath::no_params(path("Send"))).unwrap();
    assert_eq!(newly_answerable, Tristate::Yes);
}

#[test]
fn const_param_type_lookup() {
    let db = TestDatabase::new();
    let item_generics = GenericParams {
        types: Vec::new(),
        consts: vec![ConstParam { name: Name::new("N"), ty: TypeRef::usize_(), default: None }],
        bounds: Vec::new(),
    };
    let resolver = TraitResolve::new(&db, None, Some(&item_generics));

    let ty = resolver.get_const_param_type(&sp(), GenericRef::new(GenericGroup::Item, 0)).unwrap();
    assert_eq!(ty, TypeRef::usize_());

    let err = resolver.get_const_param_type(&sp(), GenericRef::new(GenericGroup::Item, 5)).unwrap_err();
    assert!(matches!(err.kind, ResolveErrorKind::BadConstParamBinding { .. }));
}
