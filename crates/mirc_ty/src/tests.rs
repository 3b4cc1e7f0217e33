use crate::path::{GenericGroup, GenericPath, GenericRef, Path, PathParams, SimplePath};
use crate::primitive::Primitive;
use crate::types::{ArraySize, BorrowType, TypeRef};
use crate::Name;

fn simple(components: &[&str]) -> SimplePath {
    SimplePath::local(components.iter().map(|c| Name::new(c)).collect())
}

#[test]
fn ground_type_has_no_generics() {
    let u8_ty = TypeRef::Primitive(Primitive::U8);
    assert!(u8_ty.is_ground());

    let generic = TypeRef::Generic(GenericRef::new(GenericGroup::Item, 0));
    assert!(!generic.is_ground());

    let slice_of_generic = TypeRef::new_slice(generic.clone());
    assert!(!slice_of_generic.is_ground());

    let slice_of_u8 = TypeRef::new_slice(u8_ty.clone());
    assert!(slice_of_u8.is_ground());
}

#[test]
fn nominal_path_ground_depends_on_params() {
    let option_path = simple(&["option", "Option"]);
    let ground = TypeRef::new_path(Path::Generic(GenericPath::new(
        option_path.clone(),
        PathParams::new(vec![TypeRef::Primitive(Primitive::U8)]),
    )));
    assert!(ground.is_ground());

    let not_ground = TypeRef::new_path(Path::Generic(GenericPath::new(
        option_path,
        PathParams::new(vec![TypeRef::Generic(GenericRef::new(GenericGroup::Item, 0))]),
    )));
    assert!(!not_ground.is_ground());
}

#[test]
fn structural_equality_ignores_construction_path() {
    let a = TypeRef::new_borrow(BorrowType::Shared, TypeRef::new_slice(TypeRef::Primitive(Primitive::U8)));
    let b = TypeRef::Borrow {
        mutability: BorrowType::Shared,
        inner: Box::new(TypeRef::Slice(Box::new(TypeRef::Primitive(Primitive::U8)))),
    };
    assert_eq!(a, b);
}

#[test]
fn total_order_is_stable_and_distinguishes_tags() {
    let mut types = vec![
        TypeRef::Primitive(Primitive::Bool),
        TypeRef::new_unit(),
        TypeRef::Primitive(Primitive::U8),
        TypeRef::new_slice(TypeRef::Primitive(Primitive::U8)),
    ];
    let first_pass = {
        types.sort();
        types.clone()
    };
    let mut shuffled = vec![first_pass[3].clone(), first_pass[0].clone(), first_pass[2].clone(), first_pass[1].clone()];
    shuffled.sort();
    assert_eq!(shuffled, first_pass);
}

#[test]
fn array_size_distinguishes_known_from_generic() {
    let known = ArraySize::Known(4);
    let generic = ArraySize::Generic(GenericRef::new(GenericGroup::Item, 0));
    assert_ne!(known, generic);
    assert_eq!(known.as_known(), Some(4));
    assert_eq!(generic.as_known(), None);
}
