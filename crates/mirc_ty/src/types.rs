//! `TypeRef` and its satellite types.

use crate::path::{GenericPath, GenericRef, Path};
use crate::primitive::Primitive;
use crate::Name;

/// Shared (`&T`), unique (`&mut T`), or owned (`Box<T>`); the same three
/// variants apply to both borrows and raw pointers.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub enum BorrowType {
    Shared,
    Unique,
    Owned,
}

/// An array's element count: a concrete number, a generic reference (const
/// generic), or an unevaluated expression. Expression evaluation belongs to
/// the excluded front end, so `Unevaluated` only ever carries an opaque
/// label for display/debugging.
#[derive(Clone, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub enum ArraySize {
    Known(u64),
    Generic(GenericRef),
    Unevaluated(Name),
}

impl ArraySize {
    pub fn as_known(&self) -> Option<u64> {
        match self {
            ArraySize::Known(n) => Some(*n),
            _ => None,
        }
    }
}

/// A const-generic argument or const-generic parameter reference appearing
/// in a `PathParams`. Evaluation of a named constant is, like array-size
/// expressions, delegated to the excluded const-evaluator; this model only
/// needs to carry values that are already fully evaluated, a reference to a
/// generic slot, or an opaque "refer to this named const" placeholder.
#[derive(Clone, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub enum ConstGeneric {
    Evaluated { bytes: Vec<u8> },
    Generic(GenericRef),
    Unevaluated(Path),
}

/// Lifetimes are tracked structurally (so types compare/order correctly) but
/// not given borrow-check semantics here: borrow-checking is an external
/// precondition this model only needs to represent, not enforce.
#[derive(Clone, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub enum LifetimeRef {
    Static,
    Named(Name),
    Generic(GenericRef),
    /// Produced by lifetime elision in the excluded front end; carries no
    /// further information here.
    Erased,
}

/// A type. Tagged sum over every type-former this model represents. Two
/// types are equal iff
/// their structural encodings are equal after interning of identifiers and
/// crate names (derived `PartialEq`/`Eq` give exactly this, since `Name` is
/// itself an interned handle). Ordering is lexicographic on the tag (derive
/// order follows declaration order) then the payload (derived `Ord`
/// recurses field-by-field), so it is stable across builds; no iteration
/// order or pointer identity is ever consulted.
#[derive(Clone, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub enum TypeRef {
    Primitive(Primitive),
    Generic(GenericRef),
    Tuple(Vec<TypeRef>),
    Slice(Box<TypeRef>),
    Array { inner: Box<TypeRef>, size: ArraySize },
    Borrow { mutability: BorrowType, inner: Box<TypeRef> },
    Pointer { mutability: BorrowType, inner: Box<TypeRef> },
    Function { abi: Name, args: Vec<TypeRef>, ret: Box<TypeRef>, is_unsafe: bool },
    /// `(principal_trait, marker_traits, assoc_bounds)`.
    TraitObject { principal: GenericPath, markers: Vec<GenericPath>, assoc_bounds: Vec<(Name, TypeRef)> },
    /// A struct/enum/union/etc. use site.
    Nominal(Path),
    /// An opaque erased-type placeholder (`impl Trait`) with its origin path.
    ErasedType { origin: Path, bounds: Vec<GenericPath> },
    /// A closure or generator's opaque type; not encodable by the mangler.
    Closure { origin: Path },
}

impl TypeRef {
    pub fn new_slice(inner: TypeRef) -> TypeRef {
        TypeRef::Slice(Box::new(inner))
    }

    pub fn new_array(inner: TypeRef, size: ArraySize) -> TypeRef {
        TypeRef::Array { inner: Box::new(inner), size }
    }

    pub fn new_borrow(mutability: BorrowType, inner: TypeRef) -> TypeRef {
        TypeRef::Borrow { mutability, inner: Box::new(inner) }
    }

    pub fn new_pointer(mutability: BorrowType, inner: TypeRef) -> TypeRef {
        TypeRef::Pointer { mutability, inner: Box::new(inner) }
    }

    pub fn new_path(path: Path) -> TypeRef {
        TypeRef::Nominal(path)
    }

    pub fn new_tuple(inner: Vec<TypeRef>) -> TypeRef {
        TypeRef::Tuple(inner)
    }

    pub fn new_unit() -> TypeRef {
        TypeRef::Tuple(Vec::new())
    }

    pub fn bool_() -> TypeRef {
        TypeRef::Primitive(Primitive::Bool)
    }

    pub fn never() -> TypeRef {
        TypeRef::Primitive(Primitive::Never)
    }

    pub fn usize_() -> TypeRef {
        TypeRef::Primitive(Primitive::Usize)
    }

    /// A type is *ground* when it contains no generic references nor
    /// erased-type placeholders.
    pub fn is_ground(&self) -> bool {
        match self {
            TypeRef::Primitive(_) => true,
            TypeRef::Generic(_) => false,
            TypeRef::ErasedType { .. } => false,
            TypeRef::Closure { .. } => true,
            TypeRef::Tuple(tys) => tys.iter().all(TypeRef::is_ground),
            TypeRef::Slice(inner) => inner.is_ground(),
            TypeRef::Array { inner, size } => {
                inner.is_ground() && !matches!(size, ArraySize::Generic(_))
            }
            TypeRef::Borrow { inner, .. } | TypeRef::Pointer { inner, .. } => inner.is_ground(),
            TypeRef::Function { args, ret, .. } => {
                args.iter().all(TypeRef::is_ground) && ret.is_ground()
            }
            TypeRef::TraitObject { principal, markers, assoc_bounds } => {
                principal.params.types.iter().all(TypeRef::is_ground)
                    && markers.iter().all(|m| m.params.types.iter().all(TypeRef::is_ground))
                    && assoc_bounds.iter().all(|(_, t)| t.is_ground())
            }
            TypeRef::Nominal(Path::Generic(gp)) => gp.params.types.iter().all(TypeRef::is_ground),
            TypeRef::Nominal(_) => false,
        }
    }

    pub fn as_primitive(&self) -> Option<Primitive> {
        match self {
            TypeRef::Primitive(p) => Some(*p),
            _ => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&[TypeRef]> {
        match self {
            TypeRef::Tuple(tys) => Some(tys),
            _ => None,
        }
    }

    pub fn as_nominal(&self) -> Option<&Path> {
        match self {
            TypeRef::Nominal(p) => Some(p),
            _ => None,
        }
    }
}
