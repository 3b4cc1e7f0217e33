//! Paths and path parameters: simple paths, path parameters, generic
//! references, and the path forms that name items and associated types.

use crate::types::TypeRef;
use crate::Name;

/// `(crate_name, [component, …])`. An empty `crate_name` means "current
/// crate"; `mirc_arena::CRATE_BUILTINS` marks compiler-provided items.
#[derive(Clone, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub struct SimplePath {
    pub crate_name: Name,
    pub components: Vec<Name>,
}

impl SimplePath {
    pub fn new(crate_name: Name, components: Vec<Name>) -> SimplePath {
        SimplePath { crate_name, components }
    }

    pub fn local(components: Vec<Name>) -> SimplePath {
        SimplePath { crate_name: Name::empty(), components }
    }

    pub fn is_current_crate(&self) -> bool {
        self.crate_name.is_empty()
    }
}

/// The group a `GenericRef` is drawn from: which parameter list a `(group,
/// index)` pair is indexing into.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub enum GenericGroup {
    Impl,
    Item,
    Placeholder,
    Hrb,
}

/// `(group, index)`: identifies a single parameter slot when interpreting a
/// template. The `Monomorphiser` dispatches on `group`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub struct GenericRef {
    pub group: GenericGroup,
    pub index: u32,
}

impl GenericRef {
    pub fn new(group: GenericGroup, index: u32) -> GenericRef {
        GenericRef { group, index }
    }
}

/// Positional lists of type/const/lifetime arguments applied at a use site.
#[derive(Clone, PartialEq, Eq, Debug, Hash, Default, PartialOrd, Ord)]
pub struct PathParams {
    pub types: Vec<TypeRef>,
    pub values: Vec<crate::types::ConstGeneric>,
    pub lifetimes: Vec<crate::types::LifetimeRef>,
}

impl PathParams {
    pub fn empty() -> PathParams {
        PathParams::default()
    }

    pub fn new(types: Vec<TypeRef>) -> PathParams {
        PathParams { types, values: Vec::new(), lifetimes: Vec::new() }
    }

    pub fn m_types(&self) -> &[TypeRef] {
        &self.types
    }
    pub fn m_values(&self) -> &[crate::types::ConstGeneric] {
        &self.values
    }
    pub fn m_lifetimes(&self) -> &[crate::types::LifetimeRef] {
        &self.lifetimes
    }
}

/// A free item's fully-specified path: `SimplePath` plus the type/const/
/// lifetime arguments applied to it.
#[derive(Clone, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub struct GenericPath {
    pub path: SimplePath,
    pub params: PathParams,
}

impl GenericPath {
    pub fn new(path: SimplePath, params: PathParams) -> GenericPath {
        GenericPath { path, params }
    }

    pub fn no_params(path: SimplePath) -> GenericPath {
        GenericPath { path, params: PathParams::empty() }
    }
}

/// A path to an item, possibly qualified by the type of its receiver.
///
/// `UfcsUnknown` is a shorthand that must not survive past the resolver (R):
/// once a method call's trait has been determined, it is rewritten to
/// `UfcsKnown` (or `UfcsInherent`). The mangler (S) treats a surviving
/// `UfcsUnknown` as a fatal bug.
#[derive(Clone, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub enum Path {
    /// A free item: `Generic(SimplePath, PathParams)`.
    Generic(GenericPath),
    /// An inherent method: `(type, item_name, PathParams, impl_params)`.
    UfcsInherent { ty: Box<TypeRef>, item: Name, params: PathParams, impl_params: PathParams },
    /// A trait method with a known trait: `(type, trait_as_GenericPath, item_name, PathParams)`.
    UfcsKnown { ty: Box<TypeRef>, trait_: GenericPath, item: Name, params: PathParams },
    /// Shorthand awaiting resolution; must not survive past the resolver.
    UfcsUnknown { ty: Box<TypeRef>, item: Name, params: PathParams },
}

impl Path {
    pub fn is_ufcs_unknown(&self) -> bool {
        matches!(self, Path::UfcsUnknown { .. })
    }
}
