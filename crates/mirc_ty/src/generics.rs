//! `GenericParams` and bounds.

use crate::path::GenericPath;
use crate::types::{LifetimeRef, TypeRef};
use crate::Name;

#[derive(Clone, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub struct TypeParam {
    pub name: Name,
    pub default: Option<TypeRef>,
}

#[derive(Clone, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub struct ConstParam {
    pub name: Name,
    pub ty: TypeRef,
    pub default: Option<crate::types::ConstGeneric>,
}

/// A trait reference together with its associated-type bindings, e.g.
/// `Trait<Args, AssocType = U>`. Mirrors the source compiler's
/// `HIR::TraitPath`, which keeps the associated-type binding list alongside
/// the trait's own generic path (`assoc_list_t` in
/// `hir_typeck/resolve_common.hpp`).
#[derive(Clone, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub struct TraitPath {
    pub trait_: GenericPath,
    pub assoc_bindings: Vec<(Name, TypeRef)>,
}

impl TraitPath {
    pub fn simple(trait_: GenericPath) -> TraitPath {
        TraitPath { trait_, assoc_bindings: Vec::new() }
    }
}

/// One bound in a `GenericParams`' bound list.
#[derive(Clone, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub enum Bound {
    /// `a outlives b` (region bound between two lifetimes).
    Lifetime { long: LifetimeRef, short: LifetimeRef },
    /// `T outlives a`.
    TypeLifetime { ty: TypeRef, lifetime: LifetimeRef },
    /// `T : Trait<args, [AssocType = …]>`.
    TraitBound { ty: TypeRef, trait_path: TraitPath },
    /// `T = U`.
    TypeEquality { ty: TypeRef, other: TypeRef },
}

/// An ordered sequence of type parameters and const-generic parameters, plus
/// an ordered bound list.
#[derive(Clone, PartialEq, Eq, Debug, Hash, Default, PartialOrd, Ord)]
pub struct GenericParams {
    pub types: Vec<TypeParam>,
    pub consts: Vec<ConstParam>,
    pub bounds: Vec<Bound>,
}

impl GenericParams {
    pub fn empty() -> GenericParams {
        GenericParams::default()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.consts.is_empty()
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    pub fn const_count(&self) -> usize {
        self.consts.len()
    }
}
