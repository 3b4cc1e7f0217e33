//! The HIR query surface. The resolver and the cloner take an immutable
//! reference to the crate HIR through the `HirDatabase` trait defined
//! here; the lexer/parser, macro expander and name-resolution pass that
//! build a real HIR are out of scope, so this crate models only the
//! read-only query surface those phases would populate, plus (in
//! `test_db`) a minimal in-memory implementation used by the other
//! crates' test suites.

pub mod test_db;

use std::sync::Arc;

use mirc_ty::{GenericParams, GenericPath, Name, SimplePath, TypeRef};

/// Options accepted by the by-path lookup queries. The real compiler's
/// lookups are parameterised by visibility/import rules from the excluded
/// name-resolution pass; we keep a single toggle (`public_only`) as the
/// stand-in for "the caller asked for a visibility-filtered lookup".
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct LookupOpts {
    pub public_only: bool,
}

/// A trait definition as seen by the resolver: its own generics, its
/// pre-computed *all-parents* list (every super-trait, transitively, in a
/// fixed order so super-trait walking stays single-pass), and the
/// canonical order of its associated types (relied on by the mangler,
/// which omits ATY names from its encoding since their order is guaranteed
/// by the trait's canonical ATY list).
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TraitDef {
    pub path: SimplePath,
    pub generics: GenericParams,
    pub all_parents: Vec<GenericPath>,
    pub assoc_types: Vec<Name>,
}

/// An `impl` block: a candidate considered by `type_implements` (R) and
/// named (as a caller-supplied enumeration target) by `find_trait_impls`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ImplDef {
    pub generics: GenericParams,
    pub self_ty: TypeRef,
    /// `None` for an inherent impl.
    pub trait_ref: Option<GenericPath>,
    pub assoc_type_bindings: Vec<(Name, TypeRef)>,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TypeItem {
    pub path: SimplePath,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ValItem {
    pub path: SimplePath,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct MacroItem {
    pub path: SimplePath,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ModuleDef {
    pub path: SimplePath,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ExternCrate {
    pub name: Name,
}

/// The read-only query surface the resolver/cloner/mangler are allowed to
/// consume. Every method here corresponds to one required lookup a crate's
/// HIR must answer.
pub trait HirDatabase {
    fn get_trait_by_path(&self, path: &SimplePath) -> Option<Arc<TraitDef>>;

    fn get_typeitem_by_path(&self, path: &SimplePath, opts: LookupOpts) -> Option<Arc<TypeItem>>;
    fn get_valitem_by_path(&self, path: &SimplePath, opts: LookupOpts) -> Option<Arc<ValItem>>;
    fn get_macroitem_by_path(&self, path: &SimplePath, opts: LookupOpts) -> Option<Arc<MacroItem>>;

    /// Enumerate candidate impls of `trait_` for `self_ty`-shaped queries;
    /// `cb` returns `true` to stop enumeration early (a match was accepted).
    /// Returns `true` iff some candidate made `cb` return `true`.
    fn find_trait_impls(
        &self,
        trait_: &SimplePath,
        self_ty: &TypeRef,
        cb: &mut dyn FnMut(&ImplDef) -> bool,
    ) -> bool;

    /// Optional lookup of a well-known lang item path (`Copy`, `Clone`,
    /// `Drop`, `Sized`, `Unsize`, the `Fn` family, `Box`, `PhantomData`,
    /// `Generator`, `DiscriminantKind`/`Pointee`/`DynMetadata`).
    fn get_lang_item_path_opt(&self, name: &str) -> Option<SimplePath>;

    fn extern_crate(&self, name: Name) -> Option<Arc<ExternCrate>>;

    fn get_mod_by_path(&self, path: &SimplePath, opts: LookupOpts) -> Option<Arc<ModuleDef>>;
}
