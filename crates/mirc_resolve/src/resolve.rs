//! The trait resolver core.

use std::cell::RefCell;

use rustc_hash::FxHashMap;

use mirc_db::HirDatabase;
use mirc_ty::{
    path::GenericGroup, Bound, GenericParams, GenericPath, GenericRef, Path, PathParams, TraitPath,
    TypeRef, TypeWalk,
};

use crate::anti_recursion::AntiRecursionStack;
use crate::error::{ResolveError, ResolveErrorKind, ResolveResult};
use crate::span::Span;

/// The result of a trait-bound query: `bool | unknown`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tristate {
    Yes,
    No,
    Unknown,
}

impl Tristate {
    pub fn is_yes(self) -> bool {
        self == Tristate::Yes
    }
}

/// A pre-calculated trait bound: the trait definition it names, plus every
/// associated-type binding attached to it at this bound (`<T as Trait>::A =
/// U` style constraints collected from the bound's own syntax).
#[derive(Clone, Debug)]
struct CachedBound {
    trait_path: GenericPath,
    assoc: Vec<(mirc_ty::Name, TypeRef)>,
}

/// Indexes in-scope bounds into a queryable form and answers `T : Trait`
/// and associated-type-projection queries against them, falling back to a
/// scan of crate impls and then a small built-in set.
pub struct TraitResolve<'a> {
    db: &'a dyn HirDatabase,
    impl_generics: Option<&'a GenericParams>,
    item_generics: Option<&'a GenericParams>,

    type_equalities: FxHashMap<TypeRef, TypeRef>,
    trait_bounds: FxHashMap<(TypeRef, mirc_ty::path::SimplePath), CachedBound>,

    recursion: RefCell<AntiRecursionStack<(TypeRef, mirc_ty::path::SimplePath)>>,
}

impl<'a> TraitResolve<'a> {
    pub fn new(
        db: &'a dyn HirDatabase,
        impl_generics: Option<&'a GenericParams>,
        item_generics: Option<&'a GenericParams>,
    ) -> TraitResolve<'a> {
        TraitResolve {
            db,
            impl_generics,
            item_generics,
            type_equalities: FxHashMap::default(),
            trait_bounds: FxHashMap::default(),
            recursion: RefCell::new(AntiRecursionStack::new()),
        }
    }

    pub fn has_self(&self) -> bool {
        self.impl_generics.is_some()
    }

    fn iterate_bounds(&self) -> impl Iterator<Item = &Bound> {
        // Item generics first, then impl generics; matches the source
        // resolver's own bound-iteration order in
        // `TraitResolveCommon::iterate_bounds`.
        let item = self.item_generics.into_iter().flat_map(|g| g.bounds.iter());
        let imp = self.impl_generics.into_iter().flat_map(|g| g.bounds.iter());
        item.chain(imp)
    }

    /// Scans all in-scope bounds and populates the type-equality and
    /// trait-bound indexes. Must be called once before any query method.
    pub fn prep_indexes(&mut self, sp: &Span) -> ResolveResult<()> {
        self.type_equalities.clear();
        self.trait_bounds.clear();

        let bounds: Vec<Bound> = self.iterate_bounds().cloned().collect();
        for bound in bounds {
            match bound {
                Bound::TraitBound { ty, trait_path } => {
                    self.add_trait_bound(sp, ty, trait_path, true)?;
                }
                Bound::TypeEquality { ty, other } => {
                    self.add_equality(ty, other);
                }
                Bound::Lifetime { .. } | Bound::TypeLifetime { .. } => {}
            }
        }
        Ok(())
    }

    fn add_equality(&mut self, long: TypeRef, short: TypeRef) {
        self.type_equalities.insert(long, short);
    }

    fn add_trait_bound(
        &mut self,
        sp: &Span,
        ty: TypeRef,
        trait_path: TraitPath,
        add_parents: bool,
    ) -> ResolveResult<()> {
        let trait_def = self
            .db
            .get_trait_by_path(&trait_path.trait_.path)
            .ok_or_else(|| {
                ResolveError::new(
                    sp.clone(),
                    ResolveErrorKind::UndeclaredItem { path: format!("{:?}", trait_path.trait_.path) },
                )
            })?;

        // Materialise defaults for any trailing trait parameters the bound
        // left unspecified, so index keys are always in canonical form.
        let mut params = trait_path.trait_.params.clone();
        for extra in trait_def.generics.types.iter().skip(params.types.len()) {
            match &extra.default {
                Some(default_ty) => params.types.push(default_ty.clone()),
                None => break,
            }
        }
        let canonical_trait_gp = GenericPath::new(trait_path.trait_.path.clone(), params);

        let key = (ty.clone(), canonical_trait_gp.path.clone());
        {
            let entry = self.trait_bounds.entry(key).or_insert_with(|| CachedBound {
                trait_path: canonical_trait_gp.clone(),
                assoc: Vec::new(),
            });
            for (name, aty) in &trait_path.assoc_bindings {
                entry.assoc.push((*name, aty.clone()));
            }
        }

        for (name, aty) in &trait_path.assoc_bindings {
            let projection = TypeRef::Nominal(Path::UfcsKnown {
                ty: Box::new(ty.clone()),
                trait_: canonical_trait_gp.clone(),
                item: *name,
                params: PathParams::empty(),
            });
            self.add_equality(projection, aty.clone());
        }

        if add_parents {
            let mut subst = FxHashMap::default();
            for (i, arg) in canonical_trait_gp.params.types.iter().enumerate() {
                subst.insert(GenericRef::new(GenericGroup::Item, i as u32), arg.clone());
            }
            for parent in trait_def.all_parents.clone() {
                let parent_params = PathParams::new(
                    parent.params.types.iter().map(|t| subst_generic_refs(t, &subst)).collect(),
                );
                let parent_gp = GenericPath::new(parent.path.clone(), parent_params);
                self.add_trait_bound(sp, ty.clone(), TraitPath::simple(parent_gp), false)?;
            }
        }
        Ok(())
    }

    /// Returns the declared type of a const generic given its `(group,
    /// index)` reference, looked up against the impl or item parameter
    /// list per `g.group`.
    pub fn get_const_param_type(&self, sp: &Span, g: GenericRef) -> ResolveResult<TypeRef> {
        let params = match g.group {
            GenericGroup::Impl => self.impl_generics,
            GenericGroup::Item => self.item_generics,
            GenericGroup::Placeholder | GenericGroup::Hrb => None,
        };
        let params = params.ok_or_else(|| {
            ResolveError::new(
                sp.clone(),
                ResolveErrorKind::BadConstParamBinding { group_len: 0, index: g.index },
            )
        })?;
        params
            .consts
            .get(g.index as usize)
            .map(|c| c.ty.clone())
            .ok_or_else(|| {
                ResolveError::new(
                    sp.clone(),
                    ResolveErrorKind::BadConstParamBinding {
                        group_len: params.consts.len(),
                        index: g.index,
                    },
                )
            })
    }

    /// Repeatedly rewrites any projection whose left-hand side is an index
    /// key until no rewrite applies. Bounded so a cyclic (ill-formed) index
    /// is reported rather than looping forever.
    pub fn expand_associated_types(&self, sp: &Span, ty: &TypeRef) -> ResolveResult<TypeRef> {
        const MAX_ITERS: usize = 64;
        let mut current = ty.clone();
        for _ in 0..MAX_ITERS {
            let mut changed = false;
            let equalities = &self.type_equalities;
            let next = current.clone().fold_types(&mut |t| match equalities.get(&t) {
                Some(repl) => {
                    changed = true;
                    repl.clone()
                }
                None => t,
            });
            if !changed {
                return Ok(next);
            }
            current = next;
        }
        Err(ResolveError::new(sp.clone(), ResolveErrorKind::UnresolvedProjection { ty: ty.clone() }))
    }

    /// `type_implements(Type, TraitPath) -> bool | unknown`.
    pub fn type_implements(
        &self,
        sp: &Span,
        ty: &TypeRef,
        trait_path: &GenericPath,
    ) -> ResolveResult<Tristate> {
        if let Some(cached) = self.trait_bounds.get(&(ty.clone(), trait_path.path.clone())) {
            if cached.trait_path.params == trait_path.params {
                return Ok(Tristate::Yes);
            }
        }

        // The stack only needs to be *open* for the duration of the scan
        // below; recursive queries reached through `try_impl` re-enter this
        // method and borrow it again, so the borrow must not span those
        // calls (a `RefCell` double-borrow would panic).
        let guard_key = (ty.clone(), trait_path.path.clone());
        {
            let mut stack = self.recursion.borrow_mut();
            if stack.is_in_progress(&guard_key) || stack.is_full() {
                return Ok(Tristate::Unknown);
            }
            stack.push_unchecked(guard_key.clone());
        }
        let result = self.type_implements_uncached(sp, ty, trait_path);
        self.recursion.borrow_mut().pop_unchecked();
        result
    }

    fn type_implements_uncached(
        &self,
        sp: &Span,
        ty: &TypeRef,
        trait_path: &GenericPath,
    ) -> ResolveResult<Tristate> {
        let mut candidates = Vec::new();
        self.db.find_trait_impls(&trait_path.path, ty, &mut |imp| {
            candidates.push(imp.clone());
            false
        });

        let mut yes_count = 0usize;
        let mut any_unknown = false;
        for imp in &candidates {
            match self.try_impl(sp, ty, trait_path, imp)? {
                Tristate::Yes => yes_count += 1,
                Tristate::Unknown => any_unknown = true,
                Tristate::No => {}
            }
        }

        if yes_count > 1 {
            return Err(ResolveError::new(
                sp.clone(),
                ResolveErrorKind::AmbiguousTraitSelection { ty: ty.clone(), trait_: trait_path.clone() },
            ));
        }
        if yes_count == 1 {
            return Ok(Tristate::Yes);
        }
        if any_unknown {
            return Ok(Tristate::Unknown);
        }

        Ok(match self.check_builtin(ty, trait_path) {
            Some(true) => Tristate::Yes,
            Some(false) | None => Tristate::No,
        })
    }

    fn try_impl(
        &self,
        sp: &Span,
        ty: &TypeRef,
        trait_path: &GenericPath,
        imp: &mirc_db::ImplDef,
    ) -> ResolveResult<Tristate> {
        let mut subst = FxHashMap::default();
        if !unify(&imp.self_ty, ty, &mut subst) {
            return Ok(Tristate::No);
        }
        if let Some(imp_trait_ref) = &imp.trait_ref {
            if imp_trait_ref.params.types.len() != trait_path.params.types.len() {
                return Ok(Tristate::No);
            }
            for (tmpl, concrete) in imp_trait_ref.params.types.iter().zip(&trait_path.params.types) {
                if !unify(tmpl, concrete, &mut subst) {
                    return Ok(Tristate::No);
                }
            }
        }

        let mut overall = Tristate::Yes;
        for bound in &imp.generics.bounds {
            if let Bound::TraitBound { ty: bound_ty, trait_path: bound_trait } = bound {
                let substituted_ty = subst_generic_refs(bound_ty, &subst);
                let substituted_params = PathParams::new(
                    bound_trait.trait_.params.types.iter().map(|t| subst_generic_refs(t, &subst)).collect(),
                );
                let substituted_trait = GenericPath::new(bound_trait.trait_.path.clone(), substituted_params);
                match self.type_implements(sp, &substituted_ty, &substituted_trait)? {
                    Tristate::No => return Ok(Tristate::No),
                    Tristate::Unknown => overall = Tristate::Unknown,
                    Tristate::Yes => {}
                }
            }
        }
        Ok(overall)
    }

    fn check_builtin(&self, ty: &TypeRef, trait_path: &GenericPath) -> Option<bool> {
        if Some(trait_path.path.clone()) == self.db.get_lang_item_path_opt("copy") {
            return Some(is_builtin_copy(ty));
        }
        if Some(trait_path.path.clone()) == self.db.get_lang_item_path_opt("sized") {
            return Some(is_builtin_sized(ty));
        }
        None
    }
}

fn subst_generic_refs(ty: &TypeRef, subst: &FxHashMap<GenericRef, TypeRef>) -> TypeRef {
    let mut out = ty.clone();
    out.walk_types_mut(&mut |t| {
        let replacement = match t {
            TypeRef::Generic(g) => subst.get(g).cloned(),
            _ => None,
        };
        if let Some(repl) = replacement {
            *t = repl;
        }
    });
    out
}

/// Structurally unifies `template` (which may contain `Generic(Impl, _)`
/// slots) against the concrete `target`, recording bindings in `subst`.
/// Returns `false` on any structural mismatch or inconsistent binding.
fn unify(template: &TypeRef, target: &TypeRef, subst: &mut FxHashMap<GenericRef, TypeRef>) -> bool {
    if let TypeRef::Generic(g) = template {
        if g.group == GenericGroup::Impl {
            return match subst.get(g) {
                Some(bound) => bound == target,
                None => {
                    subst.insert(*g, target.clone());
                    true
                }
            };
        }
    }
    match (template, target) {
        (TypeRef::Primitive(a), TypeRef::Primitive(b)) => a == b,
        (TypeRef::Generic(a), TypeRef::Generic(b)) => a == b,
        (TypeRef::Tuple(a), TypeRef::Tuple(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| unify(x, y, subst))
        }
        (TypeRef::Slice(a), TypeRef::Slice(b)) => unify(a, b, subst),
        (TypeRef::Array { inner: ai, size: asz }, TypeRef::Array { inner: bi, size: bsz }) => {
            unify(ai, bi, subst) && asz == bsz
        }
        (TypeRef::Borrow { mutability: am, inner: ai }, TypeRef::Borrow { mutability: bm, inner: bi }) => {
            am == bm && unify(ai, bi, subst)
        }
        (TypeRef::Pointer { mutability: am, inner: ai }, TypeRef::Pointer { mutability: bm, inner: bi }) => {
            am == bm && unify(ai, bi, subst)
        }
        (
            TypeRef::Function { abi: aa, args: aargs, ret: aret, is_unsafe: au },
            TypeRef::Function { abi: ba, args: bargs, ret: bret, is_unsafe: bu },
        ) => {
            aa == ba
                && au == bu
                && aargs.len() == bargs.len()
                && aargs.iter().zip(bargs).all(|(x, y)| unify(x, y, subst))
                && unify(aret, bret, subst)
        }
        (TypeRef::Nominal(Path::Generic(ap)), TypeRef::Nominal(Path::Generic(bp))) => {
            ap.path == bp.path
                && ap.params.types.len() == bp.params.types.len()
                && ap.params.types.iter().zip(&bp.params.types).all(|(x, y)| unify(x, y, subst))
        }
        _ => template == target,
    }
}

fn is_builtin_copy(ty: &TypeRef) -> bool {
    match ty {
        TypeRef::Primitive(p) => !matches!(p, mirc_ty::Primitive::Str),
        TypeRef::Tuple(tys) => tys.iter().all(is_builtin_copy),
        TypeRef::Array { inner, .. } => is_builtin_copy(inner),
        TypeRef::Borrow { mutability: mirc_ty::BorrowType::Shared, .. } => true,
        TypeRef::Pointer { .. } => true,
        _ => false,
    }
}

fn is_builtin_sized(ty: &TypeRef) -> bool {
    match ty {
        TypeRef::Primitive(mirc_ty::Primitive::Str) => false,
        TypeRef::Slice(_) => false,
        TypeRef::TraitObject { .. } => false,
        TypeRef::Tuple(tys) => tys.iter().all(is_builtin_sized),
        _ => true,
    }
}
