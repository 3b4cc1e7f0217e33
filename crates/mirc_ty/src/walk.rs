//! Generic tree-walking over types, used by the resolver's associated-type
//! expansion and the cloner's substitution pass. Modelled on
//! `ra_hir_ty::TypeWalk`, adapted from its De Bruijn-indexed `Ty::Bound`
//! substitution scheme to this model's `(group, index)` `GenericRef`s,
//! which need no binder-depth bookkeeping: a `GenericRef` always names an
//! absolute slot in one of a fixed set of parameter lists, not a relative
//! binder.

use crate::path::{GenericPath, Path, PathParams};
use crate::types::TypeRef;

/// Allows walking structures that contain types to inspect or rewrite those
/// types, similar to `ra_hir_ty::TypeWalk` (itself modelled on Chalk's
/// `Fold`).
pub trait TypeWalk {
    fn walk_types(&self, f: &mut dyn FnMut(&TypeRef));
    fn walk_types_mut(&mut self, f: &mut dyn FnMut(&mut TypeRef));

    fn fold_types(mut self, f: &mut dyn FnMut(TypeRef) -> TypeRef) -> Self
    where
        Self: Sized,
    {
        self.walk_types_mut(&mut |ty| {
            let taken = std::mem::replace(ty, TypeRef::new_unit());
            *ty = f(taken);
        });
        self
    }
}

impl TypeWalk for TypeRef {
    fn walk_types(&self, f: &mut dyn FnMut(&TypeRef)) {
        match self {
            TypeRef::Primitive(_) | TypeRef::Generic(_) | TypeRef::Closure { .. } => {}
            TypeRef::Tuple(tys) => {
                for t in tys {
                    t.walk_types(f);
                }
            }
            TypeRef::Slice(inner) => inner.walk_types(f),
            TypeRef::Array { inner, .. } => inner.walk_types(f),
            TypeRef::Borrow { inner, .. } | TypeRef::Pointer { inner, .. } => inner.walk_types(f),
            TypeRef::Function { args, ret, .. } => {
                for a in args {
                    a.walk_types(f);
                }
                ret.walk_types(f);
            }
            TypeRef::TraitObject { principal, markers, assoc_bounds } => {
                principal.walk_types(f);
                for m in markers {
                    m.walk_types(f);
                }
                for (_, t) in assoc_bounds {
                    t.walk_types(f);
                }
            }
            TypeRef::Nominal(p) => p.walk_types(f),
            TypeRef::ErasedType { bounds, .. } => {
                for b in bounds {
                    b.walk_types(f);
                }
            }
        }
        f(self);
    }

    fn walk_types_mut(&mut self, f: &mut dyn FnMut(&mut TypeRef)) {
        match self {
            TypeRef::Primitive(_) | TypeRef::Generic(_) | TypeRef::Closure { .. } => {}
            TypeRef::Tuple(tys) => {
                for t in tys {
                    t.walk_types_mut(f);
                }
            }
            TypeRef::Slice(inner) => inner.walk_types_mut(f),
            TypeRef::Array { inner, .. } => inner.walk_types_mut(f),
            TypeRef::Borrow { inner, .. } | TypeRef::Pointer { inner, .. } => {
                inner.walk_types_mut(f)
            }
            TypeRef::Function { args, ret, .. } => {
                for a in args {
                    a.walk_types_mut(f);
                }
                ret.walk_types_mut(f);
            }
            TypeRef::TraitObject { principal, markers, assoc_bounds } => {
                principal.walk_types_mut(f);
                for m in markers {
                    m.walk_types_mut(f);
                }
                for (_, t) in assoc_bounds {
                    t.walk_types_mut(f);
                }
            }
            TypeRef::Nominal(p) => p.walk_types_mut(f),
            TypeRef::ErasedType { bounds, .. } => {
                for b in bounds {
                    b.walk_types_mut(f);
                }
            }
        }
        f(self);
    }
}

impl TypeWalk for PathParams {
    fn walk_types(&self, f: &mut dyn FnMut(&TypeRef)) {
        for t in &self.types {
            t.walk_types(f);
        }
    }
    fn walk_types_mut(&mut self, f: &mut dyn FnMut(&mut TypeRef)) {
        for t in &mut self.types {
            t.walk_types_mut(f);
        }
    }
}

impl TypeWalk for GenericPath {
    fn walk_types(&self, f: &mut dyn FnMut(&TypeRef)) {
        self.params.walk_types(f);
    }
    fn walk_types_mut(&mut self, f: &mut dyn FnMut(&mut TypeRef)) {
        self.params.walk_types_mut(f);
    }
}

impl TypeWalk for Path {
    fn walk_types(&self, f: &mut dyn FnMut(&TypeRef)) {
        match self {
            Path::Generic(gp) => gp.walk_types(f),
            Path::UfcsInherent { ty, params, impl_params, .. } => {
                ty.walk_types(f);
                params.walk_types(f);
                impl_params.walk_types(f);
            }
            Path::UfcsKnown { ty, trait_, params, .. } => {
                ty.walk_types(f);
                trait_.walk_types(f);
                params.walk_types(f);
            }
            Path::UfcsUnknown { ty, params, .. } => {
                ty.walk_types(f);
                params.walk_types(f);
            }
        }
    }

    fn walk_types_mut(&mut self, f: &mut dyn FnMut(&mut TypeRef)) {
        match self {
            Path::Generic(gp) => gp.walk_types_mut(f),
            Path::UfcsInherent { ty, params, impl_params, .. } => {
                ty.walk_types_mut(f);
                params.walk_types_mut(f);
                impl_params.walk_types_mut(f);
            }
            Path::UfcsKnown { ty, trait_, params, .. } => {
                ty.walk_types_mut(f);
                trait_.walk_types_mut(f);
                params.walk_types_mut(f);
            }
            Path::UfcsUnknown { ty, params, .. } => {
                ty.walk_types_mut(f);
                params.walk_types_mut(f);
            }
        }
    }
}
