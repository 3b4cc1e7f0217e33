//! The `Monomorphiser` abstraction: given a generic reference, return a
//! concrete type, const value, or lifetime. The `Cloner` (`cloner.rs`) is
//! generic over this trait so the same substitution machinery serves plain
//! monomorphisation, HRB instantiation, and (via [`crate::renumber`])
//! inlining.

use mirc_ty::{ConstGeneric, GenericGroup, GenericRef, LifetimeRef, PathParams, TypeRef};

pub trait Monomorphiser {
    fn get_type(&self, g: GenericRef) -> TypeRef;
    fn get_value(&self, g: GenericRef) -> ConstGeneric;
    fn get_lifetime(&self, g: GenericRef) -> LifetimeRef;
}

/// Returns every reference unchanged. Used when cloning a function body
/// with no substitution at all; a structural clone is then the identity.
pub struct Identity;

impl Monomorphiser for Identity {
    fn get_type(&self, g: GenericRef) -> TypeRef {
        TypeRef::Generic(g)
    }
    fn get_value(&self, g: GenericRef) -> ConstGeneric {
        ConstGeneric::Generic(g)
    }
    fn get_lifetime(&self, g: GenericRef) -> LifetimeRef {
        LifetimeRef::Generic(g)
    }
}

/// The four-slot monomorphiser used for a normal monomorphisation of a
/// method call: `Self`'s concrete type, the enclosing impl's generic
/// arguments, the method's own generic arguments, and any higher-ranked
/// binder arguments already resolved at the call site.
///
/// `GenericGroup::Placeholder` is the group `Self` is encoded under; it
/// always carries index 0 (there is exactly one `Self` per impl).
pub struct ImplMethodSelf {
    pub self_type: TypeRef,
    pub impl_params: PathParams,
    pub method_params: PathParams,
    pub hrb_params: PathParams,
}

impl ImplMethodSelf {
    fn params_for(&self, group: GenericGroup) -> &PathParams {
        match group {
            GenericGroup::Impl => &self.impl_params,
            GenericGroup::Item => &self.method_params,
            GenericGroup::Hrb => &self.hrb_params,
            GenericGroup::Placeholder => &self.impl_params, // unused for Self; see get_type override
        }
    }
}

impl Monomorphiser for ImplMethodSelf {
    fn get_type(&self, g: GenericRef) -> TypeRef {
        if g.group == GenericGroup::Placeholder {
            return self.self_type.clone();
        }
        self.params_for(g.group)
            .types
            .get(g.index as usize)
            .cloned()
            .unwrap_or_else(|| panic!("monomorphiser: no type bound for {:?}", g))
    }

    fn get_value(&self, g: GenericRef) -> ConstGeneric {
        if g.group == GenericGroup::Placeholder {
            panic!("monomorphiser: Self has no const-generic value");
        }
        self.params_for(g.group)
            .values
            .get(g.index as usize)
            .cloned()
            .unwrap_or_else(|| panic!("monomorphiser: no value bound for {:?}", g))
    }

    fn get_lifetime(&self, g: GenericRef) -> LifetimeRef {
        if g.group == GenericGroup::Placeholder {
            return LifetimeRef::Erased;
        }
        self.params_for(g.group)
            .lifetimes
            .get(g.index as usize)
            .cloned()
            .unwrap_or_else(|| panic!("monomorphiser: no lifetime bound for {:?}", g))
    }
}

/// Replaces only higher-ranked-binder references (`GenericGroup::Hrb`);
/// everything else passes through unchanged. Used when instantiating a
/// `for<'a> Fn(&'a T)`-style bound at a single call site without touching
/// the surrounding impl/method substitution already in effect.
pub struct HrbOnly {
    pub hrb_params: PathParams,
}

impl Monomorphiser for HrbOnly {
    fn get_type(&self, g: GenericRef) -> TypeRef {
        if g.group != GenericGroup::Hrb {
            return TypeRef::Generic(g);
        }
        self.hrb_params
            .types
            .get(g.index as usize)
            .cloned()
            .unwrap_or_else(|| panic!("hrb monomorphiser: no type bound for {:?}", g))
    }

    fn get_value(&self, g: GenericRef) -> ConstGeneric {
        if g.group != GenericGroup::Hrb {
            return ConstGeneric::Generic(g);
        }
        self.hrb_params
            .values
            .get(g.index as usize)
            .cloned()
            .unwrap_or_else(|| panic!("hrb monomorphiser: no value bound for {:?}", g))
    }

    fn get_lifetime(&self, g: GenericRef) -> LifetimeRef {
        if g.group != GenericGroup::Hrb {
            return LifetimeRef::Generic(g);
        }
        self.hrb_params
            .lifetimes
            .get(g.index as usize)
            .cloned()
            .unwrap_or_else(|| panic!("hrb monomorphiser: no lifetime bound for {:?}", g))
    }
}
