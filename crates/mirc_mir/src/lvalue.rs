//! `LValue`: `(storage, wrappers)`.

use mirc_ty::SimplePath;

use crate::ids::{ArgIdx, LocalIdx, VariantIdx};

/// Where an lvalue's root sits: the return slot, a named argument, a local,
/// or process-wide static storage.
#[derive(Clone, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub enum Storage {
    Return,
    Argument(ArgIdx),
    Local(LocalIdx),
    Static(SimplePath),
}

/// Applied left-to-right on top of `Storage` to reach a sub-place.
#[derive(Clone, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub enum Wrapper {
    Field(u32),
    Deref,
    /// Indexes with the value of another local (which must be an unsigned
    /// integer local).
    Index(LocalIdx),
    Downcast(VariantIdx),
}

#[derive(Clone, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub struct LValue {
    pub storage: Storage,
    pub wrappers: Vec<Wrapper>,
}

impl LValue {
    pub fn new(storage: Storage) -> LValue {
        LValue { storage, wrappers: Vec::new() }
    }

    pub fn field(mut self, idx: u32) -> LValue {
        self.wrappers.push(Wrapper::Field(idx));
        self
    }

    pub fn deref(mut self) -> LValue {
        self.wrappers.push(Wrapper::Deref);
        self
    }

    pub fn index(mut self, local: LocalIdx) -> LValue {
        self.wrappers.push(Wrapper::Index(local));
        self
    }

    pub fn downcast(mut self, variant: VariantIdx) -> LValue {
        self.wrappers.push(Wrapper::Downcast(variant));
        self
    }
}
