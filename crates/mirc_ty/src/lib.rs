//! The type model (T): types, paths, generic parameters and bounds. This is
//! the vocabulary every other component in the crate family speaks; it owns
//! no inference (that's an external, excluded concern) and carries enough
//! information to be compared structurally, which the resolver (R) and the
//! monomorphising cloner (C) rely on for map keys and memoisation.

pub mod generics;
pub mod path;
pub mod primitive;
pub mod types;
pub mod walk;

#[cfg(test)]
mod tests;

pub use generics::{Bound, ConstParam, GenericParams, TraitPath, TypeParam};
pub use mirc_arena::Name;
pub use path::{GenericGroup, GenericPath, GenericRef, Path, PathParams, SimplePath};
pub use primitive::Primitive;
pub use types::{ArraySize, BorrowType, ConstGeneric, LifetimeRef, TypeRef};
pub use walk::TypeWalk;
