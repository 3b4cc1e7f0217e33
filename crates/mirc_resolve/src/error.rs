//! Resolver failure modes.

use std::fmt;

use mirc_ty::{GenericPath, TypeRef};

use crate::span::Span;

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ResolveErrorKind {
    /// A bound or query named a trait/item the query surface has no entry
    /// for at all, as opposed to one that resolves but has no applicable
    /// impl: the surface could not even start indexing the bound.
    UndeclaredItem { path: String },
    /// More than one candidate impl applied with no tie-break.
    AmbiguousTraitSelection { ty: TypeRef, trait_: GenericPath },
    /// Associated-type expansion hit a cycle, or a projection had no
    /// matching impl to normalise it.
    UnresolvedProjection { ty: TypeRef },
    /// A const-generic parameter reference pointed outside its group's
    /// parameter list.
    BadConstParamBinding { group_len: usize, index: u32 },
    /// A const generic's declared type cannot be decoded from its
    /// `Evaluated` byte literal; currently just `str`, which is rejected
    /// outright rather than given a best-effort decoding.
    UnsupportedConstGenericType { ty: TypeRef },
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ResolveError {
    pub span: Span,
    pub kind: ResolveErrorKind,
}

impl ResolveError {
    pub fn new(span: Span, kind: ResolveErrorKind) -> ResolveError {
        ResolveError { span, kind }
    }
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ResolveErrorKind::UndeclaredItem { path } => {
                write!(f, "{}: undeclared item '{}'", self.span, path)
            }
            ResolveErrorKind::AmbiguousTraitSelection { ty, trait_ } => {
                write!(f, "{}: ambiguous selection for {:?} : {:?}", self.span, ty, trait_)
            }
            ResolveErrorKind::UnresolvedProjection { ty } => {
                write!(f, "{}: unresolved associated-type projection {:?}", self.span, ty)
            }
            ResolveErrorKind::BadConstParamBinding { group_len, index } => {
                write!(f, "{}: const parameter index {} out of bounds (len {})", self.span, index, group_len)
            }
            ResolveErrorKind::UnsupportedConstGenericType { ty } => {
                write!(f, "{}: const generic of type {:?} cannot be decoded", self.span, ty)
            }
        }
    }
}

impl std::error::Error for ResolveError {}

pub type ResolveResult<T> = Result<T, ResolveError>;
