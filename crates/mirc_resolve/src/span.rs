//! A minimal stand-in for the source-location/debug-info plumbing a real
//! front end would carry, which is out of scope for this workspace.
//! Resolver errors still need *something* to point at, so `Span` here is
//! reduced to the one piece every caller can supply without a real
//! source-location tracker: a short human-readable label (an item path, a
//! bound's textual form, …).

use std::fmt;

#[derive(Clone, PartialEq, Eq, Debug, Hash, Default)]
pub struct Span(pub String);

impl Span {
    pub fn new(label: impl Into<String>) -> Span {
        Span(label.into())
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
