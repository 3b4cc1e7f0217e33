//! Small newtype indices into a `Function`'s argument/local/block/drop-flag
//! tables; the only cross-references in the model are paths (by value)
//! and indices within the enclosing function. Kept distinct so a
//! `BlockIdx` can never be passed where a `LocalIdx` is expected.

use std::fmt;

macro_rules! index_newtype {
    ($name:ident) => {
        #[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
        pub struct $name(pub u32);

        impl $name {
            pub fn new(raw: u32) -> $name {
                $name(raw)
            }
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

index_newtype!(ArgIdx);
index_newtype!(LocalIdx);
index_newtype!(BlockIdx);
index_newtype!(DropFlagIdx);
index_newtype!(VariantIdx);
