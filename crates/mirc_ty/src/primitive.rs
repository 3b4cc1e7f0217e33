//! The fixed set of primitive types: the integer widths, the floats,
//! `bool`, `char`, `str`, and `never`.

/// A primitive type. Unlike `ra_hir_ty::TypeCtor::Int(Uncertain<IntTy>)` this
/// model has no "uncertain" integer-literal variant: literal-type inference
/// is an external, excluded concern handled by a type checker this
/// workspace does not implement.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub enum Primitive {
    Bool,
    Char,
    Str,
    Never,
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    U128,
    I128,
    Usize,
    Isize,
    F32,
    F64,
}

impl Primitive {
    /// The single-letter mangling code used by the symbol mangler.
    pub fn mangle_code(self) -> char {
        match self {
            Primitive::U8 => 'a',
            Primitive::I8 => 'b',
            Primitive::U16 => 'c',
            Primitive::I16 => 'd',
            Primitive::U32 => 'e',
            Primitive::I32 => 'f',
            Primitive::U64 => 'g',
            Primitive::I64 => 'h',
            Primitive::U128 => 'i',
            Primitive::I128 => 'j',
            Primitive::F32 => 'n',
            Primitive::F64 => 'o',
            Primitive::Usize => 'u',
            Primitive::Isize => 'v',
            Primitive::Bool => 'w',
            Primitive::Char => 'x',
            Primitive::Str => 'y',
            Primitive::Never => 'z',
        }
    }

    pub fn is_integer(self) -> bool {
        matches!(
            self,
            Primitive::U8
                | Primitive::I8
                | Primitive::U16
                | Primitive::I16
                | Primitive::U32
                | Primitive::I32
                | Primitive::U64
                | Primitive::I64
                | Primitive::U128
                | Primitive::I128
                | Primitive::Usize
                | Primitive::Isize
        )
    }

    pub fn is_unsigned(self) -> bool {
        matches!(
            self,
            Primitive::U8
                | Primitive::U16
                | Primitive::U32
                | Primitive::U64
                | Primitive::U128
                | Primitive::Usize
        )
    }

    pub fn is_float(self) -> bool {
        matches!(self, Primitive::F32 | Primitive::F64)
    }
}
