//! The symbol mangler: a deterministic, ASCII-only encoding from a ground
//! `Path` or `TypeRef` to a linker-safe symbol name.
//!
//! Every case the resolver and the monomorphising cloner are expected to
//! eliminate before codegen (inference variables, free
//! generic references, unresolved associated-type projections, a
//! surviving `Path::UfcsUnknown`) is a fatal [`MangleError`] here rather
//! than silently papered over: reaching the mangler with one of these
//! means an earlier stage has a bug.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use mirc_arena::Name;
use mirc_ty::{BorrowType, GenericPath, Path, PathParams, SimplePath, TypeRef};

/// An input could not be encoded. Each variant names the offending
/// construct; `Display` gives a human-readable bug report.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum MangleError {
    GenericReference,
    ErasedTypeWithoutOrigin,
    Closure,
    UfcsUnknown,
    MultipleSpecialNameChars(String),
}

impl fmt::Display for MangleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MangleError::GenericReference => {
                write!(f, "mangler reached a free generic reference outside monomorphisation")
            }
            MangleError::ErasedTypeWithoutOrigin => {
                write!(f, "mangler reached an erased-type placeholder with no origin path")
            }
            MangleError::Closure => write!(f, "mangler cannot encode a closure type"),
            MangleError::UfcsUnknown => {
                write!(f, "mangler reached an unresolved UfcsUnknown path")
            }
            MangleError::MultipleSpecialNameChars(name) => {
                write!(f, "name {:?} contains more than one '#' or '-'", name)
            }
        }
    }
}

impl std::error::Error for MangleError {}

pub type MangleResult<T> = Result<T, MangleError>;

/// Symbols longer than this are truncated and replaced with a hash
/// suffix: truncate at 128-9 bytes and append `$` plus a 64-bit hash.
const MAX_SYMBOL_LEN: usize = 128;
const TRUNCATED_PREFIX_LEN: usize = MAX_SYMBOL_LEN - 9;

/// Mangles a fully-resolved, ground `Path` (a function, static, or
/// associated item) into its linker symbol.
pub fn mangle_path(path: &Path) -> MangleResult<String> {
    let body = path_body(path)?;
    Ok(cap(format!("ZR{}", body)))
}

/// Mangles a bare, ground `TypeRef` (used for vtable/shim symbols that
/// name a type rather than an item).
pub fn mangle_type(ty: &TypeRef) -> MangleResult<String> {
    let body = type_body(ty)?;
    Ok(cap(format!("ZRT{}", body)))
}

fn path_body(path: &Path) -> MangleResult<String> {
    match path {
        Path::Generic(gp) => Ok(format!("G{}", generic_path_body(gp)?)),
        Path::UfcsInherent { ty, item, params, .. } => {
            Ok(format!("I{}{}{}", type_body(ty)?, name(item)?, path_params_body(params)?))
        }
        Path::UfcsKnown { ty, trait_, item, params } => Ok(format!(
            "Q{}{}{}{}",
            type_body(ty)?,
            generic_path_body(trait_)?,
            name(item)?,
            path_params_body(params)?
        )),
        Path::UfcsUnknown { .. } => Err(MangleError::UfcsUnknown),
    }
}

fn generic_path_body(gp: &GenericPath) -> MangleResult<String> {
    Ok(format!("{}{}", simple_path_body(&gp.path)?, path_params_body(&gp.params)?))
}

fn simple_path_body(path: &SimplePath) -> MangleResult<String> {
    let mut out = format!("{}c{}", path.components.len(), name(&path.crate_name)?);
    for component in &path.components {
        out.push_str(&name(component)?);
    }
    Ok(out)
}

fn path_params_body(params: &PathParams) -> MangleResult<String> {
    let mut out = format!("{}g", params.types.len());
    for ty in &params.types {
        out.push_str(&type_body(ty)?);
    }
    Ok(out)
}

fn type_body(ty: &TypeRef) -> MangleResult<String> {
    match ty {
        TypeRef::Primitive(p) => Ok(format!("C{}", p.mangle_code())),
        TypeRef::Generic(_) => Err(MangleError::GenericReference),
        TypeRef::Tuple(tys) => {
            let mut out = format!("T{}", tys.len());
            for t in tys {
                out.push_str(&type_body(t)?);
            }
            Ok(out)
        }
        TypeRef::Slice(inner) => Ok(format!("S{}", type_body(inner)?)),
        TypeRef::Array { inner, size } => {
            let n = size.as_known().ok_or(MangleError::GenericReference)?;
            Ok(format!("A{}{}", n, type_body(inner)?))
        }
        TypeRef::Borrow { mutability, inner } => {
            Ok(format!("B{}{}", borrow_code(*mutability), type_body(inner)?))
        }
        TypeRef::Pointer { mutability, inner } => {
            Ok(format!("P{}{}", borrow_code(*mutability), type_body(inner)?))
        }
        TypeRef::Function { abi, args, ret, is_unsafe } => {
            let mut out = String::from("F");
            if *is_unsafe {
                out.push('u');
            }
            let abi_str = abi.as_string();
            if !abi_str.is_empty() && abi_str != "Rust" {
                out.push('e');
                out.push_str(&name(abi)?);
            }
            out.push_str(&args.len().to_string());
            for arg in args {
                out.push_str(&type_body(arg)?);
            }
            out.push_str(&type_body(ret)?);
            Ok(out)
        }
        TypeRef::Nominal(path) => Ok(format!("N{}", path_body(path)?)),
        TypeRef::TraitObject { principal, markers, assoc_bounds } => {
            let mut out = format!("D{}", generic_path_body(principal)?);
            out.push_str(&assoc_bounds.len().to_string());
            for (_, aty) in assoc_bounds {
                out.push_str(&type_body(aty)?);
            }
            out.push_str(&markers.len().to_string());
            for marker in markers {
                out.push_str(&generic_path_body(marker)?);
            }
            Ok(out)
        }
        // No origin to fall back to is the only genuinely non-encodable
        // case; with one, the placeholder mangles as the nominal type its
        // origin path names; only *opaque* erased types with no nameable
        // origin are fatal, not ones we can still name.
        TypeRef::ErasedType { origin, .. } => {
            if origin.is_ufcs_unknown() {
                Err(MangleError::ErasedTypeWithoutOrigin)
            } else {
                Ok(format!("N{}", path_body(origin)?))
            }
        }
        TypeRef::Closure { .. } => Err(MangleError::Closure),
    }
}

fn borrow_code(mutability: BorrowType) -> char {
    match mutability {
        BorrowType::Shared => 's',
        BorrowType::Unique => 'u',
        BorrowType::Owned => 'o',
    }
}

/// A pure alphanumeric/underscore name mangles as `<len><bytes>`; a name
/// carrying exactly one compiler-introduced `#` or `-` mangles as
/// `h<len1><bytes1><len2><bytes2>`, the two halves either side of the
/// split character (the character itself is dropped, not encoded).
fn name(n: &Name) -> MangleResult<String> {
    let s = n.as_string();
    if s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Ok(format!("{}{}", s.len(), s));
    }
    let special_count = s.chars().filter(|&c| c == '#' || c == '-').count();
    if special_count != 1 {
        return Err(MangleError::MultipleSpecialNameChars(s));
    }
    let split_at = s.find(|c| c == '#' || c == '-').expect("special_count == 1");
    let (before, after) = (&s[..split_at], &s[split_at + 1..]);
    Ok(format!("h{}{}{}{}", before.len(), before, after.len(), after))
}

/// Applies the 128-byte length cap. Names are ASCII-only, so byte and
/// char indices coincide and a direct slice is safe.
fn cap(symbol: String) -> String {
    if symbol.len() <= MAX_SYMBOL_LEN {
        return symbol;
    }
    let mut hasher = DefaultHasher::new();
    symbol.hash(&mut hasher);
    let hash = hasher.finish() as u32;
    format!("{}${:08x}", &symbol[..TRUNCATED_PREFIX_LEN], hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mirc_ty::{ArraySize, Primitive};

    fn n(s: &str) -> Name {
        Name::new(s)
    }

    #[test]
    fn option_generic_path_mangles_per_worked_example() {
        // `::"core"::option::Option` with no type params.
        let simple = SimplePath::new(n("core"), vec![n("option"), n("Option")]);
        let gp = GenericPath::no_params(simple);
        let path = Path::Generic(gp);
        assert_eq!(mangle_path(&path).unwrap(), "ZRG2c4core6option6Option0g");
    }

    #[test]
    fn tuple_type_mangles_per_worked_example() {
        let ty = TypeRef::Tuple(vec![
            TypeRef::Primitive(Primitive::U8),
            TypeRef::Primitive(Primitive::I32),
        ]);
        assert_eq!(mangle_type(&ty).unwrap(), "ZRTT2CaCf");
    }

    #[test]
    fn borrow_of_slice_of_u8_mangles_per_worked_example() {
        let ty = TypeRef::new_borrow(
            BorrowType::Shared,
            TypeRef::new_slice(TypeRef::Primitive(Primitive::U8)),
        );
        assert_eq!(mangle_type(&ty).unwrap(), "ZRTBsSCa");
    }

    #[test]
    fn array_of_known_size_mangles_with_its_length() {
        let ty = TypeRef::new_array(TypeRef::Primitive(Primitive::U8), ArraySize::Known(4));
        assert_eq!(mangle_type(&ty).unwrap(), "ZRTA4Ca");
    }

    #[test]
    fn name_with_hash_splits_around_it() {
        assert_eq!(name(&n("foo#1")).unwrap(), "h3foo11");
    }

    #[test]
    fn name_with_dash_splits_around_it() {
        assert_eq!(name(&n("bar-0")).unwrap(), "h3bar10");
    }

    #[test]
    fn name_with_two_special_chars_is_an_error() {
        assert!(matches!(
            name(&n("a#b#c")),
            Err(MangleError::MultipleSpecialNameChars(_))
        ));
    }

    #[test]
    fn free_generic_reference_is_non_encodable() {
        let ty = TypeRef::Generic(mirc_ty::GenericRef::new(mirc_ty::GenericGroup::Item, 0));
        assert_eq!(mangle_type(&ty), Err(MangleError::GenericReference));
    }

    #[test]
    fn closure_is_non_encodable() {
        let origin = Path::Generic(GenericPath::no_params(SimplePath::local(vec![n("f")])));
        let ty = TypeRef::Closure { origin };
        assert_eq!(mangle_type(&ty), Err(MangleError::Closure));
    }

    #[test]
    fn ufcs_unknown_path_is_non_encodable() {
        let path = Path::UfcsUnknown {
            ty: Box::new(TypeRef::Primitive(Primitive::U8)),
            item: n("frobnicate"),
            params: PathParams::empty(),
        };
        assert_eq!(mangle_path(&path), Err(MangleError::UfcsUnknown));
    }

    #[test]
    fn overlong_symbol_is_truncated_and_hashed() {
        let components: Vec<Name> = (0..40).map(|i| n(&format!("component{}", i))).collect();
        let simple = SimplePath::new(n("krate"), components);
        let path = Path::Generic(GenericPath::no_params(simple));
        let mangled = mangle_path(&path).unwrap();
        assert_eq!(mangled.len(), MAX_SYMBOL_LEN);
        assert!(mangled.contains('$'));
    }
}
