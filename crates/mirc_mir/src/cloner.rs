//! The monomorphising `Cloner`. Produces a new `Function` from an existing
//! one under a [`Monomorphiser`] substitution, an optional [`TraitResolve`]
//! (the only point at which associated types are forced to ground), and a
//! [`RenumberMaps`] for the block/local/drop-flag tables.

use mirc_resolve::{ResolveError, ResolveErrorKind, ResolveResult, Span, TraitResolve};
use mirc_ty::{ArraySize, ConstGeneric, GenericPath, LifetimeRef, Name, Path, PathParams, TypeRef};

use crate::constant::Constant;
use crate::endianness::Endianness;
use crate::function::{BasicBlock, Function};
use crate::ids::{ArgIdx, LocalIdx};
use crate::lvalue::{LValue, Storage, Wrapper};
use crate::monomorphiser::Monomorphiser;
use crate::operand::Param;
use crate::renumber::RenumberMaps;
use crate::rvalue::RValue;
use crate::statement::{AsmParam, Statement};
use crate::terminator::{CallTarget, Terminator};

pub struct Cloner<'a> {
    mono: &'a dyn Monomorphiser,
    resolver: Option<&'a TraitResolve<'a>>,
    endianness: Endianness,
}

impl<'a> Cloner<'a> {
    pub fn new(mono: &'a dyn Monomorphiser, resolver: Option<&'a TraitResolve<'a>>, endianness: Endianness) -> Cloner<'a> {
        Cloner { mono, resolver, endianness }
    }

    pub fn clone_function(&self, sp: &Span, f: &Function, maps: &RenumberMaps) -> ResolveResult<Function> {
        let mut new_args = Vec::with_capacity(f.args.len());
        let mut extra_locals: Vec<(LocalIdx, TypeRef)> = Vec::new();
        for (i, ty) in f.args.iter().enumerate() {
            let substituted = self.subst_type(sp, ty)?;
            match maps.argument(ArgIdx::new(i as u32)) {
                None => new_args.push(substituted),
                Some(dst_local) => extra_locals.push((dst_local, substituted)),
            }
        }
        let new_ret_ty = self.subst_type(sp, &f.ret_ty)?;

        let mut local_slots: Vec<Option<TypeRef>> = Vec::new();
        for (dst, ty) in extra_locals {
            place(&mut local_slots, dst.index(), ty);
        }
        for (i, ty) in f.locals.iter().enumerate() {
            let substituted = self.subst_type(sp, ty)?;
            let dst = maps.local(LocalIdx::new(i as u32));
            place(&mut local_slots, dst.index(), substituted);
        }
        let new_locals: Vec<TypeRef> =
            local_slots.into_iter().map(|slot| slot.unwrap_or_else(TypeRef::new_unit)).collect();

        let mut flag_slots: Vec<Option<bool>> = Vec::new();
        for (i, flag) in f.drop_flags.iter().enumerate() {
            let dst = maps.drop_flag(crate::ids::DropFlagIdx::new(i as u32));
            place(&mut flag_slots, dst.index(), *flag);
        }
        let new_drop_flags: Vec<bool> = flag_slots.into_iter().map(|s| s.unwrap_or(false)).collect();

        let mut block_slots: Vec<Option<BasicBlock>> = Vec::new();
        for (i, block) in f.blocks.iter().enumerate() {
            let new_block = self.clone_block(sp, maps, block)?;
            let dst = maps.block(crate::ids::BlockIdx::new(i as u32));
            place(&mut block_slots, dst.index(), new_block);
        }
        let new_blocks: Vec<BasicBlock> = block_slots
            .into_iter()
            .map(|slot| slot.unwrap_or_else(|| BasicBlock::new(Terminator::Incomplete)))
            .collect();

        Ok(Function { args: new_args, ret_ty: new_ret_ty, locals: new_locals, drop_flags: new_drop_flags, blocks: new_blocks })
    }

    fn clone_block(&self, sp: &Span, maps: &RenumberMaps, block: &BasicBlock) -> ResolveResult<BasicBlock> {
        let mut statements = Vec::with_capacity(block.statements.len());
        for stmt in &block.statements {
            statements.push(self.subst_statement(sp, maps, stmt)?);
        }
        let terminator = self.subst_terminator(sp, maps, &block.terminator)?;
        Ok(BasicBlock { statements, terminator })
    }

    fn subst_type(&self, sp: &Span, ty: &TypeRef) -> ResolveResult<TypeRef> {
        let substituted = raw_subst_type(self.mono, self.endianness, ty);
        match self.resolver {
            Some(r) => r.expand_associated_types(sp, &substituted),
            None => Ok(substituted),
        }
    }

    fn subst_generic_path(&self, sp: &Span, gp: &GenericPath) -> ResolveResult<GenericPath> {
        Ok(GenericPath::new(gp.path.clone(), self.subst_path_params(sp, &gp.params)?))
    }

    fn subst_path_params(&self, sp: &Span, pp: &PathParams) -> ResolveResult<PathParams> {
        let mut types = Vec::with_capacity(pp.types.len());
        for t in &pp.types {
            types.push(self.subst_type(sp, t)?);
        }
        let values = pp.values.iter().map(|v| self.subst_const_generic(v)).collect::<Vec<_>>();
        let lifetimes = pp.lifetimes.iter().map(|l| subst_lifetime(self.mono, l)).collect();
        Ok(PathParams { types, values, lifetimes })
    }

    fn subst_const_generic(&self, cg: &ConstGeneric) -> ConstGeneric {
        match cg {
            ConstGeneric::Generic(g) => self.mono.get_value(*g),
            ConstGeneric::Evaluated { bytes } => ConstGeneric::Evaluated { bytes: bytes.clone() },
            ConstGeneric::Unevaluated(p) => {
                ConstGeneric::Unevaluated(raw_subst_path(self.mono, self.endianness, p))
            }
        }
    }

    fn subst_path(&self, sp: &Span, path: &Path) -> ResolveResult<Path> {
        Ok(match path {
            Path::Generic(gp) => Path::Generic(self.subst_generic_path(sp, gp)?),
            Path::UfcsInherent { ty, item, params, impl_params } => Path::UfcsInherent {
                ty: Box::new(self.subst_type(sp, ty)?),
                item: *item,
                params: self.subst_path_params(sp, params)?,
                impl_params: self.subst_path_params(sp, impl_params)?,
            },
            Path::UfcsKnown { ty, trait_, item, params } => Path::UfcsKnown {
                ty: Box::new(self.subst_type(sp, ty)?),
                trait_: self.subst_generic_path(sp, trait_)?,
                item: *item,
                params: self.subst_path_params(sp, params)?,
            },
            Path::UfcsUnknown { ty, item, params } => Path::UfcsUnknown {
                ty: Box::new(self.subst_type(sp, ty)?),
                item: *item,
                params: self.subst_path_params(sp, params)?,
            },
        })
    }

    fn subst_constant(&self, sp: &Span, c: &Constant) -> ResolveResult<Constant> {
        Ok(match c {
            Constant::Int { value, ty } => Constant::Int { value: *value, ty: self.subst_type(sp, ty)? },
            Constant::Uint { value, ty } => Constant::Uint { value: *value, ty: self.subst_type(sp, ty)? },
            Constant::Float { bits, ty } => Constant::Float { bits: *bits, ty: self.subst_type(sp, ty)? },
            Constant::Bool(b) => Constant::Bool(*b),
            Constant::Bytes(b) => Constant::Bytes(b.clone()),
            Constant::StaticString(s) => Constant::StaticString(s.clone()),
            Constant::Const(gp) => Constant::Const(self.subst_generic_path(sp, gp)?),
            Constant::Generic(g) => self.decode_const_generic(sp, *g)?,
            Constant::Function(gp) => Constant::Function(self.subst_generic_path(sp, gp)?),
            Constant::ItemAddr(None) => Constant::ItemAddr(None),
            Constant::ItemAddr(Some(gp)) => Constant::ItemAddr(Some(self.subst_generic_path(sp, gp)?)),
        })
    }

    /// If the monomorphiser yields an `Evaluated` literal, decode it to the
    /// concrete MIR constant matching the parameter's declared type.
    /// Declared types are only knowable with a resolver attached
    /// (via `get_const_param_type`); with none, an `Evaluated` value passes
    /// through as an opaque byte constant.
    fn decode_const_generic(&self, sp: &Span, g: mirc_ty::GenericRef) -> ResolveResult<Constant> {
        match self.mono.get_value(g) {
            ConstGeneric::Generic(g2) => Ok(Constant::Generic(g2)),
            ConstGeneric::Unevaluated(p) => match raw_subst_path(self.mono, self.endianness, &p) {
                Path::Generic(gp) => Ok(Constant::Const(gp)),
                // A UFCS-qualified unevaluated const (e.g. `<T as Trait>::CONST`)
                // has no `Constant` shape of its own; surviving evaluation of
                // it is delegated to the excluded const-evaluator, so it is
                // carried through as an opaque placeholder here.
                _ => Ok(Constant::Bytes(Vec::new())),
            },
            ConstGeneric::Evaluated { bytes } => {
                let resolver = match self.resolver {
                    Some(r) => r,
                    None => return Ok(Constant::Bytes(bytes)),
                };
                let ty = resolver.get_const_param_type(sp, g)?;
                decode_evaluated(sp, &bytes, &ty, self.endianness)
            }
        }
    }

    fn subst_param(&self, sp: &Span, maps: &RenumberMaps, p: &Param) -> ResolveResult<Param> {
        Ok(match p {
            Param::LValue(l) => Param::LValue(remap_lvalue(maps, l)),
            Param::Borrow(bt, l) => Param::Borrow(*bt, remap_lvalue(maps, l)),
            Param::Constant(c) => Param::Constant(self.subst_constant(sp, c)?),
        })
    }

    fn subst_rvalue(&self, sp: &Span, maps: &RenumberMaps, rv: &RValue) -> ResolveResult<RValue> {
        Ok(match rv {
            RValue::Use(p) => RValue::Use(self.subst_param(sp, maps, p)?),
            RValue::Constant(c) => RValue::Constant(self.subst_constant(sp, c)?),
            RValue::SizedArray { val, count } => {
                RValue::SizedArray { val: self.subst_param(sp, maps, val)?, count: self.subst_array_size(count) }
            }
            RValue::Borrow { ty, is_raw, lval } => {
                RValue::Borrow { ty: *ty, is_raw: *is_raw, lval: remap_lvalue(maps, lval) }
            }
            RValue::Cast { val, ty } => RValue::Cast { val: self.subst_param(sp, maps, val)?, ty: self.subst_type(sp, ty)? },
            RValue::BinOp { l, op, r } => {
                RValue::BinOp { l: self.subst_param(sp, maps, l)?, op: *op, r: self.subst_param(sp, maps, r)? }
            }
            RValue::UniOp { val, op } => RValue::UniOp { val: self.subst_param(sp, maps, val)?, op: *op },
            RValue::DstMeta { val } => RValue::DstMeta { val: self.subst_param(sp, maps, val)? },
            RValue::DstPtr { val } => RValue::DstPtr { val: self.subst_param(sp, maps, val)? },
            RValue::MakeDst { ptr, meta } => {
                RValue::MakeDst { ptr: self.subst_param(sp, maps, ptr)?, meta: self.subst_param(sp, maps, meta)? }
            }
            RValue::Tuple { vals } => RValue::Tuple { vals: self.subst_params(sp, maps, vals)? },
            RValue::Array { vals } => RValue::Array { vals: self.subst_params(sp, maps, vals)? },
            RValue::UnionVariant { path, idx, val } => RValue::UnionVariant {
                path: self.subst_generic_path(sp, path)?,
                idx: *idx,
                val: self.subst_param(sp, maps, val)?,
            },
            RValue::EnumVariant { path, idx, vals } => RValue::EnumVariant {
                path: self.subst_generic_path(sp, path)?,
                idx: *idx,
                vals: self.subst_params(sp, maps, vals)?,
            },
            RValue::Struct { path, vals } => {
                RValue::Struct { path: self.subst_generic_path(sp, path)?, vals: self.subst_params(sp, maps, vals)? }
            }
        })
    }

    fn subst_params(&self, sp: &Span, maps: &RenumberMaps, vals: &[Param]) -> ResolveResult<Vec<Param>> {
        vals.iter().map(|p| self.subst_param(sp, maps, p)).collect()
    }

    fn subst_array_size(&self, size: &ArraySize) -> ArraySize {
        match size {
            ArraySize::Known(n) => ArraySize::Known(*n),
            ArraySize::Unevaluated(n) => ArraySize::Unevaluated(*n),
            ArraySize::Generic(g) => match self.mono.get_value(*g) {
                ConstGeneric::Generic(g2) => ArraySize::Generic(g2),
                ConstGeneric::Evaluated { bytes } => ArraySize::Known(self.endianness.read_u128(&bytes) as u64),
                ConstGeneric::Unevaluated(_) => ArraySize::Unevaluated(Name::new("<unevaluated>")),
            },
        }
    }

    fn subst_statement(&self, sp: &Span, maps: &RenumberMaps, stmt: &Statement) -> ResolveResult<Statement> {
        Ok(match stmt {
            Statement::Assign { dst, src } => {
                Statement::Assign { dst: remap_lvalue(maps, dst), src: self.subst_rvalue(sp, maps, src)? }
            }
            Statement::Asm { lines, inputs, outputs, clobbers } => Statement::Asm {
                lines: lines.clone(),
                inputs: inputs.iter().map(|(n, l)| (n.clone(), remap_lvalue(maps, l))).collect(),
                outputs: outputs.iter().map(|(n, l)| (n.clone(), remap_lvalue(maps, l))).collect(),
                clobbers: clobbers.clone(),
            },
            Statement::Asm2 { options, lines, params } => {
                let mut new_params = Vec::with_capacity(params.len());
                for p in params {
                    new_params.push(match p {
                        AsmParam::Sym(gp) => AsmParam::Sym(self.subst_generic_path(sp, gp)?),
                        AsmParam::Const(c) => AsmParam::Const(self.subst_constant(sp, c)?),
                        AsmParam::Reg { spec, input, output } => AsmParam::Reg {
                            spec: spec.clone(),
                            input: input.as_ref().map(|l| remap_lvalue(maps, l)),
                            output: output.as_ref().map(|l| remap_lvalue(maps, l)),
                        },
                    });
                }
                Statement::Asm2 { options: options.clone(), lines: lines.clone(), params: new_params }
            }
            Statement::SetDropFlag { idx, new, other } => Statement::SetDropFlag {
                idx: maps.drop_flag(*idx),
                new: *new,
                other: other.map(|o| maps.drop_flag(o)),
            },
            Statement::SaveDropFlag { idx } => Statement::SaveDropFlag { idx: maps.drop_flag(*idx) },
            Statement::LoadDropFlag { idx } => Statement::LoadDropFlag { idx: maps.drop_flag(*idx) },
            Statement::Drop { slot, kind, flag_idx } => Statement::Drop {
                slot: remap_lvalue(maps, slot),
                kind: *kind,
                flag_idx: flag_idx.map(|f| maps.drop_flag(f)),
            },
            Statement::ScopeEnd { locals } => {
                Statement::ScopeEnd { locals: locals.iter().map(|l| maps.local(*l)).collect() }
            }
        })
    }

    fn subst_terminator(&self, sp: &Span, maps: &RenumberMaps, term: &Terminator) -> ResolveResult<Terminator> {
        Ok(match term {
            Terminator::Incomplete => Terminator::Incomplete,
            Terminator::Return => Terminator::Return,
            Terminator::Diverge => Terminator::Diverge,
            Terminator::Goto(b) => Terminator::Goto(maps.block(*b)),
            Terminator::Panic { dst } => Terminator::Panic { dst: maps.block(*dst) },
            Terminator::If { cond, t, f } => {
                Terminator::If { cond: self.subst_param(sp, maps, cond)?, t: maps.block(*t), f: maps.block(*f) }
            }
            Terminator::Switch { val, targets } => {
                Terminator::Switch { val: remap_lvalue(maps, val), targets: targets.iter().map(|b| maps.block(*b)).collect() }
            }
            Terminator::SwitchValue { val, default, targets, values } => Terminator::SwitchValue {
                val: self.subst_param(sp, maps, val)?,
                default: maps.block(*default),
                targets: targets.iter().map(|b| maps.block(*b)).collect(),
                values: values.clone(),
            },
            Terminator::Call { ret_bb, panic_bb, dst, target, args } => Terminator::Call {
                ret_bb: maps.block(*ret_bb),
                panic_bb: maps.block(*panic_bb),
                dst: remap_lvalue(maps, dst),
                target: match target {
                    CallTarget::Value(l) => CallTarget::Value(remap_lvalue(maps, l)),
                    CallTarget::Path(gp) => CallTarget::Path(self.subst_generic_path(sp, gp)?),
                    CallTarget::Intrinsic(name, params) => {
                        CallTarget::Intrinsic(*name, self.subst_path_params(sp, params)?)
                    }
                },
                args: self.subst_params(sp, maps, args)?,
            },
        })
    }
}

fn place<T>(slots: &mut Vec<Option<T>>, index: usize, value: T) {
    if slots.len() <= index {
        slots.resize_with(index + 1, || None);
    }
    slots[index] = Some(value);
}

fn remap_lvalue(maps: &RenumberMaps, lval: &LValue) -> LValue {
    let storage = match &lval.storage {
        Storage::Return => Storage::Return,
        Storage::Local(l) => Storage::Local(maps.local(*l)),
        Storage::Argument(a) => match maps.argument(*a) {
            Some(local) => Storage::Local(local),
            None => Storage::Argument(*a),
        },
        Storage::Static(p) => Storage::Static(p.clone()),
    };
    let wrappers = lval
        .wrappers
        .iter()
        .map(|w| match w {
            Wrapper::Field(i) => Wrapper::Field(*i),
            Wrapper::Deref => Wrapper::Deref,
            Wrapper::Index(l) => Wrapper::Index(maps.local(*l)),
            Wrapper::Downcast(v) => Wrapper::Downcast(*v),
        })
        .collect();
    LValue { storage, wrappers }
}

fn subst_lifetime(mono: &dyn Monomorphiser, l: &LifetimeRef) -> LifetimeRef {
    match l {
        LifetimeRef::Generic(g) => mono.get_lifetime(*g),
        other => other.clone(),
    }
}

fn raw_subst_type(mono: &dyn Monomorphiser, endianness: Endianness, ty: &TypeRef) -> TypeRef {
    match ty {
        TypeRef::Primitive(p) => TypeRef::Primitive(*p),
        TypeRef::Generic(g) => mono.get_type(*g),
        TypeRef::Tuple(tys) => TypeRef::Tuple(tys.iter().map(|t| raw_subst_type(mono, endianness, t)).collect()),
        TypeRef::Slice(inner) => TypeRef::new_slice(raw_subst_type(mono, endianness, inner)),
        TypeRef::Array { inner, size } => {
            let new_inner = raw_subst_type(mono, endianness, inner);
            let new_size = match size {
                ArraySize::Generic(g) => match mono.get_value(*g) {
                    ConstGeneric::Generic(g2) => ArraySize::Generic(g2),
                    ConstGeneric::Evaluated { bytes } => {
                        ArraySize::Known(endianness.read_u128(&bytes) as u64)
                    }
                    ConstGeneric::Unevaluated(_) => ArraySize::Unevaluated(Name::new("<unevaluated>")),
                },
                other => other.clone(),
            };
            TypeRef::new_array(new_inner, new_size)
        }
        TypeRef::Borrow { mutability, inner } => {
            TypeRef::new_borrow(*mutability, raw_subst_type(mono, endianness, inner))
        }
        TypeRef::Pointer { mutability, inner } => {
            TypeRef::new_pointer(*mutability, raw_subst_type(mono, endianness, inner))
        }
        TypeRef::Function { abi, args, ret, is_unsafe } => TypeRef::Function {
            abi: *abi,
            args: args.iter().map(|a| raw_subst_type(mono, endianness, a)).collect(),
            ret: Box::new(raw_subst_type(mono, endianness, ret)),
            is_unsafe: *is_unsafe,
        },
        TypeRef::TraitObject { principal, markers, assoc_bounds } => TypeRef::TraitObject {
            principal: raw_subst_generic_path(mono, endianness, principal),
            markers: markers.iter().map(|m| raw_subst_generic_path(mono, endianness, m)).collect(),
            assoc_bounds: assoc_bounds.iter().map(|(n, t)| (*n, raw_subst_type(mono, endianness, t))).collect(),
        },
        TypeRef::Nominal(p) => TypeRef::Nominal(raw_subst_path(mono, endianness, p)),
        TypeRef::ErasedType { origin, bounds } => TypeRef::ErasedType {
            origin: raw_subst_path(mono, endianness, origin),
            bounds: bounds.iter().map(|b| raw_subst_generic_path(mono, endianness, b)).collect(),
        },
        TypeRef::Closure { origin } => TypeRef::Closure { origin: raw_subst_path(mono, endianness, origin) },
    }
}

fn raw_subst_generic_path(mono: &dyn Monomorphiser, endianness: Endianness, gp: &GenericPath) -> GenericPath {
    GenericPath::new(gp.path.clone(), raw_subst_path_params(mono, endianness, &gp.params))
}

fn raw_subst_path_params(mono: &dyn Monomorphiser, endianness: Endianness, pp: &PathParams) -> PathParams {
    PathParams {
        types: pp.types.iter().map(|t| raw_subst_type(mono, endianness, t)).collect(),
        values: pp.values.iter().map(|v| match v {
            ConstGeneric::Generic(g) => mono.get_value(*g),
            other => other.clone(),
        }).collect(),
        lifetimes: pp.lifetimes.iter().map(|l| subst_lifetime(mono, l)).collect(),
    }
}

fn raw_subst_path(mono: &dyn Monomorphiser, endianness: Endianness, path: &Path) -> Path {
    match path {
        Path::Generic(gp) => Path::Generic(raw_subst_generic_path(mono, endianness, gp)),
        Path::UfcsInherent { ty, item, params, impl_params } => Path::UfcsInherent {
            ty: Box::new(raw_subst_type(mono, endianness, ty)),
            item: *item,
            params: raw_subst_path_params(mono, endianness, params),
            impl_params: raw_subst_path_params(mono, endianness, impl_params),
        },
        Path::UfcsKnown { ty, trait_, item, params } => Path::UfcsKnown {
            ty: Box::new(raw_subst_type(mono, endianness, ty)),
            trait_: raw_subst_generic_path(mono, endianness, trait_),
            item: *item,
            params: raw_subst_path_params(mono, endianness, params),
        },
        Path::UfcsUnknown { ty, item, params } => Path::UfcsUnknown {
            ty: Box::new(raw_subst_type(mono, endianness, ty)),
            item: *item,
            params: raw_subst_path_params(mono, endianness, params),
        },
    }
}

/// Decodes an `Evaluated` const-generic literal to the MIR constant
/// matching its declared (necessarily primitive) type. `str` const
/// generics have no fixed-width byte decoding and are rejected outright.
fn decode_evaluated(sp: &Span, bytes: &[u8], ty: &TypeRef, endianness: Endianness) -> ResolveResult<Constant> {
    use mirc_ty::Primitive;
    let prim = match ty.as_primitive() {
        Some(p) => p,
        None => {
            return Err(ResolveError::new(
                sp.clone(),
                ResolveErrorKind::UnsupportedConstGenericType { ty: ty.clone() },
            ))
        }
    };
    Ok(match prim {
        Primitive::Str => {
            return Err(ResolveError::new(
                sp.clone(),
                ResolveErrorKind::UnsupportedConstGenericType { ty: ty.clone() },
            ))
        }
        Primitive::Bool => Constant::Bool(bytes.first().copied().unwrap_or(0) != 0),
        Primitive::F32 => Constant::Float { bits: endianness.read_f64_bits(bytes, 32), ty: ty.clone() },
        Primitive::F64 => Constant::Float { bits: endianness.read_f64_bits(bytes, 64), ty: ty.clone() },
        p if p.is_unsigned() || p == Primitive::Char => {
            Constant::Uint { value: endianness.read_u128(bytes), ty: ty.clone() }
        }
        _ => Constant::Int { value: endianness.read_i128(bytes), ty: ty.clone() },
    })
}
