//! `MIR Function`: `(locals, drop_flags, blocks)` plus, since argument
//! and return types are not folded into `locals` here (see the `Storage`
//! variant split documented on [`crate::lvalue::Storage`]), explicit `args`
//! and `ret_ty` fields.

use mirc_ty::TypeRef;

use crate::ids::{ArgIdx, LocalIdx};
use crate::lvalue::Storage;
use crate::statement::Statement;
use crate::terminator::Terminator;

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct BasicBlock {
    pub statements: Vec<Statement>,
    pub terminator: Terminator,
}

impl BasicBlock {
    pub fn new(terminator: Terminator) -> BasicBlock {
        BasicBlock { statements: Vec::new(), terminator }
    }
}

/// A single function body. Block 0 is the entry block.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Function {
    pub args: Vec<TypeRef>,
    pub ret_ty: TypeRef,
    pub locals: Vec<TypeRef>,
    pub drop_flags: Vec<bool>,
    pub blocks: Vec<BasicBlock>,
}

impl Function {
    pub fn new(args: Vec<TypeRef>, ret_ty: TypeRef) -> Function {
        Function { args, ret_ty, locals: Vec::new(), drop_flags: Vec::new(), blocks: Vec::new() }
    }

    pub fn alloc_local(&mut self, ty: TypeRef) -> LocalIdx {
        let idx = LocalIdx::new(self.locals.len() as u32);
        self.locals.push(ty);
        idx
    }

    pub fn alloc_drop_flag(&mut self, initial: bool) -> crate::ids::DropFlagIdx {
        let idx = crate::ids::DropFlagIdx::new(self.drop_flags.len() as u32);
        self.drop_flags.push(initial);
        idx
    }

    pub fn alloc_block(&mut self, block: BasicBlock) -> crate::ids::BlockIdx {
        let idx = crate::ids::BlockIdx::new(self.blocks.len() as u32);
        self.blocks.push(block);
        idx
    }

    pub fn type_of_storage(&self, storage: &Storage) -> Option<&TypeRef> {
        match storage {
            Storage::Return => Some(&self.ret_ty),
            Storage::Argument(ArgIdx(i)) => self.args.get(*i as usize),
            Storage::Local(LocalIdx(i)) => self.locals.get(*i as usize),
            Storage::Static(_) => None,
        }
    }
}
