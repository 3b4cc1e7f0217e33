//! The MIR data model, the monomorphising cloner, and the optimiser
//! driver. A `Function` is a CFG of
//! `BasicBlock`s carrying typed `Statement`s and a `Terminator`, with
//! explicit drop-flag tracking; `Cloner` specialises a `Function` under a
//! `Monomorphiser` substitution (forcing associated types to ground when a
//! resolver is attached); `optimise` dispatches the fixed pass sequence
//! behind a borrow-check gate.

pub mod cloner;
pub mod constant;
pub mod endianness;
pub mod function;
pub mod ids;
pub mod lvalue;
pub mod monomorphiser;
pub mod operand;
pub mod optimise;
pub mod renumber;
pub mod rvalue;
pub mod statement;
pub mod terminator;
pub mod validate;

#[cfg(test)]
mod tests;

pub use cloner::Cloner;
pub use constant::{Constant, SwitchValues};
pub use endianness::Endianness;
pub use function::{BasicBlock, Function};
pub use ids::{ArgIdx, BlockIdx, DropFlagIdx, LocalIdx, VariantIdx};
pub use lvalue::{LValue, Storage, Wrapper};
pub use monomorphiser::{HrbOnly, Identity, ImplMethodSelf, Monomorphiser};
pub use operand::{BinOp, Param, UniOp};
pub use optimise::{optimise, BorrowCheckError, OptimiseError, PassContext};
pub use renumber::RenumberMaps;
pub use rvalue::RValue;
pub use statement::{AsmOptions, AsmParam, DropKind, Statement};
pub use terminator::{CallTarget, Terminator};
pub use validate::{validate, MirValidationError, ValidateResult};
