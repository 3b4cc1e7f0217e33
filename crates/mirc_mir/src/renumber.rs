//! `RenumberMaps`: the cloner also renumbers basic blocks, locals, and
//! drop flags through caller-supplied maps, allowing it to be used for MIR
//! inlining as well as for monomorphisation. Plain monomorphisation uses
//! the identity maps; inlining a callee body into a caller supplies offset
//! maps instead, so the two uses share one `Cloner` implementation.

use crate::ids::{ArgIdx, BlockIdx, DropFlagIdx, LocalIdx};

#[derive(Clone, Debug)]
pub struct RenumberMaps {
    blocks: Vec<BlockIdx>,
    /// Maps an *argument* index in the source function to a *local* index
    /// in the destination function; the identity case maps argument `i`
    /// to argument `i` unchanged (see [`RenumberMaps::identity`]); an
    /// inlining caller instead maps each argument to a fresh local holding
    /// the call's actual argument value.
    args_to_locals: Vec<Option<LocalIdx>>,
    locals: Vec<LocalIdx>,
    drop_flags: Vec<DropFlagIdx>,
}

impl RenumberMaps {
    /// Maps every index to itself; the shape `Cloner` uses for a plain
    /// monomorphisation, where the block/local/drop-flag layout of the
    /// output matches the input exactly.
    pub fn identity(block_count: usize, local_count: usize, drop_flag_count: usize) -> RenumberMaps {
        RenumberMaps {
            blocks: (0..block_count as u32).map(BlockIdx::new).collect(),
            args_to_locals: vec![None; 0],
            locals: (0..local_count as u32).map(LocalIdx::new).collect(),
            drop_flags: (0..drop_flag_count as u32).map(DropFlagIdx::new).collect(),
        }
    }

    /// Builds an offset map suitable for inlining a callee with the given
    /// counts into a caller whose own tables already occupy
    /// `[0, block_base)`/`[0, local_base)`/`[0, drop_flag_base)`, with
    /// each callee argument rebound to the local at the matching index in
    /// `arg_locals`.
    pub fn offset(
        block_base: u32,
        block_count: usize,
        local_base: u32,
        local_count: usize,
        drop_flag_base: u32,
        drop_flag_count: usize,
        arg_locals: Vec<LocalIdx>,
    ) -> RenumberMaps {
        RenumberMaps {
            blocks: (0..block_count as u32).map(|i| BlockIdx::new(block_base + i)).collect(),
            args_to_locals: arg_locals.into_iter().map(Some).collect(),
            locals: (0..local_count as u32).map(|i| LocalIdx::new(local_base + i)).collect(),
            drop_flags: (0..drop_flag_count as u32).map(|i| DropFlagIdx::new(drop_flag_base + i)).collect(),
        }
    }

    pub fn block(&self, idx: BlockIdx) -> BlockIdx {
        self.blocks[idx.index()]
    }

    pub fn local(&self, idx: LocalIdx) -> LocalIdx {
        self.locals[idx.index()]
    }

    pub fn drop_flag(&self, idx: DropFlagIdx) -> DropFlagIdx {
        self.drop_flags[idx.index()]
    }

    /// `None` means "argument `idx` stays an argument in the destination
    /// function" (the plain-monomorphisation case); `Some(local)` means
    /// "argument `idx` becomes local `local`" (the inlining case).
    pub fn argument(&self, idx: ArgIdx) -> Option<LocalIdx> {
        self.args_to_locals.get(idx.index()).copied().flatten()
    }
}
