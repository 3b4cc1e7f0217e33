//! Shared plumbing for the two CLI binaries: phase-filtered logging, the
//! monomorphised-item-as-producer interface, and a fixture registry
//! standing in for the excluded parser front end (a real `mir_opt_test`
//! compiles its `.rs` fixtures; that's the lexer/parser's job, out of
//! scope here, so fixtures are small Rust `Function` builders registered
//! by name instead of parsed from file text).

use std::collections::HashSet;
use std::env;
use std::io::Write;

use mirc_mir::Function;
use mirc_ty::{GenericPath, TypeRef};

pub mod fixtures;

/// Reads a colon-separated phase whitelist from `var`, matching the
/// original tool's `debug_init_phases`: a colon-separated phase whitelist
/// filtering which phases are allowed to log, rather than using
/// `env_logger`'s own directive syntax. An unset or empty variable means
/// "no phase filtering": every phase logs, subject to `env_logger`'s own
/// level filter.
pub struct PhaseLog {
    allowed: Option<HashSet<String>>,
}

impl PhaseLog {
    pub fn from_env(var: &str) -> PhaseLog {
        match env::var(var) {
            Ok(value) if !value.is_empty() => {
                PhaseLog { allowed: Some(value.split(':').map(str::to_string).collect()) }
            }
            _ => PhaseLog { allowed: None },
        }
    }

    pub fn is_enabled(&self, phase: &str) -> bool {
        match &self.allowed {
            None => true,
            Some(set) => set.contains(phase),
        }
    }

    pub fn enter(&self, phase: &str) {
        if self.is_enabled(phase) {
            log::debug!("entering phase {}", phase);
        }
    }

    pub fn exit(&self, phase: &str, changed: bool) {
        if self.is_enabled(phase) {
            log::debug!("leaving phase {} (changed = {})", phase, changed);
        }
    }
}

/// Installs `env_logger` with the default (`warn`-if-unset) filter, the
/// way the rest of this workspace's binaries initialise logging.
pub fn init_logging() {
    let _ = env_logger::try_init();
}

/// One monomorphisation entry the optimiser driver yields: the mangled
/// item's path plus its fully-specialised, optimised `Function`, its
/// argument types, and its return type.
pub struct MonomorphisedItem {
    pub path: GenericPath,
    pub function: Function,
    pub args: Vec<TypeRef>,
    pub return_type: TypeRef,
}

/// The codegen back-end is out of scope for this workspace; this is the
/// narrow trait object sink a real back-end would implement instead.
pub trait CodegenSink {
    fn emit(&mut self, item: MonomorphisedItem) -> anyhow::Result<()>;
}

/// Stands in for a real back-end: writes a `Debug`-formatted dump of each
/// emitted item to a single writer, one item per line-delimited block.
pub struct DebugDumpSink<W: Write> {
    out: W,
}

impl<W: Write> DebugDumpSink<W> {
    pub fn new(out: W) -> DebugDumpSink<W> {
        DebugDumpSink { out }
    }
}

impl<W: Write> CodegenSink for DebugDumpSink<W> {
    fn emit(&mut self, item: MonomorphisedItem) -> anyhow::Result<()> {
        // A real back-end would use the mangled name as the emitted
        // symbol's linker label; here it's just printed alongside the
        // dump so the mangler (S) is exercised on the driver's own output.
        match mirc_mangle::mangle_path(&mirc_ty::Path::Generic(item.path.clone())) {
            Ok(symbol) => writeln!(self.out, "symbol = {}", symbol)?,
            Err(e) => writeln!(self.out, "symbol = <unmangleable: {}>", e)?,
        }
        writeln!(self.out, "{:#?}", item.path)?;
        writeln!(self.out, "args = {:#?}", item.args)?;
        writeln!(self.out, "return_type = {:#?}", item.return_type)?;
        writeln!(self.out, "{:#?}", item.function)?;
        Ok(())
    }
}
