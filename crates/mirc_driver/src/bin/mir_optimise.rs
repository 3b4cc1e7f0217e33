//! `mir_optimise <fixture-name> <output>`: runs one registered fixture
//! through the optimiser driver and feeds the result to a
//! `CodegenSink`; a real back-end is out of scope, so the sink here
//! just dumps the optimised `Function` to `output`.

use std::fs::File;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use mirc_driver::fixtures::{self, NoDropGlueContext};
use mirc_driver::{CodegenSink, DebugDumpSink, MonomorphisedItem, PhaseLog};
use mirc_mir::optimise::AcceptAllBorrowChecker;
use mirc_ty::{GenericPath, Name, PathParams, SimplePath};

struct Args {
    fixture_name: String,
    output: PathBuf,
}

fn parse_args() -> Result<Args> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        println!("usage: mir_optimise <fixture-name> <output>");
        std::process::exit(0);
    }
    let free: Vec<String> = args
        .finish()
        .into_iter()
        .map(|arg| arg.into_string().unwrap_or_else(|os| os.to_string_lossy().into_owned()))
        .collect();
    let mut iter = free.into_iter();
    let fixture_name = iter.next().context("missing required <fixture-name> argument")?;
    let output = iter.next().context("missing required <output> argument")?;
    Ok(Args { fixture_name, output: PathBuf::from(output) })
}

fn main() -> Result<()> {
    mirc_driver::init_logging();
    let log = PhaseLog::from_env("MIROPT_DEBUG");
    let args = parse_args()?;

    let fixture = fixtures::find(&args.fixture_name)
        .with_context(|| format!("no fixture registered under {:?}", args.fixture_name))?;

    log.enter("optimise");
    let input = (fixture.input)();
    let args_tys = input.args.clone();
    let return_ty = input.ret_ty.clone();
    let optimised = mirc_mir::optimise(input, &NoDropGlueContext, &AcceptAllBorrowChecker);
    log.exit("optimise", true);

    let function = match optimised {
        Ok(f) => f,
        Err(e) => bail!("optimisation failed: {}", e),
    };

    let path = GenericPath::new(
        SimplePath::local(vec![Name::new(fixture.name)]),
        PathParams::empty(),
    );

    let out = File::create(&args.output)
        .with_context(|| format!("failed to create {}", args.output.display()))?;
    let mut sink = DebugDumpSink::new(out);
    sink.emit(MonomorphisedItem { path, function, args: args_tys, return_type: return_ty })?;

    println!("wrote {}", args.output.display());
    Ok(())
}
