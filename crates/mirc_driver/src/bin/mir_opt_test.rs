//! `mir_opt_test <test-directory> [filter…]`: walks a fixture directory,
//! pairs each `#[test="expected_fn"]` annotation with the builder
//! registered under that name, runs it through the optimiser driver, and
//! reports PASS/FAIL per case.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use mirc_driver::fixtures::{self, NoDropGlueContext};
use mirc_driver::PhaseLog;
use mirc_mir::optimise::AcceptAllBorrowChecker;

struct Args {
    dir: PathBuf,
    filters: Vec<String>,
}

fn parse_args() -> Result<Args> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        println!("usage: mir_opt_test <test-directory> [filter…]");
        std::process::exit(0);
    }
    let free: Vec<String> = args
        .finish()
        .into_iter()
        .map(|arg| arg.into_string().unwrap_or_else(|os| os.to_string_lossy().into_owned()))
        .collect();
    let mut iter = free.into_iter();
    let dir = iter.next().context("missing required <test-directory> argument")?;
    Ok(Args { dir: PathBuf::from(dir), filters: iter.collect() })
}

fn main() -> Result<()> {
    mirc_driver::init_logging();
    let log = PhaseLog::from_env("MIRTEST_DEBUG");
    let args = parse_args()?;

    if !args.dir.is_dir() {
        bail!("{} is not a directory", args.dir.display());
    }

    log.enter("collect");
    let cases = test_utils::collect_test_cases(&args.dir);
    log.exit("collect", false);

    let mut pass = 0usize;
    let mut fail = 0usize;
    let mut skip = 0usize;

    for case in &cases {
        if !args.filters.is_empty()
            && !args.filters.iter().any(|f| case.expected_fn.contains(f.as_str()))
        {
            continue;
        }

        let fixture = match fixtures::find(&case.expected_fn) {
            Some(f) => f,
            None => {
                println!("SKIP {} ({}): no builder registered", case.file.display(), case.expected_fn);
                skip += 1;
                continue;
            }
        };

        log.enter("optimise");
        let input = (fixture.input)();
        let expected = (fixture.expected)();
        let result = mirc_mir::optimise(input, &NoDropGlueContext, &AcceptAllBorrowChecker);
        log.exit("optimise", true);

        match result {
            Ok(actual) if actual == expected => {
                println!("PASS {} ({})", case.file.display(), fixture.expected_fn);
                pass += 1;
            }
            Ok(actual) => {
                println!(
                    "FAIL {} ({}): optimised output did not match\n  expected: {:?}\n  actual:   {:?}",
                    case.file.display(),
                    fixture.expected_fn,
                    expected,
                    actual
                );
                fail += 1;
            }
            Err(e) => {
                println!("FAIL {} ({}): {}", case.file.display(), fixture.expected_fn, e);
                fail += 1;
            }
        }
    }

    println!("{} passed, {} failed, {} skipped", pass, fail, skip);
    if fail > 0 {
        std::process::exit(1);
    }
    Ok(())
}
