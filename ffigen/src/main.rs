////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2019 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use ffi_generator::{BindingGenerator, CapabilitiesGenerator, DebugPrints, GenConfig, Registry};

mod helper;
mod logger;

use helper::Outcome;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Kind {
    /// Safe wrapper functions, types and constants
    Bindings,
    /// The capability table, function indices and the capability struct
    Capabilities,
    /// Both, in one file
    All,
}

#[derive(Parser, Debug)]
#[command(name = "ffigen")]
#[command(about = "Generates native bindings from an XML declaration template", long_about = None)]
struct Args {
    /// Declaration template to read.
    input: PathBuf,

    /// File to write the generated code to. It is left untouched if nothing changed.
    #[arg(short, long)]
    output: PathBuf,

    #[arg(long, value_enum, default_value_t = Kind::Bindings)]
    kind: Kind,

    /// Print every native call and its result from the generated functions.
    #[arg(long)]
    debug_prints: bool,

    /// Largest scratch allocation, in KiB, that is made on the thread local stack.
    #[arg(long, default_value_t = 64)]
    stack_limit_kib: usize,

    /// Place returned string buffers on the heap regardless of their size.
    #[arg(long)]
    heap_string_returns: bool,

    /// Fail if the output is out of date instead of writing it.
    #[arg(long)]
    check: bool,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    try_main().map_err(|err| {
        eprintln!("{err:#}");
        err
    })
}

fn try_main() -> Result<()> {
    let args = Args::parse();
    logger::init(logger::level(args.verbose, args.quiet));

    let mut config = GenConfig::default().stack_scratch_limit(args.stack_limit_kib * 1024);
    config.heap_string_returns = args.heap_string_returns;
    if args.debug_prints {
        config = config.debug_prints(DebugPrints::FunctionCalls);
    }

    let template = fs::read(&args.input).with_context(|| format!("Could not read {}", args.input.display()))?;
    let registry = Registry::from_xml(template.as_slice(), config)
        .with_context(|| format!("Invalid template {}", args.input.display()))?;
    log::info!("loaded {} classes from {}", registry.classes.len(), args.input.display());

    let mut generated = Vec::new();
    if matches!(args.kind, Kind::Bindings | Kind::All) {
        registry.write_bindings(BindingGenerator, &mut generated).context("Failed to generate bindings")?;
    }
    if matches!(args.kind, Kind::Capabilities | Kind::All) {
        registry
            .write_bindings(CapabilitiesGenerator, &mut generated)
            .context("Failed to generate the capability table")?;
    }

    if args.check {
        return helper::check_unchanged(&args.output, &generated);
    }
    match helper::write_if_changed(&args.output, &generated)? {
        Outcome::Written => log::info!("wrote {}", args.output.display()),
        Outcome::Unchanged => log::info!("{} is up to date", args.output.display()),
    }
    Ok(())
}
